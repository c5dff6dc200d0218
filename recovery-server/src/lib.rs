//! Password recovery server
//!
//! Hosts the recovery service behind a small HTTP API, with SQLite or
//! in-memory storage, SMTP or console delivery, and a background task
//! that sweeps expired tokens.

pub mod config;
pub mod crypto;
pub mod error;
pub mod events;
pub mod messaging;
pub mod routes;
pub mod state;
pub mod store;
pub mod sweeper;

pub use config::Config;
pub use error::ApiError;
pub use events::{ChannelEventPublisher, PasswordUpdater};
pub use messaging::{ConsoleMessageSender, MessageSender, SmtpConfig, SmtpMessageSender};
pub use state::{AppState, RecoveryService};
pub use store::{AccountStore, InMemoryStore, RecoveryRequestStore, SqliteStore, UserStore};
pub use sweeper::spawn_expired_token_sweeper;
