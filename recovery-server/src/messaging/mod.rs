//! Delivery of recovery notifications

pub mod console;
pub mod smtp;

pub use console::ConsoleMessageSender;
pub use recovery_core::messaging::{MessageSender, PASSWORD_RECOVERY_ROUTING_KEY};
pub use smtp::{SmtpConfig, SmtpMessageSender};
