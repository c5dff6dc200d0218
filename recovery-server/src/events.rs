//! In-process delivery of password update events
//!
//! The recovery service only authorizes a change; the [`PasswordUpdater`]
//! listening on the other end of the channel performs it.

use recovery_core::{EventPublisher, PasswordUpdateEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::crypto::hash_password;
use crate::store::AccountStore;

/// Publishes events onto an unbounded channel
#[derive(Clone)]
pub struct ChannelEventPublisher {
    tx: UnboundedSender<PasswordUpdateEvent>,
}

impl ChannelEventPublisher {
    /// Create a publisher together with the receiving end for the listener
    pub fn channel() -> (Self, UnboundedReceiver<PasswordUpdateEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventPublisher for ChannelEventPublisher {
    fn publish(&self, event: PasswordUpdateEvent) -> Result<(), String> {
        self.tx
            .send(event)
            .map_err(|_| "password update listener has shut down".to_string())
    }
}

/// Applies password update events to the user store
pub struct PasswordUpdater<U> {
    user_store: U,
}

impl<U: AccountStore + 'static> PasswordUpdater<U> {
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    /// Hash the new password and store it
    pub fn apply(&self, event: &PasswordUpdateEvent) -> Result<(), String> {
        let password_hash = hash_password(&event.new_password).map_err(|e| e.to_string())?;
        self.user_store
            .update_password(event.user_id, &password_hash)
            .map_err(|e| e.to_string())
    }

    /// Consume events until every publisher is dropped
    pub async fn run(self, mut rx: UnboundedReceiver<PasswordUpdateEvent>) {
        while let Some(event) = rx.recv().await {
            match self.apply(&event) {
                Ok(()) => tracing::info!(
                    user_id = %event.user_id,
                    source = event.source,
                    "Password updated"
                ),
                Err(e) => tracing::error!(
                    user_id = %event.user_id,
                    error = %e,
                    "Failed to apply password update"
                ),
            }
        }
        tracing::debug!("Password update channel closed");
    }

    pub fn spawn(self, rx: UnboundedReceiver<PasswordUpdateEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }
}
