//! Outbound messaging and in-process event publishing

use std::sync::Arc;

use crate::models::{PasswordUpdateEvent, RecoveryNotification};

/// Routing key every recovery notification is published under
pub const PASSWORD_RECOVERY_ROUTING_KEY: &str = "password.recovery";

/// Trait for handing notifications to a message broker or mailer
pub trait MessageSender: Send + Sync {
    /// Send a recovery notification to a destination under a routing key
    fn send(
        &self,
        destination: &str,
        routing_key: &str,
        message: &RecoveryNotification,
    ) -> Result<(), String>;
}

/// Allow using Box<dyn MessageSender> as a MessageSender
impl MessageSender for Box<dyn MessageSender> {
    fn send(
        &self,
        destination: &str,
        routing_key: &str,
        message: &RecoveryNotification,
    ) -> Result<(), String> {
        (**self).send(destination, routing_key, message)
    }
}

/// Trait for fanning password update events out to in-process listeners
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: PasswordUpdateEvent) -> Result<(), String>;
}

impl<T: EventPublisher + ?Sized> EventPublisher for Arc<T> {
    fn publish(&self, event: PasswordUpdateEvent) -> Result<(), String> {
        (**self).publish(event)
    }
}
