//! Console-based message sender for development

use recovery_core::RecoveryNotification;

use super::MessageSender;

/// Message sender that logs to console (for development)
pub struct ConsoleMessageSender;

impl ConsoleMessageSender {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleMessageSender {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSender for ConsoleMessageSender {
    fn send(
        &self,
        destination: &str,
        routing_key: &str,
        message: &RecoveryNotification,
    ) -> Result<(), String> {
        println!();
        println!("========================================");
        println!("  [{} / {}]", destination, routing_key);
        println!("  PASSWORD RECOVERY FOR: {} <{}>", message.user_name, message.email);
        println!("  TOKEN: {}", message.token);
        println!("  LANGUAGE: {}", message.language);
        println!("========================================");
        println!();

        tracing::info!(
            destination = %destination,
            routing_key = %routing_key,
            user_id = %message.user_id,
            email = %message.email,
            "Recovery notification sent"
        );

        Ok(())
    }
}
