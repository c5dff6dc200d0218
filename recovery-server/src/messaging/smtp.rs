//! Delivers recovery notifications as plain-text email over SMTP

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use recovery_core::RecoveryNotification;

use super::{MessageSender, PASSWORD_RECOVERY_ROUTING_KEY};

const RECOVERY_SUBJECT: &str = "Password recovery";

/// Implicit-TLS submission port, used when SMTP_PORT is unset
const DEFAULT_SMTP_PORT: u16 = 465;

/// Relay credentials and the content of outgoing recovery mail
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Sender address of recovery mail
    pub from_email: String,
    pub from_name: Option<String>,
    /// Page the user opens to choose a new password; token and language are appended
    pub recovery_url: Option<String>,
}

impl SmtpConfig {
    /// Read the relay settings, or None when recovery mail is not configured
    ///
    /// SMTP_HOST, SMTP_USERNAME, SMTP_PASSWORD and SMTP_FROM_EMAIL must all be
    /// set. SMTP_PORT, SMTP_FROM_NAME and RECOVERY_URL are optional.
    pub fn from_env() -> Option<Self> {
        let var = |key: &str| std::env::var(key).ok().filter(|s| !s.is_empty());

        Some(Self {
            host: var("SMTP_HOST")?,
            port: var("SMTP_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            username: var("SMTP_USERNAME")?,
            password: var("SMTP_PASSWORD")?,
            from_email: var("SMTP_FROM_EMAIL")?,
            from_name: var("SMTP_FROM_NAME"),
            recovery_url: var("RECOVERY_URL"),
        })
    }
}

/// Mails recovery tokens to the account owner
pub struct SmtpMessageSender {
    transport: SmtpTransport,
    from: Mailbox,
    recovery_url: Option<String>,
}

impl SmtpMessageSender {
    /// Build the sender and make sure the relay accepts our credentials
    pub fn new(config: SmtpConfig) -> Result<Self, String> {
        let host = config.host.clone();
        let port = config.port;
        let sender = Self::build(config)?;

        sender
            .transport
            .test_connection()
            .map_err(|e| format!("SMTP relay {}:{} unreachable: {}", host, port, e))?;

        tracing::info!(host = %host, port, "SMTP relay ready for recovery mail");
        Ok(sender)
    }

    /// Build the sender without contacting the relay
    fn build(config: SmtpConfig) -> Result<Self, String> {
        let address = config
            .from_email
            .parse()
            .map_err(|e| format!("Invalid sender address {}: {}", config.from_email, e))?;
        let from = Mailbox::new(config.from_name, address);

        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| format!("Invalid SMTP relay {}: {}", config.host, e))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self {
            transport,
            from,
            recovery_url: config.recovery_url,
        })
    }

    fn recovery_body(&self, notification: &RecoveryNotification) -> String {
        let action = match &self.recovery_url {
            Some(url) => format!(
                "Open this link to choose a new password:\n{}?token={}&lang={}",
                url, notification.token, notification.language
            ),
            None => format!("Your password recovery token is: {}", notification.token),
        };

        format!(
            "Hello {},\n\n{}\n\n\
             If you didn't request this, you can safely ignore this email.",
            notification.user_name, action
        )
    }

    fn recovery_message(&self, notification: &RecoveryNotification) -> Result<Message, String> {
        let to = notification
            .email
            .parse()
            .map_err(|e| format!("Invalid recipient {}: {}", notification.email, e))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(RECOVERY_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(self.recovery_body(notification))
            .map_err(|e| format!("Failed to build recovery email: {}", e))
    }
}

impl MessageSender for SmtpMessageSender {
    fn send(
        &self,
        destination: &str,
        routing_key: &str,
        message: &RecoveryNotification,
    ) -> Result<(), String> {
        if routing_key != PASSWORD_RECOVERY_ROUTING_KEY {
            return Err(format!("Unsupported routing key: {}", routing_key));
        }

        let email = self.recovery_message(message)?;
        self.transport
            .send(&email)
            .map_err(|e| format!("Failed to send recovery email: {}", e))?;

        tracing::info!(
            destination = %destination,
            user_id = %message.user_id,
            email = %message.email,
            "Password recovery email sent"
        );
        Ok(())
    }
}
