//! Password recovery service
//!
//! Issues recovery tokens, consumes them to authorize a password change and
//! purges expired ones. All state lives in the stores; the service itself is
//! stateless and safe to share between request handlers and the sweeper.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::RecoveryConfig;
use crate::error::RecoveryError;
use crate::messaging::{EventPublisher, MessageSender, PASSWORD_RECOVERY_ROUTING_KEY};
use crate::models::{PasswordUpdateEvent, RecoveryNotification, RecoveryRequest};
use crate::store::{RecoveryRequestStore, UserStore};
use crate::token::{TokenGenerator, UuidTokenGenerator};

/// Source tag carried by every [`PasswordUpdateEvent`] this service emits
pub const EVENT_SOURCE: &str = "password_recovery_service";

pub struct PasswordRecoveryService<U, R, M, P, G = UuidTokenGenerator> {
    user_store: U,
    request_store: R,
    message_sender: M,
    event_publisher: P,
    token_generator: G,
    config: RecoveryConfig,
}

impl<U, R, M, P> PasswordRecoveryService<U, R, M, P>
where
    U: UserStore,
    R: RecoveryRequestStore,
    M: MessageSender,
    P: EventPublisher,
{
    /// Create a service that issues random UUID tokens
    pub fn new(
        user_store: U,
        request_store: R,
        message_sender: M,
        event_publisher: P,
        config: RecoveryConfig,
    ) -> Self {
        Self::with_token_generator(
            user_store,
            request_store,
            message_sender,
            event_publisher,
            UuidTokenGenerator,
            config,
        )
    }
}

impl<U, R, M, P, G> PasswordRecoveryService<U, R, M, P, G>
where
    U: UserStore,
    R: RecoveryRequestStore,
    M: MessageSender,
    P: EventPublisher,
    G: TokenGenerator,
{
    pub fn with_token_generator(
        user_store: U,
        request_store: R,
        message_sender: M,
        event_publisher: P,
        token_generator: G,
        config: RecoveryConfig,
    ) -> Self {
        Self {
            user_store,
            request_store,
            message_sender,
            event_publisher,
            token_generator,
            config,
        }
    }

    /// Issue a recovery token for the user owning `email` and notify them.
    pub fn send_password_recovery_email_to(
        &self,
        email: &str,
        language: &str,
    ) -> Result<(), RecoveryError> {
        let user = self
            .user_store
            .find_by_email(email)?
            .ok_or(RecoveryError::UserNotFound)?;

        if user.recovery_request.is_some() {
            return Err(RecoveryError::InvalidEmailState);
        }

        let expiry_date = Utc::now()
            .checked_add_signed(self.config.token_lifetime()?)
            .ok_or_else(|| RecoveryError::InvalidConfig("token expiry out of range".to_string()))?;

        let token = self.token_generator.generate_token_key();
        let request = RecoveryRequest {
            user_id: user.id,
            token: token.clone(),
            expiry_date,
        };
        self.request_store.save(&request)?;

        let notification = RecoveryNotification {
            user_id: user.id,
            user_name: user.name,
            email: user.email,
            token,
            language: language.to_string(),
        };

        if let Err(e) = self.message_sender.send(
            &self.config.email_topic,
            PASSWORD_RECOVERY_ROUTING_KEY,
            &notification,
        ) {
            // Roll back so the user is not locked out of a retry
            if let Err(cleanup) = self.request_store.delete(&request) {
                warn!(user_id = %user.id, error = %cleanup, "Failed to roll back recovery request");
            }
            return Err(RecoveryError::Messaging(e));
        }

        info!(
            user_id = %user.id,
            expiry_date = %request.expiry_date,
            "Password recovery requested"
        );

        Ok(())
    }

    /// Consume `token` and publish a password update for its owner.
    pub fn update_password_using_token(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), RecoveryError> {
        let request = self
            .request_store
            .find_by_token(token)?
            .ok_or(RecoveryError::InvalidToken)?;

        if request.is_expired_at(Utc::now()) {
            debug!(user_id = %request.user_id, "Rejected expired recovery token");
            return Err(RecoveryError::TokenExpired);
        }

        // A concurrent consumer may have deleted it between lookup and here
        if !self.request_store.delete(&request)? {
            return Err(RecoveryError::InvalidToken);
        }

        self.event_publisher
            .publish(PasswordUpdateEvent::new(
                EVENT_SOURCE,
                new_password,
                request.user_id,
            ))
            .map_err(RecoveryError::EventPublish)?;

        info!(user_id = %request.user_id, "Recovery token consumed");

        Ok(())
    }

    /// Remove every expired recovery request.
    pub fn delete_all_expired_password_reset_tokens(&self) -> Result<(), RecoveryError> {
        let deleted = self.request_store.delete_all_expired_password_reset_tokens()?;
        if deleted > 0 {
            info!(deleted, "Expired recovery tokens removed");
        } else {
            debug!("No expired recovery tokens to remove");
        }
        Ok(())
    }

    /// Whether the user owning `email` has a recovery request outstanding
    pub fn recovery_status(&self, email: &str) -> Result<bool, RecoveryError> {
        let user = self
            .user_store
            .find_by_email(email)?
            .ok_or(RecoveryError::UserNotFound)?;
        Ok(user.recovery_request.is_some())
    }
}
