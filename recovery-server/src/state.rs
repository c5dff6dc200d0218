//! Shared application state

use std::sync::Arc;

use recovery_core::{PasswordRecoveryService, RecoveryConfig, RecoveryRequestStore, UserStore};

use crate::events::ChannelEventPublisher;
use crate::messaging::MessageSender;

/// The recovery service as wired by the server
pub type RecoveryService<U, R, M> =
    PasswordRecoveryService<Arc<U>, Arc<R>, M, ChannelEventPublisher>;

/// Application state shared by all handlers
pub struct AppState<U, R, M> {
    pub recovery: Arc<RecoveryService<U, R, M>>,
}

impl<U, R, M> AppState<U, R, M>
where
    U: UserStore,
    R: RecoveryRequestStore,
    M: MessageSender,
{
    pub fn new(
        user_store: Arc<U>,
        request_store: Arc<R>,
        message_sender: M,
        event_publisher: ChannelEventPublisher,
        config: RecoveryConfig,
    ) -> Self {
        Self {
            recovery: Arc::new(PasswordRecoveryService::new(
                user_store,
                request_store,
                message_sender,
                event_publisher,
                config,
            )),
        }
    }
}
