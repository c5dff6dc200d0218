//! Periodic removal of expired recovery tokens

use std::sync::Arc;
use std::time::Duration;

use recovery_core::{
    EventPublisher, MessageSender, PasswordRecoveryService, RecoveryRequestStore, TokenGenerator,
    UserStore,
};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default time between sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Spawn a task that sweeps expired tokens every `period`, starting immediately.
///
/// Storage errors are logged and the next tick tries again.
pub fn spawn_expired_token_sweeper<U, R, M, P, G>(
    service: Arc<PasswordRecoveryService<U, R, M, P, G>>,
    period: Duration,
) -> JoinHandle<()>
where
    U: UserStore + 'static,
    R: RecoveryRequestStore + 'static,
    M: MessageSender + 'static,
    P: EventPublisher + 'static,
    G: TokenGenerator + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Err(e) = service.delete_all_expired_password_reset_tokens() {
                tracing::error!(error = %e, "Expired token sweep failed");
            }
        }
    })
}
