//! HTTP routes for the recovery server

mod recovery;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::messaging::MessageSender;
use crate::state::AppState;
use crate::store::{RecoveryRequestStore, UserStore};

/// Create the router with all routes
pub fn create_router<U, R, M>(state: Arc<AppState<U, R, M>>) -> Router
where
    U: UserStore + 'static,
    R: RecoveryRequestStore + 'static,
    M: MessageSender + 'static,
{
    Router::new()
        .route("/password/restore", post(recovery::restore_password))
        .route("/password/update", post(recovery::update_password))
        .route("/password/recovery_status", get(recovery::recovery_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
