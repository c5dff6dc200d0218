//! Password recovery server

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recovery_server::{
    routes, spawn_expired_token_sweeper, AccountStore, AppState, ChannelEventPublisher, Config,
    ConsoleMessageSender, InMemoryStore, MessageSender, PasswordUpdater, RecoveryRequestStore,
    SmtpMessageSender, SqliteStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recovery_server=debug,recovery_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        database = config.database_path.as_deref().unwrap_or("<memory>"),
        token_expiration_hours = config.recovery.token_expiration_hours,
        email_topic = %config.recovery.email_topic,
        sweep_interval_secs = config.sweep_interval.as_secs(),
        smtp = config.smtp.is_some(),
        "Loaded configuration"
    );

    let sender: Box<dyn MessageSender> = match config.smtp.clone() {
        Some(smtp) => Box::new(SmtpMessageSender::new(smtp).map_err(anyhow::Error::msg)?),
        None => {
            tracing::warn!("SMTP not configured, recovery notifications go to the console");
            Box::new(ConsoleMessageSender::new())
        }
    };

    match config.database_path.clone() {
        Some(path) => serve(Arc::new(SqliteStore::open(&path)?), sender, config).await,
        None => serve(Arc::new(InMemoryStore::new()), sender, config).await,
    }
}

async fn serve<S>(store: Arc<S>, sender: Box<dyn MessageSender>, config: Config) -> Result<()>
where
    S: AccountStore + RecoveryRequestStore + 'static,
{
    let (publisher, events) = ChannelEventPublisher::channel();
    PasswordUpdater::new(store.clone()).spawn(events);

    let state = Arc::new(AppState::new(
        store.clone(),
        store,
        sender,
        publisher,
        config.recovery.clone(),
    ));

    spawn_expired_token_sweeper(state.recovery.clone(), config.sweep_interval);

    let app = routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Recovery server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
