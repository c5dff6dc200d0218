//! Common test utilities for server integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::RwLock;

use axum_test::TestServer;
use recovery_core::{PasswordUpdateEvent, RecoveryConfig, RecoveryNotification, UserId, UserStatus};
use recovery_server::{
    routes, AccountStore, AppState, ChannelEventPublisher, InMemoryStore, MessageSender,
};
use tokio::sync::mpsc::UnboundedReceiver;

pub const TEST_TOPIC: &str = "test-email-topic";

/// Mock message sender that captures recovery notifications
#[derive(Default, Clone)]
pub struct MockMessageSender {
    /// Captured (destination, routing key, message) triples
    pub sent: Arc<RwLock<Vec<(String, String, RecoveryNotification)>>>,
}

impl MockMessageSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the last token sent to an email
    pub fn get_token(&self, email: &str) -> Option<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|(_, _, m)| m.email == email)
            .map(|(_, _, m)| m.token.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.read().unwrap().len()
    }
}

impl MessageSender for MockMessageSender {
    fn send(
        &self,
        destination: &str,
        routing_key: &str,
        message: &RecoveryNotification,
    ) -> Result<(), String> {
        self.sent.write().unwrap().push((
            destination.to_string(),
            routing_key.to_string(),
            message.clone(),
        ));
        Ok(())
    }
}

pub struct TestContext {
    pub server: TestServer,
    pub sender: MockMessageSender,
    pub store: Arc<InMemoryStore>,
    pub events: UnboundedReceiver<PasswordUpdateEvent>,
}

/// Create a test server backed by an in-memory store and a mock sender
pub fn create_test_server() -> TestContext {
    let store = Arc::new(InMemoryStore::new());
    let sender = MockMessageSender::new();
    let (publisher, events) = ChannelEventPublisher::channel();

    let config = RecoveryConfig {
        token_expiration_hours: 24,
        email_topic: TEST_TOPIC.to_string(),
    };

    let state = Arc::new(AppState::new(
        store.clone(),
        store.clone(),
        sender.clone(),
        publisher,
        config,
    ));

    let app = routes::create_router(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    TestContext {
        server,
        sender,
        store,
        events,
    }
}

/// Helper to register a user directly in the store
pub fn create_user(store: &InMemoryStore, name: &str, email: &str) -> UserId {
    store
        .create_user(name, email, UserStatus::Activated)
        .expect("Failed to create user")
}
