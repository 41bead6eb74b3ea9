//! Mock mail relay for testing
//!
//! A wiremock server standing in for the HTTP mail relay the notification
//! service posts confirmations to.

use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const RELAY_PATH: &str = "/api/send";

pub struct MailRelayMock {
    pub server: MockServer,
}

impl MailRelayMock {
    /// Start a new relay with no routes mounted
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Endpoint the notification service should post to
    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), RELAY_PATH)
    }

    /// Accept every message
    pub async fn mock_accept(&self) {
        Mock::given(method("POST"))
            .and(path(RELAY_PATH))
            .respond_with(ResponseTemplate::new(202))
            .mount(&self.server)
            .await;
    }

    /// Answer every message with the given status
    pub async fn mock_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(RELAY_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of the messages received so far
    pub async fn received_messages(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }

    /// Drop all mounted routes and recorded requests
    pub async fn reset(&self) {
        self.server.reset().await;
    }
}
