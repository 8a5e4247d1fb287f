//! Shared helpers for chunker client integration tests.
//!
//! The client under test is blocking, while wiremock is async. Each
//! `MockService` owns a tokio runtime used only to drive the mock server;
//! requests are issued from the plain test thread.

#![allow(dead_code)]

use std::sync::Once;

use chonkie_infra::{RecursiveChunkerBuilder, RecursiveChunkerClient};
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

pub const TEST_API_KEY: &str = "test-api-key";

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Mock Chonkie service backed by wiremock.
pub struct MockService {
    server: MockServer,
    rt: Runtime,
}

impl MockService {
    pub fn start() -> Self {
        init_tracing();
        let rt = Runtime::new().expect("tokio runtime should start");
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<Request> {
        self.rt.block_on(self.server.received_requests()).unwrap_or_default()
    }

    pub fn count(&self, http_method: &str) -> usize {
        self.requests().iter().filter(|req| req.method.as_str() == http_method).count()
    }

    /// Builder pointed at this server, with retries disabled.
    pub fn client_builder(&self) -> RecursiveChunkerBuilder {
        RecursiveChunkerClient::builder()
            .api_key(TEST_API_KEY)
            .base_url(self.uri())
            .timeout(std::time::Duration::from_secs(5))
            .max_attempts(1)
    }

    pub fn client(&self) -> RecursiveChunkerClient {
        self.client_builder().build().expect("client should build")
    }
}

/// One chunk record as the service encodes it.
pub fn chunk_json(text: &str, start_index: usize, token_count: usize) -> Value {
    json!({
        "text": text,
        "start_index": start_index,
        "end_index": start_index + text.chars().count(),
        "token_count": token_count,
        "level": 0
    })
}
