//! Stub gateways shared by the unit tests.
//!
//! Tests pin pipeline behavior through these instead of live model output.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::GatewayError;
use crate::gemini::TextGateway;

/// Always answers with the same text.
pub struct StaticGateway {
    reply: String,
    calls: AtomicUsize,
}

impl StaticGateway {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGateway for StaticGateway {
    async fn generate(&self, _prompt: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    fn is_ready(&self) -> bool {
        true
    }
}

/// Always fails, exercising the deterministic fallback paths.
pub struct FailingGateway;

#[async_trait]
impl TextGateway for FailingGateway {
    async fn generate(&self, _prompt: &str) -> Result<String, GatewayError> {
        Err(GatewayError::RequestFailed("stubbed failure".to_string()))
    }

    fn is_ready(&self) -> bool {
        false
    }
}

/// Echoes the prompt back, so tests can assert that composed replies carry
/// the data that was fed into the formatting template.
pub struct EchoGateway;

#[async_trait]
impl TextGateway for EchoGateway {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        Ok(prompt.to_string())
    }

    fn is_ready(&self) -> bool {
        true
    }
}
