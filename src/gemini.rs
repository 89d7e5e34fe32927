//! Language-model gateway
//!
//! Wraps the text-generation backend behind the `TextGateway` trait so the
//! pipeline can be exercised with stub gateways in tests.
//! Uses a long-lived reqwest::Client for connection pooling.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::error::GatewayError;

/// Boundary to the text-completion backend.
///
/// One prompt in, raw text out. The gateway performs no retries; retry
/// policy, if any, belongs to the caller.
#[async_trait]
pub trait TextGateway: Send + Sync {
    /// Send a complete prompt and return the trimmed model output.
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Whether the one-time credential warm-up has completed.
    fn is_ready(&self) -> bool;
}

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    warmed: OnceCell<()>,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent".to_string(),
            warmed: OnceCell::new(),
        }
    }

    /// Validate the credential with a lightweight warm-up call.
    ///
    /// Runs at most once per client: a success is never repeated, a failure
    /// may be retried by calling again.
    pub async fn connect(&self) -> Result<(), GatewayError> {
        self.warmed
            .get_or_try_init(|| async {
                self.complete("Reply with the single word: ready").await?;
                info!("Gemini client initialized, API key validated");
                Ok::<(), GatewayError>(())
            })
            .await?;
        Ok(())
    }

    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        if self.api_key.is_empty() {
            return Err(GatewayError::NotConfigured);
        }

        let url = format!("{}?key={}", self.base_url, self.api_key);

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 1024,
            },
        };

        let response = self.client.post(&url).json(&request).send().await.map_err(
            |e| {
                error!("Gemini API request failed: {}", e);
                GatewayError::from(e)
            },
        )?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response ({}): {}", status, error_text);
            return Err(GatewayError::RequestFailed(format!(
                "backend returned {}",
                status
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            GatewayError::RequestFailed(format!("response parse error: {}", e))
        })?;

        let answer = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default();

        if answer.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        Ok(answer)
    }
}

#[async_trait]
impl TextGateway for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        self.complete(prompt).await
    }

    fn is_ready(&self) -> bool {
        self.warmed.initialized()
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "What's the price of Lotus Villa?".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 1024,
            },
        };

        let json = serde_json::to_string(&request);
        assert!(json.is_ok());
        assert!(json.unwrap().contains("Lotus Villa"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_configured() {
        let client = GeminiClient::new(String::new());
        let result = client.generate("hello").await;
        assert!(matches!(result, Err(GatewayError::NotConfigured)));
        assert!(!client.is_ready());
    }
}
