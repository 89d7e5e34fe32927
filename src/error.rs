//! Error types for the real-estate query agent

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Failures from the language-model gateway.
///
/// Every variant is caught at the component that issued the call and turned
/// into fixed user-safe text; raw provider errors never reach the end user.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("language-model backend not configured (missing API key)")]
    NotConfigured,

    #[error("language-model request failed: {0}")]
    RequestFailed(String),

    #[error("language-model returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        // Client-side timeouts land here as well.
        GatewayError::RequestFailed(err.to_string())
    }
}

/// Prompt-template contract violations.
///
/// These indicate a programming error, not a runtime condition: the bins run
/// `prompts::validate_templates()` at startup and fail fast.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template '{template}' is missing argument '{argument}'")]
    MissingArgument {
        template: &'static str,
        argument: String,
    },
}
