//! Access to the generative content service.
//!
//! Clients talk to a [`ContentProvider`] so the HTTP backend can be swapped for
//! a scripted one in tests.

mod gemini;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::retry::Retryable;

pub use gemini::GeminiProvider;

/// HTTP status the service uses while it sheds load.
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// One generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// When set, the provider must answer with JSON matching this schema.
    pub response_schema: Option<Value>,
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
            temperature: None,
        }
    }

    pub fn json(prompt: impl Into<String>, schema: Value, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
            temperature: Some(temperature),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(Box<reqwest::Error>),

    #[error("no API key configured")]
    MissingApiKey,

    #[error("provider response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        ProviderError::Transport(Box::new(error))
    }
}

impl Retryable for ProviderError {
    fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Status { status, .. } if *status == SERVICE_UNAVAILABLE => true,
            other => other.to_string().to_lowercase().contains("overloaded"),
        }
    }
}

/// A generative text service.
///
/// Returns the raw text of the first candidate; `Ok(None)` means the service
/// answered but produced no text.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        let busy = ProviderError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert!(busy.is_retryable());

        let overloaded = ProviderError::Status {
            status: 500,
            message: "The model is overloaded. Please try again later.".into(),
        };
        assert!(overloaded.is_retryable());

        let denied = ProviderError::Status {
            status: 403,
            message: "API key not valid".into(),
        };
        assert!(!denied.is_retryable());
        assert!(!ProviderError::MissingApiKey.is_retryable());
    }
}
