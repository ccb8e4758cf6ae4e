//! Generation providers.
//!
//! The generation collaborator is the single place TrialScribe calls a
//! language model: a system role plus a user prompt in, drafted text out.
//! Failures are classified but never retried here — a failed call fails
//! the owning job.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod mock;
pub mod secrets;

#[cfg(feature = "anthropic")]
mod anthropic;

pub use secrets::{ApiCredential, CredentialSource};

#[cfg(feature = "anthropic")]
pub use anthropic::{AnthropicProvider, ANTHROPIC_API_KEY_ENV};

/// Errors from generation backends.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("generation backend unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("authentication failed")]
    Auth,

    #[error("timeout after {0:?}")]
    Timeout(Duration),

    #[error("response parse error: {0}")]
    Parse(String),
}

/// Configuration for a single generation call.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5-20250514".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Token usage from a generation call.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Result of a generation call.
#[derive(Debug, Clone)]
pub struct Generation {
    /// The drafted text
    pub text: String,

    /// Token usage
    pub usage: TokenUsage,

    /// Model that produced the text
    pub model: String,

    /// Stop reason, when the backend reports one
    pub stop_reason: Option<String>,
}

/// Provider abstraction allows swapping generation backends.
///
/// This trait is the ONLY place model calls are made; the compliance
/// evaluator and the index never call it.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate text for a system role and user prompt.
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<Generation, GenerationError>;

    /// Provider name for logs and metrics.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 120,
            completion_tokens: 80,
        };
        assert_eq!(usage.total(), 200);
    }

    #[test]
    fn default_config_is_sane() {
        let config = GenerationConfig::default();
        assert!(config.max_tokens > 0);
        assert!(config.timeout > Duration::ZERO);
    }
}
