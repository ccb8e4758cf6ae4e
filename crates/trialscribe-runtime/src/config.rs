//! Runtime configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::providers::GenerationConfig;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid duration '{0}': {1}")]
    InvalidDuration(String, String),
}

/// Tunables for the pipeline and its collaborators.
///
/// Every field has a default, so an empty YAML document is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Generation model identifier.
    pub model: String,

    /// Maximum tokens per generation call.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Number of chunks retrieved per run.
    pub retrieval_k: usize,

    /// Character budget per formatted context snippet.
    pub snippet_budget: usize,

    /// Default revise/check round-trip cap for submitted jobs.
    pub default_max_iterations: u32,

    /// Generation request timeout, human-readable (e.g. "30s").
    pub request_timeout: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5-20250514".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            retrieval_k: 4,
            snippet_budget: crate::prompts::DEFAULT_SNIPPET_BUDGET,
            default_max_iterations: 2,
            request_timeout: "30s".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Parse a YAML config document.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a YAML config file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        humantime::parse_duration(&self.request_timeout).map_err(|e| {
            ConfigError::InvalidDuration(self.request_timeout.clone(), e.to_string())
        })?;
        Ok(())
    }

    /// The generation request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        humantime::parse_duration(&self.request_timeout).unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Per-call generation settings derived from this config.
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.request_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = RuntimeConfig::from_yaml("{}").unwrap();
        assert_eq!(config.retrieval_k, 4);
        assert_eq!(config.default_max_iterations, 2);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn fields_override_defaults() {
        let config = RuntimeConfig::from_yaml(
            "model: test-model\nretrieval_k: 8\nrequest_timeout: 2m\n",
        )
        .unwrap();
        assert_eq!(config.model, "test-model");
        assert_eq!(config.retrieval_k, 8);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn bad_duration_is_rejected_at_load() {
        let result = RuntimeConfig::from_yaml("request_timeout: soon\n");
        assert!(matches!(result, Err(ConfigError::InvalidDuration(_, _))));
    }

    #[test]
    fn generation_config_mirrors_runtime_config() {
        let config = RuntimeConfig::from_yaml("max_tokens: 256\ntemperature: 0.0\n").unwrap();
        let generation = config.generation_config();
        assert_eq!(generation.max_tokens, 256);
        assert_eq!(generation.temperature, 0.0);
    }
}
