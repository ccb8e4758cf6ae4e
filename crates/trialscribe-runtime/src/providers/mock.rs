//! Scripted generation provider for tests and offline demos.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Generation, GenerationConfig, GenerationError, GenerationProvider, TokenUsage};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this text.
    Text(String),
    /// Fail the call with an unavailability error.
    Unavailable(String),
}

impl MockResponse {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

/// Replays scripted responses in order; once the script is exhausted the
/// last text response repeats (so a compliant draft stays compliant across
/// re-checks).
pub struct MockProvider {
    script: Mutex<VecDeque<MockResponse>>,
    last: Mutex<Option<String>>,
}

impl MockProvider {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            last: Mutex::new(None),
        }
    }

    /// A provider that always fails.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(vec![MockResponse::unavailable(reason)])
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    async fn generate(
        &self,
        _system: &str,
        _prompt: &str,
        _config: &GenerationConfig,
    ) -> Result<Generation, GenerationError> {
        let next = self.script.lock().pop_front();
        let text = match next {
            Some(MockResponse::Text(text)) => {
                *self.last.lock() = Some(text.clone());
                text
            }
            Some(MockResponse::Unavailable(reason)) => {
                return Err(GenerationError::Unavailable(reason));
            }
            None => self
                .last
                .lock()
                .clone()
                .ok_or_else(|| GenerationError::Unavailable("script exhausted".to_string()))?,
        };

        Ok(Generation {
            text,
            usage: TokenUsage::default(),
            model: "mock".to_string(),
            stop_reason: Some("end_turn".to_string()),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_in_order() {
        let provider = MockProvider::new(vec![
            MockResponse::text("first"),
            MockResponse::text("second"),
        ]);
        let config = GenerationConfig::default();

        let a = provider.generate("s", "p", &config).await.unwrap();
        let b = provider.generate("s", "p", &config).await.unwrap();
        assert_eq!(a.text, "first");
        assert_eq!(b.text, "second");
    }

    #[tokio::test]
    async fn repeats_last_text_when_exhausted() {
        let provider = MockProvider::new(vec![MockResponse::text("only")]);
        let config = GenerationConfig::default();

        provider.generate("s", "p", &config).await.unwrap();
        let again = provider.generate("s", "p", &config).await.unwrap();
        assert_eq!(again.text, "only");
    }

    #[tokio::test]
    async fn failing_provider_reports_unavailable() {
        let provider = MockProvider::failing("no credential");
        let result = provider
            .generate("s", "p", &GenerationConfig::default())
            .await;
        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }
}
