//! Productor respaldado por un servicio de generación de texto.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use press_core::{sanitize_title, truncate_chars, Artifact, ContentProducer, GenerationConfig, GenerationError};

use crate::clients::{ClientError, GenerationApi};

/// Cota dura sobre la salida cruda del servicio, como múltiplo de la cota
/// configurada. Por encima de esto la salida se considera degenerada y se
/// rechaza en lugar de truncarse.
const HARD_CAP_FACTOR: usize = 8;

pub struct GeneratedTemplateProducer {
    api: Arc<dyn GenerationApi>,
}

impl GeneratedTemplateProducer {
    pub fn new(api: Arc<dyn GenerationApi>) -> Self {
        Self { api }
    }

    fn prompt_for(topic: &str) -> String {
        format!("Create a full page template in markdown for: {topic}. \
                 Include sections, formatting, and realistic headings.")
    }
}

#[async_trait]
impl ContentProducer for GeneratedTemplateProducer {
    async fn produce(&self, topic: &str, config: &GenerationConfig) -> Result<Artifact, GenerationError> {
        let prompt = Self::prompt_for(topic);
        debug!("requesting template for topic '{topic}'");
        let raw = match self.api.generate(&prompt).await {
            Ok(text) => text,
            Err(ClientError::Transport(msg)) => return Err(GenerationError::Unreachable(msg)),
            Err(err @ ClientError::Rejected { .. }) => {
                return Err(GenerationError::InvalidOutput(err.to_string()))
            }
        };

        if raw.trim().is_empty() {
            return Err(GenerationError::InvalidOutput("service returned an empty body".into()));
        }
        let hard_cap = config.max_length * HARD_CAP_FACTOR;
        let len = raw.chars().count();
        if len > hard_cap {
            return Err(GenerationError::TooLong { len, max: hard_cap });
        }

        let title = format!("{} - {}", sanitize_title(topic), Utc::now().format("%Y-%m-%d"));
        Ok(Artifact::text(title, truncate_chars(&raw, config.max_length), topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::CannedGenerationApi;
    use serde_json::json;

    struct FailingApi(ClientError);

    #[async_trait]
    impl GenerationApi for FailingApi {
        async fn generate(&self, _prompt: &str) -> Result<String, ClientError> {
            Err(self.0.clone())
        }
    }

    fn config() -> GenerationConfig {
        GenerationConfig::default()
    }

    #[tokio::test]
    async fn output_is_sanitized_and_truncated() {
        let api = Arc::new(CannedGenerationApi::new("# Template body"));
        let producer = GeneratedTemplateProducer::new(api);
        let artifact = producer.produce("\u{201C}Habit Tracker\u{201D}", &config()).await.unwrap();
        assert!(artifact.title().starts_with("Habit Tracker - "));
        assert_eq!(artifact.body().as_text(), Some("# Template body"));
    }

    #[tokio::test]
    async fn transport_failure_is_unreachable() {
        let api = Arc::new(FailingApi(ClientError::Transport("connection refused".into())));
        let producer = GeneratedTemplateProducer::new(api);
        let err = producer.produce("Planner", &config()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Unreachable(_)));
    }

    #[tokio::test]
    async fn rejection_is_invalid_output() {
        let api = Arc::new(FailingApi(ClientError::Rejected { status: 429,
                                                              body: json!({"error": "rate limited"}) }));
        let producer = GeneratedTemplateProducer::new(api);
        let err = producer.produce("Planner", &config()).await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn empty_body_is_invalid_output() {
        let api = Arc::new(CannedGenerationApi::new("   \n"));
        let producer = GeneratedTemplateProducer::new(api);
        let err = producer.produce("Planner", &config()).await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn degenerate_output_is_too_long() {
        let api = Arc::new(CannedGenerationApi::new("x".repeat(2000 * HARD_CAP_FACTOR + 1)));
        let producer = GeneratedTemplateProducer::new(api);
        let err = producer.produce("Planner", &config()).await.unwrap_err();
        assert!(matches!(err, GenerationError::TooLong { .. }));
    }
}
