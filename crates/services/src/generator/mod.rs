//! Question generation: one remote attempt with a deterministic local fallback.

mod fallback;
mod remote;

use std::env;

use async_trait::async_trait;
use quiz_core::model::Question;

pub use fallback::{DEFAULT_TOPIC, fallback_questions};
pub use remote::{GeneratorConfig, RemoteQuestionClient, parse_questions};

/// Anything that can produce the question list for a new quiz.
///
/// Implementations must return exactly `count` well-formed questions and
/// must not fail; failures are absorbed internally.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(&self, topic: &str, count: usize, credential: Option<&str>) -> Vec<Question>;
}

/// Default `QuestionSource`: remote chat-completions when a credential is
/// present, local table otherwise or on any remote failure.
#[derive(Clone)]
pub struct QuestionGenerator {
    remote: RemoteQuestionClient,
    default_credential: Option<String>,
}

impl QuestionGenerator {
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            remote: RemoteQuestionClient::new(config),
            default_credential: None,
        }
    }

    /// Generator configured from `QUIZ_AI_*` environment variables.
    ///
    /// `QUIZ_AI_API_KEY`, when set, is used for calls that pass no credential.
    #[must_use]
    pub fn from_env() -> Self {
        let key = env::var("QUIZ_AI_API_KEY").ok();
        Self::new(GeneratorConfig::from_env()).with_default_credential(key)
    }

    #[must_use]
    pub fn with_default_credential(mut self, credential: Option<String>) -> Self {
        self.default_credential = credential.filter(|c| !c.trim().is_empty());
        self
    }

    #[must_use]
    pub fn remote_enabled(&self) -> bool {
        self.default_credential.is_some()
    }

    /// Local questions only; never touches the network.
    #[must_use]
    pub fn generate_offline(&self, topic: &str, count: usize) -> Vec<Question> {
        fallback_questions(topic, count, &mut rand::rng())
    }
}

#[async_trait]
impl QuestionSource for QuestionGenerator {
    async fn generate(&self, topic: &str, count: usize, credential: Option<&str>) -> Vec<Question> {
        let credential = credential
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or(self.default_credential.as_deref());

        let Some(api_key) = credential else {
            tracing::debug!(topic, count, "no credential; using local questions");
            return self.generate_offline(topic, count);
        };
        if count == 0 {
            return Vec::new();
        }

        match self.remote.request_questions(topic, count, api_key).await {
            Ok(questions) => {
                tracing::debug!(topic, count, "generated questions remotely");
                questions
            }
            Err(err) => {
                tracing::warn!(%err, topic, count, "quiz generation failed; using local questions");
                self.generate_offline(topic, count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_generator() -> QuestionGenerator {
        // Port 9 (discard) is closed on test hosts, so the connect fails fast.
        QuestionGenerator::new(GeneratorConfig::new("http://127.0.0.1:9/v1", "test").unwrap())
    }

    #[tokio::test]
    async fn without_credential_uses_local_table() {
        let questions = unreachable_generator().generate("javascript", 3, None).await;
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[2].options()[0], "push()");
    }

    #[tokio::test]
    async fn blank_credential_counts_as_none() {
        let questions = unreachable_generator()
            .generate("science", 2, Some("   "))
            .await;
        assert_eq!(questions[0].options()[2], "Au");
    }

    #[tokio::test]
    async fn transport_failure_falls_back() {
        let questions = unreachable_generator()
            .generate("science", 5, Some("sk-test"))
            .await;
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0].text(), "What is the chemical symbol for gold?");
        assert_eq!(questions[4].text(), "Sample question about science?");
    }

    #[tokio::test]
    async fn default_credential_enables_remote() {
        let generator = unreachable_generator().with_default_credential(Some("sk-env".into()));
        assert!(generator.remote_enabled());
        assert!(!unreachable_generator().with_default_credential(Some(String::new())).remote_enabled());

        let questions = generator.generate("javascript", 2, None).await;
        assert_eq!(questions.len(), 2);
    }
}
