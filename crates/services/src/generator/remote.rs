use std::env;

use quiz_core::model::{Question, QuestionId};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{GenerationError, GeneratorConfigError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const SYSTEM_PROMPT: &str = "You are a quiz generator that creates educational multiple-choice questions. Always respond with valid JSON only.";

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

impl GeneratorConfig {
    /// Build a config for an OpenAI-compatible endpoint.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorConfigError` if the base URL does not parse or the
    /// model name is blank.
    pub fn new(base_url: &str, model: &str) -> Result<Self, GeneratorConfigError> {
        if Url::parse(base_url).is_err() {
            return Err(GeneratorConfigError::InvalidBaseUrl(base_url.to_string()));
        }
        if model.trim().is_empty() {
            return Err(GeneratorConfigError::EmptyModel);
        }
        Ok(Self {
            base_url: base_url.to_string(),
            model: model.trim().to_string(),
            ..Self::default()
        })
    }

    /// Reads `QUIZ_AI_BASE_URL` and `QUIZ_AI_MODEL`, keeping defaults for
    /// anything unset or invalid.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("QUIZ_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("QUIZ_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Self::new(&base_url, &model).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring invalid quiz generator settings");
            Self::default()
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct RemoteQuestionClient {
    client: Client,
    config: GeneratorConfig,
}

impl RemoteQuestionClient {
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Ask the model for `count` questions about `topic`. Single attempt.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the request fails, the status is not a
    /// success, or the content is not a well-formed question list.
    pub async fn request_questions(
        &self,
        topic: &str,
        count: usize,
        api_key: &str,
    ) -> Result<Vec<Question>, GenerationError> {
        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: quiz_prompt(topic, count),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        parse_questions(&content, count)
    }
}

fn quiz_prompt(topic: &str, count: usize) -> String {
    format!(
        r#"Generate {count} multiple choice quiz questions about "{topic}".

Format your response as a valid JSON object with this exact structure:
{{
  "questions": [
    {{
      "id": 1,
      "question": "Question text here?",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswer": 0,
      "explanation": "Brief explanation of why this answer is correct"
    }}
  ]
}}

Requirements:
- Questions should be engaging and educational
- Each question must have exactly 4 options
- correctAnswer should be the index (0-3) of the correct option
- Include brief explanations for each answer
- Questions should vary in difficulty
- Make questions specific and clear
- Avoid overly obvious or trick questions

Topic: {topic}
Number of questions: {count}

Return ONLY the JSON object, no additional text."#
    )
}

/// Drops a surrounding Markdown code fence, if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_lang, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse `{"questions": [...]}` into exactly `count` questions with ids 1..=count.
///
/// # Errors
///
/// Returns `GenerationError` if the JSON is malformed, `questions` is not a
/// list, any entry is malformed, or fewer than `count` entries are present.
pub fn parse_questions(content: &str, count: usize) -> Result<Vec<Question>, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(content))?;
    let items = value
        .get("questions")
        .and_then(serde_json::Value::as_array)
        .ok_or(GenerationError::MissingQuestions)?;

    if items.len() < count {
        return Err(GenerationError::TooFewQuestions {
            expected: count,
            got: items.len(),
        });
    }

    items
        .iter()
        .take(count)
        .enumerate()
        .map(|(index, item)| {
            Question::deserialize(item)
                .map(|q| q.with_id(QuestionId::from_position(index)))
                .map_err(|source| GenerationError::InvalidQuestion { index, source })
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_QUESTIONS: &str = r#"{
        "questions": [
            {"id": 9, "question": "2 + 2?", "options": ["3", "4", "5", "6"], "correctAnswer": 1, "explanation": "Arithmetic."},
            {"id": 4, "question": "Capital of France?", "options": ["Paris", "Rome", "Oslo", "Bern"], "correctAnswer": 0}
        ]
    }"#;

    #[test]
    fn parses_and_renumbers_questions() {
        let questions = parse_questions(TWO_QUESTIONS, 2).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id(), QuestionId::new(1));
        assert_eq!(questions[1].id(), QuestionId::new(2));
        assert_eq!(questions[1].explanation(), None);
    }

    #[test]
    fn truncates_extra_questions() {
        let questions = parse_questions(TWO_QUESTIONS, 1).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text(), "2 + 2?");
    }

    #[test]
    fn too_few_questions_is_an_error() {
        let err = parse_questions(TWO_QUESTIONS, 3).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::TooFewQuestions { expected: 3, got: 2 }
        ));
    }

    #[test]
    fn accepts_fenced_json() {
        let fenced = format!("```json\n{TWO_QUESTIONS}\n```");
        assert_eq!(parse_questions(&fenced, 2).unwrap().len(), 2);
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert!(matches!(
            parse_questions("not json", 1).unwrap_err(),
            GenerationError::Json(_)
        ));
        assert!(matches!(
            parse_questions(r#"{"questions": {"id": 1}}"#, 1).unwrap_err(),
            GenerationError::MissingQuestions
        ));
        assert!(matches!(
            parse_questions(r#"{"items": []}"#, 1).unwrap_err(),
            GenerationError::MissingQuestions
        ));
        let five_options = r#"{"questions": [
            {"question": "Q?", "options": ["a", "b", "c", "d", "e"], "correctAnswer": 0}
        ]}"#;
        assert!(matches!(
            parse_questions(five_options, 1).unwrap_err(),
            GenerationError::InvalidQuestion { index: 0, .. }
        ));
        let bad_index = r#"{"questions": [
            {"question": "Q?", "options": ["a", "b", "c", "d"], "correctAnswer": 4}
        ]}"#;
        assert!(matches!(
            parse_questions(bad_index, 1).unwrap_err(),
            GenerationError::InvalidQuestion { index: 0, .. }
        ));
    }

    #[test]
    fn prompt_mentions_topic_and_count() {
        let prompt = quiz_prompt("volcanoes", 7);
        assert!(prompt.starts_with("Generate 7 multiple choice quiz questions about \"volcanoes\"."));
        assert!(prompt.contains("\"correctAnswer\": 0"));
        assert!(prompt.contains("Number of questions: 7"));
    }

    #[test]
    fn config_validates_base_url() {
        assert!(GeneratorConfig::new("http://localhost:8080/v1", "m").is_ok());
        assert_eq!(
            GeneratorConfig::new("not a url", "m"),
            Err(GeneratorConfigError::InvalidBaseUrl("not a url".into()))
        );
        assert_eq!(
            GeneratorConfig::new("http://localhost", " "),
            Err(GeneratorConfigError::EmptyModel)
        );
    }

    #[test]
    fn completions_url_joins_without_double_slash() {
        let config = GeneratorConfig::new("http://localhost:1234/v1/", "m").unwrap();
        assert_eq!(config.completions_url(), "http://localhost:1234/v1/chat/completions");
    }
}
