//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AnswerChoiceError, HistoryEntryError};
use quiz_core::scoring::ScoreError;
use storage::repository::StorageError;

/// Errors from the remote question request.
///
/// These never leave the generator: every variant triggers the local fallback.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("quiz generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("quiz generation returned an empty response")]
    EmptyResponse,
    #[error("quiz generation returned malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quiz generation response has no `questions` list")]
    MissingQuestions,
    #[error("question {index} in the response is malformed: {source}")]
    InvalidQuestion {
        index: usize,
        source: serde_json::Error,
    },
    #[error("quiz generation returned {got} questions, expected {expected}")]
    TooFewQuestions { expected: usize, got: usize },
}

/// Errors from building a generator configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeneratorConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("model name cannot be empty")]
    EmptyModel,
}

/// Errors emitted by `HistoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryServiceError {
    #[error(transparent)]
    Entry(#[from] HistoryEntryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for quiz")]
    Empty,
    #[error("quiz topic cannot be empty")]
    EmptyTopic,
    #[error(transparent)]
    InvalidOption(#[from] AnswerChoiceError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    History(#[from] HistoryServiceError),
}

/// Errors surfaced by a `SessionHandle`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DriverError {
    #[error("session driver has stopped")]
    Closed,
}
