use thiserror::Error;

use crate::model::{AnswerChoiceError, HistoryEntryError, QuestionError, QuizSettingsError};
use crate::scoring::ScoreError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    AnswerChoice(#[from] AnswerChoiceError),
    #[error(transparent)]
    HistoryEntry(#[from] HistoryEntryError),
    #[error(transparent)]
    Settings(#[from] QuizSettingsError),
    #[error(transparent)]
    Score(#[from] ScoreError),
}
