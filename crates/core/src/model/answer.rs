use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::{OPTION_COUNT, Question};

/// Wire value for "no answer submitted before the time limit".
///
/// Never collides with a valid option index.
pub const NO_ANSWER_WIRE: i32 = -1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerChoiceError {
    #[error("answer index {0} is out of range (0-3)")]
    OutOfRange(i32),
}

/// What the player chose for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum AnswerChoice {
    /// Index of the selected option (0-3).
    Option(u8),
    /// The countdown expired before an answer was submitted.
    NoAnswer,
}

impl AnswerChoice {
    /// Validates a selected option index.
    ///
    /// # Errors
    ///
    /// Returns `AnswerChoiceError::OutOfRange` for indices past the last option.
    pub fn option(index: usize) -> Result<Self, AnswerChoiceError> {
        u8::try_from(index)
            .ok()
            .filter(|i| usize::from(*i) < OPTION_COUNT)
            .map(Self::Option)
            .ok_or(AnswerChoiceError::OutOfRange(
                i32::try_from(index).unwrap_or(i32::MAX),
            ))
    }

    /// Decodes the wire representation, where any negative value means no answer.
    ///
    /// # Errors
    ///
    /// Returns `AnswerChoiceError::OutOfRange` for values >= 4.
    pub fn from_wire(value: i32) -> Result<Self, AnswerChoiceError> {
        if value < 0 {
            return Ok(Self::NoAnswer);
        }
        usize::try_from(value)
            .map_err(|_| AnswerChoiceError::OutOfRange(value))
            .and_then(Self::option)
    }

    #[must_use]
    pub fn to_wire(self) -> i32 {
        match self {
            Self::Option(i) => i32::from(i),
            Self::NoAnswer => NO_ANSWER_WIRE,
        }
    }

    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Option(i) => Some(usize::from(i)),
            Self::NoAnswer => None,
        }
    }
}

impl TryFrom<i32> for AnswerChoice {
    type Error = AnswerChoiceError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_wire(value)
    }
}

impl From<AnswerChoice> for i32 {
    fn from(choice: AnswerChoice) -> Self {
        choice.to_wire()
    }
}

/// Outcome of one question in a session. Appended once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    question_index: usize,
    question: String,
    selected_answer: AnswerChoice,
    correct_answer: u8,
    is_correct: bool,
    time_taken: u32,
}

impl AnswerResult {
    /// Record an answer for the question at `question_index`.
    #[must_use]
    pub fn record(
        question_index: usize,
        question: &Question,
        selected: AnswerChoice,
        time_taken_secs: u32,
    ) -> Self {
        Self {
            question_index,
            question: question.text().to_owned(),
            selected_answer: selected,
            correct_answer: question.correct_answer(),
            is_correct: question.is_correct(selected),
            time_taken: time_taken_secs,
        }
    }

    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn selected_answer(&self) -> AnswerChoice {
        self.selected_answer
    }

    #[must_use]
    pub fn correct_answer(&self) -> u8 {
        self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn time_taken_secs(&self) -> u32 {
        self.time_taken
    }

    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.selected_answer == AnswerChoice::NoAnswer
    }
}
