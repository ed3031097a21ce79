use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer::AnswerChoice;
use crate::model::ids::QuestionId;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("option {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("correct answer index {index} is out of range (0-3)")]
    CorrectAnswerOutOfRange { index: u32 },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question with four options.
///
/// Immutable once built. The JSON shape is the one requested from the
/// generative API: `{id, question, options, correctAnswer, explanation}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionWire", into = "QuestionWire")]
pub struct Question {
    id: QuestionId,
    text: String,
    options: [String; OPTION_COUNT],
    correct_answer: u8,
    explanation: Option<String>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text or an option is blank, or if
    /// `correct_answer` does not index into the options.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_answer: u32,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        let correct_answer = u8::try_from(correct_answer)
            .ok()
            .filter(|i| usize::from(*i) < OPTION_COUNT)
            .ok_or(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
            })?;
        let explanation = explanation.filter(|e| !e.trim().is_empty());

        Ok(Self {
            id,
            text,
            options,
            correct_answer,
            explanation,
        })
    }

    /// Returns the same question under a different id.
    #[must_use]
    pub fn with_id(mut self, id: QuestionId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> u8 {
        self.correct_answer
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[usize::from(self.correct_answer)]
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Whether the given choice matches the correct option.
    #[must_use]
    pub fn is_correct(&self, choice: AnswerChoice) -> bool {
        choice == AnswerChoice::Option(self.correct_answer)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionWire {
    #[serde(default)]
    id: u32,
    question: String,
    options: [String; OPTION_COUNT],
    correct_answer: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
}

impl TryFrom<QuestionWire> for Question {
    type Error = QuestionError;

    fn try_from(wire: QuestionWire) -> Result<Self, Self::Error> {
        Question::new(
            QuestionId::new(wire.id),
            wire.question,
            wire.options,
            wire.correct_answer,
            wire.explanation,
        )
    }
}

impl From<Question> for QuestionWire {
    fn from(q: Question) -> Self {
        Self {
            id: q.id.value(),
            question: q.text,
            options: q.options,
            correct_answer: u32::from(q.correct_answer),
            explanation: q.explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; OPTION_COUNT] {
        ["Go", "Gd", "Au", "Ag"].map(String::from)
    }

    #[test]
    fn rejects_out_of_range_answer() {
        let err = Question::new(QuestionId::new(1), "Gold?", options(), 4, None).unwrap_err();
        assert_eq!(err, QuestionError::CorrectAnswerOutOfRange { index: 4 });
    }

    #[test]
    fn rejects_blank_text_and_options() {
        let err = Question::new(QuestionId::new(1), "  ", options(), 0, None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);

        let mut opts = options();
        opts[2] = " ".into();
        let err = Question::new(QuestionId::new(1), "Gold?", opts, 0, None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 2 });
    }

    #[test]
    fn checks_correctness() {
        let q = Question::new(QuestionId::new(1), "Gold?", options(), 2, None).unwrap();
        assert!(q.is_correct(AnswerChoice::Option(2)));
        assert!(!q.is_correct(AnswerChoice::Option(0)));
        assert!(!q.is_correct(AnswerChoice::NoAnswer));
        assert_eq!(q.correct_option(), "Au");
    }

    #[test]
    fn deserializes_wire_shape() {
        let json = r#"{
            "id": 7,
            "question": "What is the chemical symbol for gold?",
            "options": ["Go", "Gd", "Au", "Ag"],
            "correctAnswer": 2,
            "explanation": "Latin aurum."
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id(), QuestionId::new(7));
        assert_eq!(q.correct_answer(), 2);
        assert_eq!(q.explanation(), Some("Latin aurum."));
    }

    #[test]
    fn wire_shape_requires_four_options() {
        let json = r#"{"question": "Q?", "options": ["a", "b", "c"], "correctAnswer": 0}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());

        let json = r#"{"question": "Q?", "options": ["a", "b", "c", "d"], "correctAnswer": 9}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }
}
