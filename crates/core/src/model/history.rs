use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::ScoreSummary;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryEntryError {
    #[error("history topic cannot be empty")]
    EmptyTopic,

    #[error("history entry must cover at least one question")]
    NoQuestions,

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("score {0} is not a percentage")]
    InvalidScore(u32),
}

/// One completed quiz, as kept in the capped history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HistoryEntryWire", into = "HistoryEntryWire")]
pub struct HistoryEntry {
    topic: String,
    score: u32,
    correct_answers: u32,
    total_questions: u32,
    date: DateTime<Utc>,
    total_time: u32,
}

impl HistoryEntry {
    /// Build an entry from a finished quiz summary.
    ///
    /// # Errors
    ///
    /// Returns `HistoryEntryError::EmptyTopic` if the topic is blank.
    pub fn from_summary(
        topic: &str,
        summary: &ScoreSummary,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, HistoryEntryError> {
        Self::from_persisted(
            topic.to_owned(),
            summary.percentage(),
            summary.correct(),
            summary.total_questions(),
            completed_at,
            summary.total_time_secs(),
        )
    }

    /// Rehydrate an entry from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `HistoryEntryError` if the counts or score are inconsistent.
    pub fn from_persisted(
        topic: String,
        score: u32,
        correct_answers: u32,
        total_questions: u32,
        date: DateTime<Utc>,
        total_time: u32,
    ) -> Result<Self, HistoryEntryError> {
        if topic.trim().is_empty() {
            return Err(HistoryEntryError::EmptyTopic);
        }
        if total_questions == 0 {
            return Err(HistoryEntryError::NoQuestions);
        }
        if correct_answers > total_questions {
            return Err(HistoryEntryError::CountMismatch {
                correct: correct_answers,
                total: total_questions,
            });
        }
        if score > 100 {
            return Err(HistoryEntryError::InvalidScore(score));
        }

        Ok(Self {
            topic,
            score,
            correct_answers,
            total_questions,
            date,
            total_time,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    #[must_use]
    pub fn total_time_secs(&self) -> u32 {
        self.total_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryEntryWire {
    topic: String,
    score: u32,
    correct_answers: u32,
    total_questions: u32,
    date: DateTime<Utc>,
    total_time: u32,
}

impl TryFrom<HistoryEntryWire> for HistoryEntry {
    type Error = HistoryEntryError;

    fn try_from(wire: HistoryEntryWire) -> Result<Self, Self::Error> {
        HistoryEntry::from_persisted(
            wire.topic,
            wire.score,
            wire.correct_answers,
            wire.total_questions,
            wire.date,
            wire.total_time,
        )
    }
}

impl From<HistoryEntry> for HistoryEntryWire {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            topic: entry.topic,
            score: entry.score,
            correct_answers: entry.correct_answers,
            total_questions: entry.total_questions,
            date: entry.date,
            total_time: entry.total_time,
        }
    }
}
