//! Aggregate scoring over a finished quiz.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::model::AnswerResult;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("cannot score a quiz without results")]
    NoResults,

    #[error("too many results for a single quiz: {len}")]
    TooManyResults { len: usize },
}

/// Qualitative label derived from the score percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PerformanceBand {
    Outstanding,
    Excellent,
    Good,
    NotBad,
    KeepPracticing,
}

impl PerformanceBand {
    /// Bands are evaluated top-down; each lower bound is inclusive.
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::Outstanding,
            80..=89 => Self::Excellent,
            70..=79 => Self::Good,
            60..=69 => Self::NotBad,
            _ => Self::KeepPracticing,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Outstanding => "Outstanding",
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NotBad => "Not bad",
            Self::KeepPracticing => "Keep practicing",
        }
    }
}

impl fmt::Display for PerformanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary of a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    total_questions: u32,
    correct: u32,
    percentage: u32,
    total_time_secs: u32,
    average_time_secs: u32,
    band: PerformanceBand,
}

impl ScoreSummary {
    /// Score a finished result list.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::NoResults` for an empty list, and
    /// `ScoreError::TooManyResults` if the count does not fit in a `u32`.
    pub fn from_results(results: &[AnswerResult]) -> Result<Self, ScoreError> {
        if results.is_empty() {
            return Err(ScoreError::NoResults);
        }
        let total = u32::try_from(results.len())
            .map_err(|_| ScoreError::TooManyResults { len: results.len() })?;

        let mut correct = 0_u32;
        let mut total_time = 0_u32;
        for result in results {
            if result.is_correct() {
                correct = correct.saturating_add(1);
            }
            total_time = total_time.saturating_add(result.time_taken_secs());
        }

        let percentage = rounded_ratio(u64::from(correct) * 100, u64::from(total));
        Ok(Self {
            total_questions: total,
            correct,
            percentage,
            total_time_secs: total_time,
            average_time_secs: rounded_ratio(u64::from(total_time), u64::from(total)),
            band: PerformanceBand::from_percentage(percentage),
        })
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.total_questions - self.correct
    }

    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn total_time_secs(&self) -> u32 {
        self.total_time_secs
    }

    #[must_use]
    pub fn average_time_secs(&self) -> u32 {
        self.average_time_secs
    }

    #[must_use]
    pub fn band(&self) -> PerformanceBand {
        self.band
    }

    /// One-line brag for sharing a result.
    #[must_use]
    pub fn share_text(&self, topic: &str) -> String {
        format!(
            "I just scored {}% on a {topic} quiz! Got {}/{} questions right.",
            self.percentage, self.correct, self.total_questions
        )
    }
}

/// `numerator / denominator` rounded to the nearest integer, halves up.
fn rounded_ratio(numerator: u64, denominator: u64) -> u32 {
    let value = (2 * numerator + denominator) / (2 * denominator);
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Formats seconds as `m:ss`.
#[must_use]
pub fn format_duration(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
