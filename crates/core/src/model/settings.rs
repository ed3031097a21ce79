use thiserror::Error;

pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;
pub const DEFAULT_HISTORY_CAP: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSettingsError {
    #[error("time limit must be > 0")]
    InvalidTimeLimit,

    #[error("history cap must be > 0")]
    InvalidHistoryCap,

    #[error("question count bounds are invalid: {min}..={max}")]
    InvalidQuestionBounds { min: u32, max: u32 },

    #[error("default question count {value} is outside {min}..={max}")]
    InvalidDefaultQuestionCount { value: u32, min: u32, max: u32 },
}

/// Tunables for a quiz session and its history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSettings {
    time_limit_secs: u32,
    history_cap: u32,
    default_question_count: u32,
    min_question_count: u32,
    max_question_count: u32,
}

#[derive(Clone, Debug, Default)]
pub struct QuizSettingsDraft {
    pub time_limit_secs: Option<u32>,
    pub history_cap: Option<u32>,
    pub default_question_count: Option<u32>,
    pub min_question_count: Option<u32>,
    pub max_question_count: Option<u32>,
}

impl QuizSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft, filling unset fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError` for zero limits or inconsistent count bounds.
    pub fn validate(self) -> Result<QuizSettings, QuizSettingsError> {
        let defaults = QuizSettings::default();
        let time_limit_secs = self.time_limit_secs.unwrap_or(defaults.time_limit_secs);
        let history_cap = self.history_cap.unwrap_or(defaults.history_cap);
        let min = self.min_question_count.unwrap_or(defaults.min_question_count);
        let max = self.max_question_count.unwrap_or(defaults.max_question_count);
        let default_count = self
            .default_question_count
            .unwrap_or(defaults.default_question_count);

        if time_limit_secs == 0 {
            return Err(QuizSettingsError::InvalidTimeLimit);
        }
        if history_cap == 0 {
            return Err(QuizSettingsError::InvalidHistoryCap);
        }
        if min == 0 || min > max {
            return Err(QuizSettingsError::InvalidQuestionBounds { min, max });
        }
        if !(min..=max).contains(&default_count) {
            return Err(QuizSettingsError::InvalidDefaultQuestionCount {
                value: default_count,
                min,
                max,
            });
        }

        Ok(QuizSettings {
            time_limit_secs,
            history_cap,
            default_question_count: default_count,
            min_question_count: min,
            max_question_count: max,
        })
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            history_cap: DEFAULT_HISTORY_CAP,
            default_question_count: 5,
            min_question_count: 3,
            max_question_count: 15,
        }
    }
}

impl QuizSettings {
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn history_cap(&self) -> u32 {
        self.history_cap
    }

    #[must_use]
    pub fn default_question_count(&self) -> u32 {
        self.default_question_count
    }

    #[must_use]
    pub fn min_question_count(&self) -> u32 {
        self.min_question_count
    }

    #[must_use]
    pub fn max_question_count(&self) -> u32 {
        self.max_question_count
    }

    /// Clamp a requested question count into the configured bounds.
    #[must_use]
    pub fn clamp_question_count(&self, requested: u32) -> u32 {
        requested.clamp(self.min_question_count, self.max_question_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_quiz_setup() {
        let settings = QuizSettings::default();
        assert_eq!(settings.time_limit_secs(), 30);
        assert_eq!(settings.history_cap(), 10);
        assert_eq!(settings.default_question_count(), 5);
        assert_eq!(settings.clamp_question_count(1), 3);
        assert_eq!(settings.clamp_question_count(40), 15);
        assert_eq!(settings.clamp_question_count(7), 7);
    }

    #[test]
    fn draft_rejects_zero_time_limit() {
        let draft = QuizSettingsDraft {
            time_limit_secs: Some(0),
            ..QuizSettingsDraft::new()
        };
        assert_eq!(draft.validate(), Err(QuizSettingsError::InvalidTimeLimit));
    }

    #[test]
    fn draft_rejects_inverted_bounds() {
        let draft = QuizSettingsDraft {
            min_question_count: Some(10),
            max_question_count: Some(4),
            ..QuizSettingsDraft::new()
        };
        assert_eq!(
            draft.validate(),
            Err(QuizSettingsError::InvalidQuestionBounds { min: 10, max: 4 })
        );
    }

    #[test]
    fn draft_overrides_defaults() {
        let settings = QuizSettingsDraft {
            time_limit_secs: Some(10),
            history_cap: Some(3),
            ..QuizSettingsDraft::new()
        }
        .validate()
        .unwrap();
        assert_eq!(settings.time_limit_secs(), 10);
        assert_eq!(settings.history_cap(), 3);
        assert_eq!(settings.max_question_count(), 15);
    }
}
