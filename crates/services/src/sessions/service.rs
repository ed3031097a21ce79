use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::ScoreSummary;
use quiz_core::model::{AnswerChoice, AnswerResult, Question, QuizSettings};
use quiz_core::time::elapsed_secs;

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STATES AND OUTCOMES ───────────────────────────────────────────────────────
//

/// Where a quiz attempt is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Setup,
    InProgress,
    Completed,
}

/// Result of `submit_answer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Recorded(AnswerResult),
    /// The question was already answered or no quiz is running.
    Ignored,
}

/// Result of a one-second countdown tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Counting { remaining: u32 },
    /// The countdown reached zero and the question was auto-submitted.
    TimedOut(AnswerResult),
    /// Stale epoch, already answered, or no quiz running.
    Ignored,
}

/// Result of `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion { index: usize },
    Completed,
    /// The current question is not answered yet, or no quiz is running.
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State machine for one quiz attempt: Setup → InProgress → Completed.
///
/// Every transition takes `now` from the caller so timing stays
/// deterministic. Invalid transitions are no-ops reported through the
/// outcome enums rather than errors.
///
/// `epoch` changes whenever the live question changes; countdown ticks carry
/// the epoch they were scheduled for, and ticks from an older epoch are
/// ignored.
pub struct QuizSession {
    state: SessionState,
    time_limit_secs: u32,
    topic: String,
    questions: Vec<Question>,
    current: usize,
    results: Vec<AnswerResult>,
    answered: bool,
    selected: Option<AnswerChoice>,
    started_at: Option<DateTime<Utc>>,
    question_started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    time_remaining: u32,
    epoch: u64,
}

impl QuizSession {
    #[must_use]
    pub fn new(settings: &QuizSettings) -> Self {
        Self::with_time_limit(settings.time_limit_secs())
    }

    /// A session in `Setup` with the given per-question limit (at least 1s).
    #[must_use]
    pub fn with_time_limit(time_limit_secs: u32) -> Self {
        let time_limit_secs = time_limit_secs.max(1);
        Self {
            state: SessionState::Setup,
            time_limit_secs,
            topic: String::new(),
            questions: Vec::new(),
            current: 0,
            results: Vec::new(),
            answered: false,
            selected: None,
            started_at: None,
            question_started_at: None,
            completed_at: None,
            time_remaining: time_limit_secs,
            epoch: 0,
        }
    }

    /// Begin a quiz over `questions`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty.
    pub fn start(
        &mut self,
        topic: impl Into<String>,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        self.topic = topic.into();
        self.questions = questions;
        self.restart_at_first(now);
        Ok(())
    }

    /// Answer the live question with option `index`.
    ///
    /// A second call for the same question is ignored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` if `index` is not 0-3.
    pub fn submit_answer(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        if !self.accepts_answer() {
            return Ok(AnswerOutcome::Ignored);
        }
        let choice = AnswerChoice::option(index)?;
        Ok(self
            .record(choice, now)
            .map_or(AnswerOutcome::Ignored, AnswerOutcome::Recorded))
    }

    /// Count down one second for the question identified by `epoch`.
    pub fn tick(&mut self, epoch: u64, now: DateTime<Utc>) -> TickOutcome {
        if epoch != self.epoch || !self.accepts_answer() {
            return TickOutcome::Ignored;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return TickOutcome::Counting {
                remaining: self.time_remaining,
            };
        }
        self.record(AnswerChoice::NoAnswer, now)
            .map_or(TickOutcome::Ignored, TickOutcome::TimedOut)
    }

    /// Move past an answered question, completing the quiz after the last one.
    pub fn advance(&mut self, now: DateTime<Utc>) -> AdvanceOutcome {
        if self.state != SessionState::InProgress || !self.answered {
            return AdvanceOutcome::Ignored;
        }
        if self.current + 1 >= self.questions.len() {
            self.state = SessionState::Completed;
            self.completed_at = Some(now);
            self.epoch += 1;
            return AdvanceOutcome::Completed;
        }
        self.current += 1;
        self.begin_question(now);
        AdvanceOutcome::NextQuestion {
            index: self.current,
        }
    }

    /// Retake the same questions from the first one.
    ///
    /// Returns `false` (no-op) while in `Setup`.
    pub fn reset(&mut self, now: DateTime<Utc>) -> bool {
        if self.state == SessionState::Setup {
            return false;
        }
        self.restart_at_first(now);
        true
    }

    /// Discard everything and return to `Setup`.
    pub fn clear(&mut self) {
        self.state = SessionState::Setup;
        self.topic.clear();
        self.questions.clear();
        self.results.clear();
        self.current = 0;
        self.answered = false;
        self.selected = None;
        self.started_at = None;
        self.question_started_at = None;
        self.completed_at = None;
        self.time_remaining = self.time_limit_secs;
        self.epoch += 1;
    }

    fn accepts_answer(&self) -> bool {
        self.state == SessionState::InProgress && !self.answered
    }

    fn restart_at_first(&mut self, now: DateTime<Utc>) {
        self.state = SessionState::InProgress;
        self.current = 0;
        self.results.clear();
        self.started_at = Some(now);
        self.completed_at = None;
        self.begin_question(now);
    }

    fn begin_question(&mut self, now: DateTime<Utc>) {
        self.question_started_at = Some(now);
        self.answered = false;
        self.selected = None;
        self.time_remaining = self.time_limit_secs;
        self.epoch += 1;
    }

    fn record(&mut self, choice: AnswerChoice, now: DateTime<Utc>) -> Option<AnswerResult> {
        let question = self.questions.get(self.current)?;
        let time_taken = self
            .question_started_at
            .map_or(0, |started| elapsed_secs(started, now));
        let result = AnswerResult::record(self.current, question, choice, time_taken);

        self.results.push(result.clone());
        self.answered = true;
        self.selected = Some(choice);
        Some(result)
    }

    //
    // ─── OBSERVERS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Completed
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.state == SessionState::InProgress {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<AnswerChoice> {
        self.selected
    }

    #[must_use]
    pub fn results(&self) -> &[AnswerResult] {
        &self.results
    }

    /// Identifies the live question for countdown ticks.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a countdown should be running right now.
    #[must_use]
    pub fn countdown_active(&self) -> bool {
        self.accepts_answer()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.results.len(),
            remaining: self.total_questions().saturating_sub(self.results.len()),
            is_complete: self.is_complete(),
        }
    }

    /// Score summary, available once the quiz is completed.
    #[must_use]
    pub fn summary(&self) -> Option<ScoreSummary> {
        if !self.is_complete() {
            return None;
        }
        ScoreSummary::from_results(&self.results).ok()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("state", &self.state)
            .field("topic", &self.topic)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("results_len", &self.results.len())
            .field("answered", &self.answered)
            .field("time_remaining", &self.time_remaining)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
