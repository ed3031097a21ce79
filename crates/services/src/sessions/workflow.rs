use std::sync::Arc;

use quiz_core::model::{HistoryEntry, QuizSettings};
use quiz_core::Clock;

use super::service::{AdvanceOutcome, AnswerOutcome, QuizSession, TickOutcome};
use crate::error::{HistoryServiceError, SessionError};
use crate::generator::QuestionSource;
use crate::history_service::HistoryService;

/// Orchestrates question generation, session transitions and history.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    settings: QuizSettings,
    source: Arc<dyn QuestionSource>,
    history: HistoryService,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: QuizSettings,
        source: Arc<dyn QuestionSource>,
        history: HistoryService,
    ) -> Self {
        Self {
            clock,
            settings,
            source,
            history,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// A fresh session in `Setup` using the configured time limit.
    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        QuizSession::new(&self.settings)
    }

    /// Generate questions and start `session` on them.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyTopic` for a blank topic and
    /// `SessionError::Empty` when `count` is zero.
    pub async fn start_quiz(
        &self,
        session: &mut QuizSession,
        topic: &str,
        count: usize,
        credential: Option<&str>,
    ) -> Result<(), SessionError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(SessionError::EmptyTopic);
        }
        if count == 0 {
            return Err(SessionError::Empty);
        }

        let questions = self.source.generate(topic, count, credential).await;
        session.start(topic, questions, self.clock.now())?;
        tracing::info!(topic, count = session.total_questions(), "quiz started");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidOption` if `index` is not 0-3.
    pub fn submit_answer(
        &self,
        session: &mut QuizSession,
        index: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        session.submit_answer(index, self.clock.now())
    }

    pub fn tick(&self, session: &mut QuizSession, epoch: u64) -> TickOutcome {
        let outcome = session.tick(epoch, self.clock.now());
        if let TickOutcome::TimedOut(result) = &outcome {
            tracing::debug!(
                question_index = result.question_index(),
                "time limit reached; recorded no answer"
            );
        }
        outcome
    }

    /// Advance the session; on completion the result is added to history.
    ///
    /// History failures are logged and do not affect the session.
    pub async fn advance(&self, session: &mut QuizSession) -> AdvanceOutcome {
        let outcome = session.advance(self.clock.now());
        if outcome == AdvanceOutcome::Completed {
            self.record_completion(session).await;
        }
        outcome
    }

    async fn record_completion(&self, session: &QuizSession) {
        let (Some(summary), Some(completed_at)) = (session.summary(), session.completed_at())
        else {
            return;
        };
        tracing::info!(
            topic = session.topic(),
            percentage = summary.percentage(),
            band = %summary.band(),
            "quiz completed"
        );
        if let Err(err) = self
            .history
            .record(session.topic(), &summary, completed_at)
            .await
        {
            tracing::warn!(%err, "failed to record quiz history");
        }
    }

    /// Retake the current quiz from the first question.
    pub fn restart(&self, session: &mut QuizSession) -> bool {
        session.reset(self.clock.now())
    }

    pub fn new_quiz(&self, session: &mut QuizSession) {
        session.clear();
    }

    /// # Errors
    ///
    /// Returns `HistoryServiceError` on storage failures.
    pub async fn recent_history(&self) -> Result<Vec<HistoryEntry>, HistoryServiceError> {
        self.history.recent().await
    }
}
