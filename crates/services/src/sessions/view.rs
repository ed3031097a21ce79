use quiz_core::ScoreSummary;
use quiz_core::model::{AnswerChoice, AnswerResult, Question};

use super::service::{QuizSession, SessionState};

/// Read-only picture of a session for the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// A question list is being generated.
    pub loading: bool,
    pub topic: String,
    pub question: Option<Question>,
    /// 1-based position of the live question.
    pub question_number: usize,
    pub total_questions: usize,
    pub time_remaining_secs: u32,
    pub is_answered: bool,
    pub selected_answer: Option<AnswerChoice>,
    pub last_result: Option<AnswerResult>,
    pub summary: Option<ScoreSummary>,
    pub error: Option<String>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: SessionState::Setup,
            loading: false,
            topic: String::new(),
            question: None,
            question_number: 0,
            total_questions: 0,
            time_remaining_secs: 0,
            is_answered: false,
            selected_answer: None,
            last_result: None,
            summary: None,
            error: None,
        }
    }
}

impl QuizSession {
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_session(self)
    }
}

impl SessionSnapshot {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        let in_progress = session.state() == SessionState::InProgress;
        Self {
            state: session.state(),
            loading: false,
            topic: session.topic().to_owned(),
            question: session.current_question().cloned(),
            question_number: if in_progress {
                session.current_index() + 1
            } else {
                0
            },
            total_questions: session.total_questions(),
            time_remaining_secs: session.time_remaining(),
            is_answered: session.is_answered(),
            selected_answer: session.selected_answer(),
            last_result: session.results().last().cloned(),
            summary: session.summary(),
            error: None,
        }
    }

    #[must_use]
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}
