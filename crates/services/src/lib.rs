#![forbid(unsafe_code)]

pub mod error;
pub mod generator;
pub mod history_service;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{GenerationError, HistoryServiceError, SessionError};
pub use generator::{GeneratorConfig, QuestionGenerator, QuestionSource};
pub use history_service::HistoryService;
pub use sessions::{
    AdvanceOutcome, AnswerOutcome, QuizCommand, QuizLoopService, QuizSession, SessionDriver,
    SessionHandle, SessionSnapshot, SessionState, TickOutcome,
};
