mod driver;
mod progress;
mod service;
mod timer;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{DriverError, SessionError};
pub use driver::{QuizCommand, SessionDriver, SessionHandle};
pub use progress::SessionProgress;
pub use service::{AdvanceOutcome, AnswerOutcome, QuizSession, SessionState, TickOutcome};
pub use timer::QuestionTimer;
pub use view::SessionSnapshot;
pub use workflow::QuizLoopService;
