mod answer;
mod history;
mod ids;
mod question;
mod settings;

pub use answer::{AnswerChoice, AnswerChoiceError, AnswerResult, NO_ANSWER_WIRE};
pub use history::{HistoryEntry, HistoryEntryError};
pub use ids::{ParseIdError, QuestionId};
pub use question::{OPTION_COUNT, Question, QuestionError};
pub use settings::{QuizSettings, QuizSettingsDraft, QuizSettingsError};
