pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_question;
pub mod quiz_results;
pub mod quiz_state;
pub mod user_session;
pub use quiz::Quiz;
pub use quiz_attempt::{AttemptKey, QuizAttempt};
pub use quiz_question::QuizQuestion;
pub use quiz_results::QuizResults;
pub use quiz_state::{QuizState, UserAnswers};
pub use user_session::UserSession;
