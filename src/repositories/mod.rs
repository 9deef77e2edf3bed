pub mod quiz_attempt_repository;
pub mod quiz_repository;
pub mod session_repository;

pub use quiz_attempt_repository::{LocalQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{LocalQuizRepository, QuizRepository};
pub use session_repository::{LocalSessionRepository, SessionRepository};
