//! Storage key names. These match the keys existing browser profiles were written
//! with and must not change.

pub const QUIZZES: &str = "quizzes";
pub const QUIZ_ATTEMPTS: &str = "quizAttempts";
pub const USER_SESSION: &str = "userSession";
pub const CURRENT_QUIZ_RESULTS: &str = "currentQuizResults";

const QUIZ_STATE_PREFIX: &str = "quizState_";
const BACKUP_PREFIX: &str = "backup_";

pub fn quiz_state(quiz_id: &str) -> String {
    format!("{}{}", QUIZ_STATE_PREFIX, quiz_id)
}

pub fn backup(millis: i64) -> String {
    format!("{}{}", BACKUP_PREFIX, millis)
}

pub fn is_backup(key: &str) -> bool {
    key.starts_with(BACKUP_PREFIX)
}
