#[cfg(test)]
pub mod fixtures {
    use chrono::Utc;

    use crate::models::domain::{Quiz, QuizAttempt, QuizQuestion, UserSession};

    /// Question `i` has correct answer `i % 4`.
    pub fn questions(count: usize) -> Vec<QuizQuestion> {
        (0..count)
            .map(|i| {
                QuizQuestion::new(
                    &format!("Question {}?", i + 1),
                    ["Option A", "Option B", "Option C", "Option D"],
                    (i % 4) as u8,
                    &format!("Explanation {}", i + 1),
                )
            })
            .collect()
    }

    pub fn quiz_with_questions(date: &str, subject: &str, count: usize) -> Quiz {
        Quiz::new(date, subject, questions(count))
    }

    pub fn attempt(email: &str, quiz_id: &str, date: &str, score: u32) -> QuizAttempt {
        QuizAttempt {
            attempt_id: QuizAttempt::new_attempt_id(),
            quiz_id: quiz_id.to_string(),
            user_name: "Test User".to_string(),
            email: email.to_string(),
            score,
            total: 5,
            accuracy: f64::from(score) * 20.0,
            time: "02:30".to_string(),
            date: date.to_string(),
            timestamp: Some(Utc::now()),
        }
    }

    pub fn user_session(quiz_id: &str) -> UserSession {
        UserSession::new("Test User", "test@example.com", quiz_id)
    }
}

#[cfg(test)]
pub mod stores {
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::{
        db::{KeyValueStore, MemoryStore},
        errors::{AppError, AppResult},
    };

    /// In-memory store whose writes or removals can be made to fail.
    #[derive(Default)]
    pub struct FlakyStore {
        inner: MemoryStore,
        fail_set: AtomicBool,
        fail_remove: AtomicBool,
    }

    impl FlakyStore {
        pub fn fail_writes(&self, fail: bool) {
            self.fail_set.store(fail, Ordering::SeqCst);
        }

        pub fn fail_removes(&self, fail: bool) {
            self.fail_remove.store(fail, Ordering::SeqCst);
        }

        fn disk_error() -> AppError {
            AppError::StorageError("disk".to_string())
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> AppResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> AppResult<()> {
            if self.fail_set.load(Ordering::SeqCst) {
                return Err(Self::disk_error());
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> AppResult<()> {
            if self.fail_remove.load(Ordering::SeqCst) {
                return Err(Self::disk_error());
            }
            self.inner.remove(key)
        }

        fn clear(&self) -> AppResult<()> {
            self.inner.clear()
        }

        fn keys(&self) -> AppResult<Vec<String>> {
            self.inner.keys()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_questions_cycle_correct_answers() {
        let qs = questions(6);
        let answers: Vec<u8> = qs.iter().map(|q| q.correct_answer).collect();
        assert_eq!(answers, vec![0, 1, 2, 3, 0, 1]);
    }

    #[test]
    fn test_fixture_quiz_defaults() {
        let quiz = quiz_with_questions("2025-01-01", "English", 5);
        assert_eq!(quiz.total_questions, 5);
        assert_eq!(quiz.time_limit, 300);
    }
}
