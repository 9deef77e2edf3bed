use crate::{
    constants::storage_keys, db::LocalStore, errors::AppResult, models::domain::QuizAttempt,
};

pub trait QuizAttemptRepository: Send + Sync {
    fn append(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    fn list(&self) -> AppResult<Vec<QuizAttempt>>;
    fn find_by_user_and_quiz(&self, email: &str, quiz_id: &str) -> AppResult<Vec<QuizAttempt>>;
    fn list_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>>;
    fn replace_all(&self, attempts: &[QuizAttempt]) -> AppResult<()>;
    fn delete(&self, attempt_id: &str) -> AppResult<bool>;
}

pub struct LocalQuizAttemptRepository {
    store: LocalStore,
}

impl LocalQuizAttemptRepository {
    pub fn new(store: &LocalStore) -> Self {
        Self {
            store: store.clone(),
        }
    }
}

impl QuizAttemptRepository for LocalQuizAttemptRepository {
    fn append(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        // Always append to what is stored now, never to an earlier in-memory copy.
        let mut attempts = self.list()?;
        attempts.push(attempt.clone());
        self.store.write(storage_keys::QUIZ_ATTEMPTS, &attempts)?;
        Ok(attempt)
    }

    fn list(&self) -> AppResult<Vec<QuizAttempt>> {
        self.store.read_collection(storage_keys::QUIZ_ATTEMPTS)
    }

    fn find_by_user_and_quiz(&self, email: &str, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|a| a.belongs_to(email, quiz_id))
            .collect())
    }

    fn list_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|a| a.quiz_id == quiz_id)
            .collect())
    }

    fn replace_all(&self, attempts: &[QuizAttempt]) -> AppResult<()> {
        self.store.write(storage_keys::QUIZ_ATTEMPTS, attempts)
    }

    fn delete(&self, attempt_id: &str) -> AppResult<bool> {
        let mut attempts = self.list()?;
        let before = attempts.len();
        attempts.retain(|a| a.attempt_id != attempt_id);
        if attempts.len() == before {
            return Ok(false);
        }
        self.store.write(storage_keys::QUIZ_ATTEMPTS, &attempts)?;
        Ok(true)
    }
}
