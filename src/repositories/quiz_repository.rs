use crate::{
    constants::storage_keys, db::LocalStore, errors::AppResult, models::domain::Quiz,
};

pub trait QuizRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    fn find_by_schedule(&self, date: &str, subject: &str) -> AppResult<Option<Quiz>>;
    fn list(&self) -> AppResult<Vec<Quiz>>;
    fn insert(&self, quiz: Quiz) -> AppResult<Quiz>;
    fn replace_all(&self, quizzes: &[Quiz]) -> AppResult<()>;
    fn delete(&self, id: &str) -> AppResult<bool>;
    /// False until the quiz collection has been written at least once.
    fn is_initialized(&self) -> AppResult<bool>;
}

pub struct LocalQuizRepository {
    store: LocalStore,
}

impl LocalQuizRepository {
    pub fn new(store: &LocalStore) -> Self {
        Self {
            store: store.clone(),
        }
    }
}

impl QuizRepository for LocalQuizRepository {
    fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.list()?.into_iter().find(|q| q.quiz_id == id))
    }

    fn find_by_schedule(&self, date: &str, subject: &str) -> AppResult<Option<Quiz>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|q| q.date == date && q.subject == subject))
    }

    fn list(&self) -> AppResult<Vec<Quiz>> {
        self.store.read_collection(storage_keys::QUIZZES)
    }

    fn insert(&self, quiz: Quiz) -> AppResult<Quiz> {
        // Re-read right before writing so a concurrent writer's records survive.
        let mut quizzes: Vec<Quiz> = self.list()?;
        quizzes.push(quiz.clone());
        self.store.write(storage_keys::QUIZZES, &quizzes)?;
        Ok(quiz)
    }

    fn replace_all(&self, quizzes: &[Quiz]) -> AppResult<()> {
        self.store.write(storage_keys::QUIZZES, quizzes)
    }

    fn delete(&self, id: &str) -> AppResult<bool> {
        let mut quizzes = self.list()?;
        let before = quizzes.len();
        quizzes.retain(|q| q.quiz_id != id);
        if quizzes.len() == before {
            return Ok(false);
        }
        self.store.write(storage_keys::QUIZZES, &quizzes)?;
        Ok(true)
    }

    fn is_initialized(&self) -> AppResult<bool> {
        self.store.contains(storage_keys::QUIZZES)
    }
}
