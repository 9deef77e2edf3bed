use crate::{
    constants::storage_keys,
    db::LocalStore,
    errors::AppResult,
    models::domain::{QuizResults, QuizState, UserSession},
};

/// Ephemeral per-profile records: the active user session, in-progress
/// snapshots, and the last results.
pub trait SessionRepository: Send + Sync {
    fn current_session(&self) -> AppResult<Option<UserSession>>;
    fn save_session(&self, session: &UserSession) -> AppResult<()>;
    fn clear_session(&self) -> AppResult<()>;

    fn load_state(&self, quiz_id: &str) -> AppResult<Option<QuizState>>;
    fn save_state(&self, state: &QuizState) -> AppResult<()>;
    fn delete_state(&self, quiz_id: &str) -> AppResult<()>;

    fn load_results(&self) -> AppResult<Option<QuizResults>>;
    fn save_results(&self, results: &QuizResults) -> AppResult<()>;
    fn clear_results(&self) -> AppResult<()>;
}

pub struct LocalSessionRepository {
    store: LocalStore,
}

impl LocalSessionRepository {
    pub fn new(store: &LocalStore) -> Self {
        Self {
            store: store.clone(),
        }
    }
}

impl SessionRepository for LocalSessionRepository {
    fn current_session(&self) -> AppResult<Option<UserSession>> {
        self.store.read(storage_keys::USER_SESSION)
    }

    fn save_session(&self, session: &UserSession) -> AppResult<()> {
        self.store.write(storage_keys::USER_SESSION, session)
    }

    fn clear_session(&self) -> AppResult<()> {
        self.store.remove(storage_keys::USER_SESSION)
    }

    fn load_state(&self, quiz_id: &str) -> AppResult<Option<QuizState>> {
        self.store.read(&storage_keys::quiz_state(quiz_id))
    }

    fn save_state(&self, state: &QuizState) -> AppResult<()> {
        self.store
            .write(&storage_keys::quiz_state(&state.quiz_id), state)
    }

    fn delete_state(&self, quiz_id: &str) -> AppResult<()> {
        self.store.remove(&storage_keys::quiz_state(quiz_id))
    }

    fn load_results(&self) -> AppResult<Option<QuizResults>> {
        self.store.read(storage_keys::CURRENT_QUIZ_RESULTS)
    }

    fn save_results(&self, results: &QuizResults) -> AppResult<()> {
        self.store.write(storage_keys::CURRENT_QUIZ_RESULTS, results)
    }

    fn clear_results(&self) -> AppResult<()> {
        self.store.remove(storage_keys::CURRENT_QUIZ_RESULTS)
    }
}
