use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::Config,
    db::LocalStore,
    errors::{AppError, AppResult},
    repositories::{
        LocalQuizAttemptRepository, LocalQuizRepository, LocalSessionRepository,
        QuizAttemptRepository, QuizRepository, SessionRepository,
    },
    services::{
        AdminService, CatalogService, HttpQuizBackend, LeaderboardService, LiveSession,
        LoggingObserver, QuizBackend, QuizSessionService, SyncService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub store: LocalStore,
    pub catalog_service: Arc<CatalogService>,
    pub session_service: Arc<QuizSessionService>,
    pub admin_service: Arc<AdminService>,
    pub leaderboard_service: Arc<LeaderboardService>,
    pub sync_service: Arc<SyncService>,
    pub live_session: Arc<Mutex<Option<Arc<LiveSession>>>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let store = LocalStore::open(&config)?;
        let backend_url = config
            .backend_configured()
            .then(|| config.backend_url.clone())
            .flatten();
        let backend = Arc::new(HttpQuizBackend::new(backend_url));
        Ok(Self::with_parts(store, backend, config))
    }

    /// Wires every service over one store and one backend.
    pub fn with_parts(store: LocalStore, backend: Arc<dyn QuizBackend>, config: Config) -> Self {
        let quizzes: Arc<dyn QuizRepository> = Arc::new(LocalQuizRepository::new(&store));
        let attempts: Arc<dyn QuizAttemptRepository> =
            Arc::new(LocalQuizAttemptRepository::new(&store));
        let sessions: Arc<dyn SessionRepository> = Arc::new(LocalSessionRepository::new(&store));

        let sync_service = Arc::new(SyncService::new(
            backend.clone(),
            quizzes.clone(),
            attempts.clone(),
        ));
        let catalog_service = Arc::new(CatalogService::new(
            quizzes.clone(),
            attempts.clone(),
            sessions.clone(),
            config.duplicate_attempt_policy,
        ));
        let session_service = Arc::new(QuizSessionService::new(
            quizzes.clone(),
            attempts.clone(),
            sessions.clone(),
            backend.clone(),
            config.time_warning_secs,
        ));
        let admin_service = Arc::new(AdminService::new(
            store.clone(),
            quizzes.clone(),
            attempts.clone(),
            backend.clone(),
            sync_service.clone(),
            config.backend_configured(),
        ));
        let leaderboard_service = Arc::new(LeaderboardService::new(
            quizzes, attempts, sessions, backend,
        ));

        Self {
            store,
            catalog_service,
            session_service,
            admin_service,
            leaderboard_service,
            sync_service,
            live_session: Arc::new(Mutex::new(None)),
            config: Arc::new(config),
        }
    }

    /// Opens the quiz bound to the user session, reusing the running one when it is
    /// still the same quiz and still open.
    pub async fn open_live_session(&self) -> AppResult<Arc<LiveSession>> {
        let mut slot = self.live_session.lock().await;
        let wanted = self
            .catalog_service
            .current_session()?
            .and_then(|session| session.current_quiz_id);

        if let Some(live) = slot.as_ref() {
            let running = live.quiz_id().await;
            if live.exit_guard_active().await && wanted.as_deref() == Some(running.as_str()) {
                return Ok(live.clone());
            }
            live.leave().await?;
        }

        let quiz = self.session_service.load()?;
        let live = Arc::new(LiveSession::start(
            quiz,
            self.session_service.clone(),
            Arc::new(LoggingObserver),
            self.config.autosave_interval(),
        ));
        *slot = Some(live.clone());
        Ok(live)
    }

    pub async fn live(&self) -> AppResult<Arc<LiveSession>> {
        self.live_session
            .lock()
            .await
            .clone()
            .ok_or_else(|| AppError::NotFound("No quiz in progress".to_string()))
    }

    /// Stops the running quiz, saving its progress. Returns false when none was running.
    pub async fn close_live_session(&self) -> AppResult<bool> {
        let Some(live) = self.live_session.lock().await.take() else {
            return Ok(false);
        };
        live.leave().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::UserSession,
        services::remote_client::MockQuizBackend,
        test_utils::fixtures::quiz_with_questions,
    };

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[actix_web::test]
    async fn test_open_reuses_running_session() {
        let store = LocalStore::in_memory();
        let quiz = LocalQuizRepository::new(&store)
            .insert(quiz_with_questions("2025-01-01", "English", 3))
            .unwrap();
        LocalSessionRepository::new(&store)
            .save_session(&UserSession::new("Test User", "t@e.com", &quiz.quiz_id))
            .unwrap();
        let state = AppState::with_parts(
            store,
            Arc::new(MockQuizBackend::new()),
            Config::test_config(),
        );

        let first = state.open_live_session().await.unwrap();
        first.on_answer_selected(2).await.unwrap();
        let second = state.open_live_session().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        assert!(state.close_live_session().await.unwrap());
        assert!(matches!(state.live().await, Err(AppError::NotFound(_))));

        let resumed = state.open_live_session().await.unwrap();
        assert_eq!(resumed.view().await.answered, 1);
        assert!(state.close_live_session().await.unwrap());
    }
}
