use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::QuizState, dto::response::{RemoteOutcome, SubmissionReceipt}},
    repositories::{QuizAttemptRepository, QuizRepository, SessionRepository},
    services::{
        quiz_session::{QuizSession, SubmissionDraft},
        remote_client::{AttemptSubmission, QuizBackend},
    },
};

/// Loads sessions from storage and writes their snapshots and submissions back.
pub struct QuizSessionService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    sessions: Arc<dyn SessionRepository>,
    backend: Arc<dyn QuizBackend>,
    warning_secs: i64,
}

impl QuizSessionService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        sessions: Arc<dyn SessionRepository>,
        backend: Arc<dyn QuizBackend>,
        warning_secs: i64,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            sessions,
            backend,
            warning_secs,
        }
    }

    /// Opens the quiz bound to the current user session, resuming a saved snapshot
    /// when one exists. A fresh start is persisted immediately.
    pub fn load(&self) -> AppResult<QuizSession> {
        let user = self
            .sessions
            .current_session()?
            .ok_or_else(|| AppError::NotFound("No quiz selected".to_string()))?;
        let quiz_id = user
            .current_quiz_id
            .clone()
            .ok_or_else(|| AppError::NotFound("No quiz selected".to_string()))?;
        let quiz = self
            .quizzes
            .find_by_id(&quiz_id)?
            .ok_or_else(|| AppError::NotFound("Quiz data not found".to_string()))?;

        let state = match self.sessions.load_state(&quiz_id)? {
            Some(saved) => {
                log::info!(
                    "Resuming quiz {} at question {} with {}s left",
                    quiz_id,
                    saved.current_question_index + 1,
                    saved.time_remaining
                );
                saved
            }
            None => {
                let fresh = QuizState::fresh(&quiz_id, quiz.time_limit);
                self.sessions.save_state(&fresh)?;
                log::info!("Starting quiz {} for {}", quiz_id, user.email);
                fresh
            }
        };

        Ok(QuizSession::new(quiz, user, state, self.warning_secs))
    }

    pub fn save_state(&self, session: &QuizSession) -> AppResult<()> {
        self.sessions.save_state(&session.snapshot())
    }

    /// Writes a submission: the attempt, then the results snapshot, then the remote
    /// copy, then drops the in-progress snapshot. Once the attempt is stored the
    /// submission is final, so only that first write can fail this call.
    pub async fn record_submission(&self, draft: SubmissionDraft) -> AppResult<SubmissionReceipt> {
        let SubmissionDraft { results, attempt } = draft;

        let attempt = self.attempts.append(attempt)?;
        if let Err(err) = self.sessions.save_results(&results) {
            log::warn!(
                "Results for quiz {} were not cached: {}",
                attempt.quiz_id,
                err
            );
        }

        let remote = match serde_json::to_string(&results.answers) {
            Ok(answers_json) => {
                let submission = AttemptSubmission::from_attempt(&attempt, answers_json);
                match self.backend.submit_attempt(&submission).await {
                    Ok(_) => {
                        log::info!("Attempt for quiz {} sent to backend", attempt.quiz_id);
                        RemoteOutcome::Synced
                    }
                    Err(err) => {
                        log::warn!(
                            "Attempt for quiz {} saved locally only: {}",
                            attempt.quiz_id,
                            err
                        );
                        RemoteOutcome::SavedLocallyOnly {
                            reason: err.to_string(),
                        }
                    }
                }
            }
            Err(err) => RemoteOutcome::SavedLocallyOnly {
                reason: err.to_string(),
            },
        };

        if let Err(err) = self.sessions.delete_state(&attempt.quiz_id) {
            log::warn!(
                "Saved state for quiz {} could not be removed: {}",
                attempt.quiz_id,
                err
            );
        }

        Ok(SubmissionReceipt {
            results,
            attempt,
            remote,
        })
    }

    /// Submits a session that is not shared with a running timer.
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        visible: Option<u8>,
    ) -> AppResult<SubmissionReceipt> {
        let draft = session.begin_submit(visible)?;
        match self.record_submission(draft).await {
            Ok(receipt) => {
                session.complete_submit();
                Ok(receipt)
            }
            Err(err) => {
                session.abort_submit();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::LocalStore,
        models::domain::UserSession,
        repositories::{LocalQuizAttemptRepository, LocalQuizRepository, LocalSessionRepository},
        services::remote_client::MockQuizBackend,
        test_utils::{
            fixtures::{quiz_with_questions, user_session},
            stores::FlakyStore,
        },
    };

    struct Harness {
        store: LocalStore,
        service: QuizSessionService,
    }

    fn harness(backend: MockQuizBackend) -> Harness {
        harness_over(LocalStore::in_memory(), backend)
    }

    fn harness_over(store: LocalStore, backend: MockQuizBackend) -> Harness {
        let service = QuizSessionService::new(
            Arc::new(LocalQuizRepository::new(&store)),
            Arc::new(LocalQuizAttemptRepository::new(&store)),
            Arc::new(LocalSessionRepository::new(&store)),
            Arc::new(backend),
            120,
        );
        Harness { store, service }
    }

    fn seed_quiz(store: &LocalStore, questions: usize) -> String {
        let quiz = quiz_with_questions("2025-01-01", "English", questions);
        let id = quiz.quiz_id.clone();
        LocalQuizRepository::new(store).insert(quiz).unwrap();
        LocalSessionRepository::new(store)
            .save_session(&user_session(&id))
            .unwrap();
        id
    }

    #[test]
    fn load_without_session_is_not_found() {
        let h = harness(MockQuizBackend::new());
        match h.service.load() {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "No quiz selected"),
            other => panic!("unexpected {:?}", other.map(|s| s.snapshot())),
        }
    }

    #[test]
    fn load_with_missing_quiz_is_not_found() {
        let h = harness(MockQuizBackend::new());
        LocalSessionRepository::new(&h.store)
            .save_session(&UserSession::new("Test User", "t@e.com", "quiz_gone"))
            .unwrap();
        match h.service.load() {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Quiz data not found"),
            other => panic!("unexpected {:?}", other.map(|s| s.snapshot())),
        }
    }

    #[test]
    fn fresh_load_persists_initial_state_and_reload_resumes() {
        let h = harness(MockQuizBackend::new());
        let id = seed_quiz(&h.store, 4);

        let mut session = h.service.load().unwrap();
        assert_eq!(session.time_remaining(), 240);
        assert!(h.store.contains(&format!("quizState_{}", id)).unwrap());

        session.select_option(2).unwrap();
        session.next().unwrap();
        session.toggle_mark().unwrap();
        for _ in 0..30 {
            session.tick();
        }
        h.service.save_state(&session).unwrap();

        let resumed = h.service.load().unwrap();
        assert_eq!(resumed.snapshot(), session.snapshot());
        assert_eq!(resumed.answered_count(), 1);
        assert_eq!(resumed.time_remaining(), 210);
    }

    #[tokio::test]
    async fn submission_writes_locally_then_remote_then_clears_state() {
        let mut backend = MockQuizBackend::new();
        backend
            .expect_submit_attempt()
            .times(1)
            .withf(|s| s.score == 1 && s.answers_json == "{\"0\":0}")
            .returning(|_| Ok(serde_json::json!({"row": 2})));
        let h = harness(backend);
        let id = seed_quiz(&h.store, 2);

        let mut session = h.service.load().unwrap();
        let receipt = h.service.submit(&mut session, Some(0)).await.unwrap();

        assert!(receipt.remote.is_synced());
        assert_eq!(receipt.results.correct, 1);
        assert_eq!(receipt.results.unattempted, 1);
        assert!(!h.store.contains(&format!("quizState_{}", id)).unwrap());
        assert!(h.store.contains("currentQuizResults").unwrap());
        assert_eq!(
            LocalQuizAttemptRepository::new(&h.store).list().unwrap(),
            vec![receipt.attempt]
        );
    }

    #[tokio::test]
    async fn remote_failure_keeps_the_local_attempt() {
        let mut backend = MockQuizBackend::new();
        backend
            .expect_submit_attempt()
            .returning(|_| Err(AppError::NetworkError("timeout".to_string())));
        let h = harness(backend);
        seed_quiz(&h.store, 2);

        let mut session = h.service.load().unwrap();
        let receipt = h.service.submit(&mut session, None).await.unwrap();

        assert_eq!(
            receipt.remote,
            RemoteOutcome::SavedLocallyOnly {
                reason: "Network error: timeout".to_string()
            }
        );
        assert_eq!(
            LocalQuizAttemptRepository::new(&h.store).list().unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn stored_attempt_makes_the_submission_final() {
        let mut backend = MockQuizBackend::new();
        backend
            .expect_submit_attempt()
            .times(1)
            .returning(|_| Ok(serde_json::Value::Null));
        let kv = Arc::new(FlakyStore::default());
        let h = harness_over(LocalStore::new(kv.clone()), backend);
        let id = seed_quiz(&h.store, 2);

        let mut session = h.service.load().unwrap();
        kv.fail_removes(true);
        let receipt = h.service.submit(&mut session, Some(0)).await.unwrap();
        assert_eq!(receipt.results.correct, 1);
        assert!(!session.exit_guard_active());

        // The leftover snapshot is stale, not a reason to submit again.
        kv.fail_removes(false);
        assert!(h.store.contains(&format!("quizState_{}", id)).unwrap());
        assert!(matches!(
            h.service.submit(&mut session, None).await,
            Err(AppError::InvalidState(_))
        ));
        assert_eq!(
            LocalQuizAttemptRepository::new(&h.store).list().unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn failed_attempt_write_leaves_no_results_behind() {
        let kv = Arc::new(FlakyStore::default());
        let h = harness_over(LocalStore::new(kv.clone()), MockQuizBackend::new());
        seed_quiz(&h.store, 2);

        let mut session = h.service.load().unwrap();
        kv.fail_writes(true);
        assert!(matches!(
            h.service.submit(&mut session, Some(0)).await,
            Err(AppError::StorageError(_))
        ));
        assert!(session.exit_guard_active());
        assert!(!h.store.contains("currentQuizResults").unwrap());
        assert!(LocalQuizAttemptRepository::new(&h.store)
            .list()
            .unwrap()
            .is_empty());
    }
}
