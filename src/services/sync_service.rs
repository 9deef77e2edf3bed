use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::dto::response::SyncReport,
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{
        merge::{merge_attempts, merge_quizzes, Merged},
        remote_client::{QuizBackend, QuizFilters},
    },
};

/// Pulls remote collections and folds them into local storage, remote winning per key.
/// A failed fetch leaves local data untouched.
pub struct SyncService {
    backend: Arc<dyn QuizBackend>,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl SyncService {
    pub fn new(
        backend: Arc<dyn QuizBackend>,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        Self {
            backend,
            quizzes,
            attempts,
        }
    }

    pub fn backend(&self) -> &Arc<dyn QuizBackend> {
        &self.backend
    }

    pub async fn sync_quizzes(&self) -> AppResult<SyncReport> {
        let remote = match self.backend.list_quizzes(&QuizFilters::default()).await {
            Ok(remote) => remote,
            Err(err) => {
                log::warn!("Could not sync quizzes from backend: {}", err);
                Vec::new()
            }
        };

        // Re-read right before writing so a concurrent local insert is not lost.
        let merged = merge_quizzes(remote, self.quizzes.list()?);
        if merged.remote > 0 {
            self.quizzes.replace_all(&merged.records)?;
        }
        let report = report(&merged);
        log::info!(
            "Quiz sync: {} remote, {} local only",
            report.remote,
            report.local_only
        );
        Ok(report)
    }

    pub async fn sync_attempts(&self) -> AppResult<SyncReport> {
        let remote = match self.backend.list_leaderboard("all").await {
            Ok(remote) => remote,
            Err(err) => {
                log::warn!("Could not sync attempts from backend: {}", err);
                Vec::new()
            }
        };

        let merged = merge_attempts(remote, self.attempts.list()?);
        if merged.remote > 0 {
            self.attempts.replace_all(&merged.records)?;
        }
        let report = report(&merged);
        log::info!(
            "Attempt sync: {} remote, {} local only",
            report.remote,
            report.local_only
        );
        Ok(report)
    }
}

fn report<T>(merged: &Merged<T>) -> SyncReport {
    SyncReport {
        remote: merged.remote,
        local_only: merged.local_only,
        total: merged.records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::LocalStore,
        errors::AppError,
        repositories::{LocalQuizAttemptRepository, LocalQuizRepository},
        services::remote_client::MockQuizBackend,
        test_utils::fixtures::{attempt, quiz_with_questions},
    };

    fn service(backend: MockQuizBackend, store: &LocalStore) -> SyncService {
        SyncService::new(
            Arc::new(backend),
            Arc::new(LocalQuizRepository::new(store)),
            Arc::new(LocalQuizAttemptRepository::new(store)),
        )
    }

    #[tokio::test]
    async fn remote_quizzes_are_merged_and_persisted() {
        let store = LocalStore::in_memory();
        let local_only = quiz_with_questions("2025-01-03", "Science", 2);
        LocalQuizRepository::new(&store)
            .insert(local_only.clone())
            .unwrap();

        let remote = quiz_with_questions("2025-01-01", "English", 3);
        let remote_rows = vec![remote.clone()];
        let mut backend = MockQuizBackend::new();
        backend
            .expect_list_quizzes()
            .times(2)
            .returning(move |_| Ok(remote_rows.clone()));

        let sync = service(backend, &store);
        let report = sync.sync_quizzes().await.unwrap();
        assert_eq!(
            report,
            SyncReport {
                remote: 1,
                local_only: 1,
                total: 2
            }
        );

        let stored = LocalQuizRepository::new(&store).list().unwrap();
        assert_eq!(stored, vec![remote, local_only]);

        // Second pass over the same snapshot changes nothing.
        sync.sync_quizzes().await.unwrap();
        assert_eq!(LocalQuizRepository::new(&store).list().unwrap(), stored);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_local_data_alone() {
        let store = LocalStore::in_memory();
        let attempts = LocalQuizAttemptRepository::new(&store);
        attempts
            .append(attempt("a@b.com", "q1", "2025-01-01", 2))
            .unwrap();

        let mut backend = MockQuizBackend::new();
        backend
            .expect_list_leaderboard()
            .returning(|_| Err(AppError::NetworkError("offline".to_string())));

        let report = service(backend, &store).sync_attempts().await.unwrap();
        assert_eq!(report.remote, 0);
        assert_eq!(report.local_only, 1);
        assert_eq!(attempts.list().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remote_attempt_wins_over_local_duplicate() {
        let store = LocalStore::in_memory();
        let attempts = LocalQuizAttemptRepository::new(&store);
        attempts
            .append(attempt("a@b.com", "q1", "2025-01-01", 1))
            .unwrap();

        let remote = attempt("a@b.com", "q1", "2025-01-01", 5);
        let rows = vec![remote.clone()];
        let mut backend = MockQuizBackend::new();
        backend
            .expect_list_leaderboard()
            .withf(|quiz_id| quiz_id == "all")
            .returning(move |_| Ok(rows.clone()));

        service(backend, &store).sync_attempts().await.unwrap();
        assert_eq!(attempts.list().unwrap(), vec![remote]);
    }
}
