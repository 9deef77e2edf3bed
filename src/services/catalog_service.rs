use std::{collections::BTreeSet, sync::Arc};

use validator::Validate;

use crate::{
    config::DuplicateAttemptPolicy,
    constants::sample_quizzes::sample_quizzes,
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, UserSession},
        dto::{
            request::{CompletionStatus, DashboardQuery, StartQuizRequest},
            response::{DashboardEntry, QuizAction, QuizSummary},
        },
    },
    repositories::{QuizAttemptRepository, QuizRepository, SessionRepository},
};

pub struct CatalogService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    sessions: Arc<dyn SessionRepository>,
    duplicate_policy: DuplicateAttemptPolicy,
}

impl CatalogService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        sessions: Arc<dyn SessionRepository>,
        duplicate_policy: DuplicateAttemptPolicy,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            sessions,
            duplicate_policy,
        }
    }

    /// Writes the sample quizzes, but only into a store that has never held a quiz collection.
    pub fn seed_sample_quizzes(&self) -> AppResult<bool> {
        if self.quizzes.is_initialized()? {
            return Ok(false);
        }
        let samples = sample_quizzes();
        self.quizzes.replace_all(&samples)?;
        log::info!("Seeded {} sample quizzes", samples.len());
        Ok(true)
    }

    /// Every quiz annotated with the user's latest attempt. Filters only hide entries.
    pub fn dashboard(&self, query: &DashboardQuery) -> AppResult<Vec<DashboardEntry>> {
        let email = match &query.email {
            Some(email) => Some(email.clone()),
            None => self.sessions.current_session()?.map(|s| s.email),
        };
        let attempts = self.attempts.list()?;

        let entries = self
            .quizzes
            .list()?
            .iter()
            .map(|quiz| {
                let attempt = email.as_deref().and_then(|email| {
                    attempts
                        .iter()
                        .rev()
                        .find(|a| a.belongs_to(email, &quiz.quiz_id))
                        .cloned()
                });
                let (status, action) = match attempt {
                    Some(_) => (CompletionStatus::Completed, QuizAction::Retake),
                    None => (CompletionStatus::Pending, QuizAction::Start),
                };
                DashboardEntry {
                    quiz: QuizSummary::from(quiz),
                    status,
                    attempt,
                    action,
                }
            })
            .filter(|entry| {
                query
                    .subject
                    .as_deref()
                    .map_or(true, |subject| entry.quiz.subject == subject)
            })
            .filter(|entry| query.status.map_or(true, |status| entry.status == status))
            .collect();

        Ok(entries)
    }

    pub fn available_dates(&self) -> AppResult<Vec<String>> {
        let dates: BTreeSet<String> = self.quizzes.list()?.into_iter().map(|q| q.date).collect();
        Ok(dates.into_iter().collect())
    }

    pub fn subjects(&self) -> AppResult<Vec<String>> {
        let subjects: BTreeSet<String> =
            self.quizzes.list()?.into_iter().map(|q| q.subject).collect();
        Ok(subjects.into_iter().collect())
    }

    fn resolve(&self, request: &StartQuizRequest) -> AppResult<Quiz> {
        if let Some(quiz_id) = request.quiz_id.as_deref().filter(|id| !id.is_empty()) {
            return self
                .quizzes
                .find_by_id(quiz_id)?
                .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' not found", quiz_id)));
        }

        let date = request.date.as_deref().unwrap_or_default();
        let subject = request.subject.as_deref().unwrap_or_default();
        self.quizzes
            .find_by_schedule(date, subject)?
            .ok_or_else(|| {
                AppError::NotFound("Quiz not found for selected date and subject".to_string())
            })
    }

    /// Binds the user to a quiz, applying the duplicate-attempt policy first.
    pub fn start_quiz(&self, request: StartQuizRequest) -> AppResult<UserSession> {
        request.validate()?;
        let quiz = self.resolve(&request)?;

        let previous = self
            .attempts
            .find_by_user_and_quiz(&request.email, &quiz.quiz_id)?;
        if let Some(last) = previous.last() {
            match self.duplicate_policy {
                DuplicateAttemptPolicy::Allow => {}
                DuplicateAttemptPolicy::Confirm if request.confirm_retake => {
                    log::info!(
                        "{} is retaking quiz {} (previous score {}/{})",
                        request.email,
                        quiz.quiz_id,
                        last.score,
                        quiz.total_questions
                    );
                }
                DuplicateAttemptPolicy::Confirm => {
                    return Err(AppError::DuplicateAttempt {
                        existing_score: last.score,
                        total: quiz.total_questions,
                    });
                }
                DuplicateAttemptPolicy::Reject => {
                    return Err(AppError::InvalidState(format!(
                        "Quiz already attempted with score {}/{}",
                        last.score, quiz.total_questions
                    )));
                }
            }
        }

        let session = UserSession::new(request.user_name.trim(), request.email.trim(), &quiz.quiz_id);
        self.sessions.save_session(&session)?;
        log::info!("{} selected quiz {}", session.email, quiz.quiz_id);
        Ok(session)
    }

    pub fn current_session(&self) -> AppResult<Option<UserSession>> {
        self.sessions.current_session()
    }

    pub fn logout(&self) -> AppResult<()> {
        self.sessions.clear_session()?;
        self.sessions.clear_results()?;
        Ok(())
    }
}
