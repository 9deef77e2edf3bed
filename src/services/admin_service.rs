use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::{
    constants::storage_keys,
    db::LocalStore,
    errors::{AppError, AppResult},
    models::{
        domain::{quiz_question::OPTION_COUNT, Quiz, QuizQuestion},
        dto::{
            request::CreateQuizRequest,
            response::{
                AdminAttemptRow, AdminQuizRow, AdminStats, ApiStatus, DataExport, FullSyncReport,
                QuizCreated, QuizPreview, QuizSummary, RemoteOutcome,
            },
        },
    },
    repositories::{QuizAttemptRepository, QuizRepository},
    services::{remote_client::QuizBackend, sync_service::SyncService},
};

/// Raw copies of both collections, stored under `backup_<millis>`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DataBackup {
    pub quizzes: Option<String>,
    pub attempts: Option<String>,
    pub timestamp: DateTime<Utc>,
}

fn invalid(message: String) -> AppError {
    AppError::ValidationError(message)
}

fn non_empty_str(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}

/// Checks a pasted question set entry by entry and parses it. Error messages are
/// 1-indexed so they match what the author sees.
pub fn validate_questions(questions_json: &str) -> AppResult<Vec<QuizQuestion>> {
    let parsed: Value = serde_json::from_str(questions_json)
        .map_err(|e| invalid(format!("Invalid JSON: {}", e)))?;
    let Value::Array(entries) = parsed else {
        return Err(invalid("Questions must be an array".to_string()));
    };
    if entries.is_empty() {
        return Err(invalid("Questions must be a non-empty array".to_string()));
    }

    for (i, entry) in entries.iter().enumerate() {
        let n = i + 1;
        if !non_empty_str(entry.get("question"))
            || entry.get("options").is_none()
            || !non_empty_str(entry.get("explanation"))
        {
            return Err(invalid(format!("Question {} missing required fields", n)));
        }

        let options_ok = entry
            .get("options")
            .and_then(Value::as_array)
            .is_some_and(|opts| opts.len() == OPTION_COUNT && opts.iter().all(Value::is_string));
        if !options_ok {
            return Err(invalid(format!("Question {} must have 4 options", n)));
        }

        let answer_ok = entry
            .get("correctAnswer")
            .and_then(Value::as_u64)
            .is_some_and(|a| a < OPTION_COUNT as u64);
        if !answer_ok {
            return Err(invalid(format!("Question {} invalid correctAnswer", n)));
        }

        if let Some(allocation) = entry.get("timeAllocation").filter(|v| !v.is_null()) {
            if !allocation
                .as_u64()
                .is_some_and(|secs| secs > 0 && secs <= u64::from(u32::MAX))
            {
                return Err(invalid(format!("Question {} invalid timeAllocation", n)));
            }
        }
    }

    let questions: Vec<QuizQuestion> = serde_json::from_value(Value::Array(entries))
        .map_err(|e| invalid(format!("Invalid question set: {}", e)))?;
    if Quiz::checked_time_limit(&questions).is_none() {
        return Err(invalid("Total timeAllocation is too large".to_string()));
    }
    Ok(questions)
}

pub struct AdminService {
    store: LocalStore,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    backend: Arc<dyn QuizBackend>,
    sync: Arc<SyncService>,
    backend_configured: bool,
}

impl AdminService {
    pub fn new(
        store: LocalStore,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        backend: Arc<dyn QuizBackend>,
        sync: Arc<SyncService>,
        backend_configured: bool,
    ) -> Self {
        Self {
            store,
            quizzes,
            attempts,
            backend,
            sync,
            backend_configured,
        }
    }

    /// Question count and total duration of a payload, without storing anything.
    pub fn preview(&self, questions_json: &str) -> AppResult<QuizPreview> {
        let questions = validate_questions(questions_json)?;
        Ok(QuizPreview {
            question_count: questions.len(),
            total_minutes: Quiz::time_limit_for(&questions).div_ceil(60),
        })
    }

    /// Saves the quiz locally, then tries the backend. A backend failure is reported,
    /// not raised.
    pub async fn create_quiz(&self, request: CreateQuizRequest) -> AppResult<QuizCreated> {
        request.validate()?;
        let questions = validate_questions(&request.questions_json)?;
        let quiz = self
            .quizzes
            .insert(Quiz::new(&request.date, request.subject.trim(), questions))?;
        log::info!(
            "Created quiz {} ({} questions, {}s)",
            quiz.quiz_id,
            quiz.total_questions,
            quiz.time_limit
        );

        let remote = match self.backend.create_quiz(&quiz).await {
            Ok(_) => RemoteOutcome::Synced,
            Err(err) => {
                log::warn!("Quiz {} saved locally only: {}", quiz.quiz_id, err);
                RemoteOutcome::SavedLocallyOnly {
                    reason: err.to_string(),
                }
            }
        };

        Ok(QuizCreated {
            quiz: QuizSummary::from(&quiz),
            remote,
        })
    }

    pub fn list_quizzes(&self) -> AppResult<Vec<AdminQuizRow>> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for attempt in self.attempts.list()? {
            *counts.entry(attempt.quiz_id).or_default() += 1;
        }

        Ok(self
            .quizzes
            .list()?
            .iter()
            .map(|quiz| AdminQuizRow {
                quiz: QuizSummary::from(quiz),
                attempt_count: counts.get(&quiz.quiz_id).copied().unwrap_or(0),
            })
            .collect())
    }

    pub fn quiz_details(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)?
            .ok_or_else(|| AppError::NotFound(format!("Quiz '{}' not found", quiz_id)))
    }

    pub fn list_attempts(&self) -> AppResult<Vec<AdminAttemptRow>> {
        let subjects: HashMap<String, String> = self
            .quizzes
            .list()?
            .into_iter()
            .map(|q| (q.quiz_id, q.subject))
            .collect();

        Ok(self
            .attempts
            .list()?
            .into_iter()
            .map(|attempt| {
                let subject = subjects
                    .get(&attempt.quiz_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string());
                AdminAttemptRow { attempt, subject }
            })
            .collect())
    }

    pub fn delete_quiz(&self, quiz_id: &str) -> AppResult<()> {
        if !self.quizzes.delete(quiz_id)? {
            return Err(AppError::NotFound(format!("Quiz '{}' not found", quiz_id)));
        }
        log::info!("Deleted quiz {}", quiz_id);
        Ok(())
    }

    pub fn delete_attempt(&self, attempt_id: &str) -> AppResult<()> {
        if !self.attempts.delete(attempt_id)? {
            return Err(AppError::NotFound(format!(
                "Attempt '{}' not found",
                attempt_id
            )));
        }
        log::info!("Deleted attempt {}", attempt_id);
        Ok(())
    }

    pub fn delete_all_quizzes(&self) -> AppResult<()> {
        self.quizzes.replace_all(&[])?;
        log::warn!("All quizzes deleted");
        Ok(())
    }

    pub fn delete_all_attempts(&self) -> AppResult<()> {
        self.attempts.replace_all(&[])?;
        log::warn!("All attempts deleted");
        Ok(())
    }

    pub fn stats(&self) -> AppResult<AdminStats> {
        let quizzes = self.quizzes.list()?;
        let today = Utc::now().format("%Y-%m-%d").to_string();

        Ok(AdminStats {
            total_quizzes: quizzes.len(),
            total_attempts: self.attempts.list()?.len(),
            today_quizzes: quizzes.iter().filter(|q| q.date == today).count(),
            total_questions: quizzes.iter().map(|q| u64::from(q.total_questions)).sum(),
        })
    }

    pub fn export(&self) -> AppResult<DataExport> {
        Ok(DataExport {
            quizzes: self.quizzes.list()?,
            attempts: self.attempts.list()?,
            exported_at: Utc::now(),
        })
    }

    /// Returns the storage key the backup was written under.
    pub fn backup(&self) -> AppResult<String> {
        let timestamp = Utc::now();
        let backup = DataBackup {
            quizzes: self.store.read_raw(storage_keys::QUIZZES)?,
            attempts: self.store.read_raw(storage_keys::QUIZ_ATTEMPTS)?,
            timestamp,
        };
        let key = storage_keys::backup(timestamp.timestamp_millis());
        self.store.write(&key, &backup)?;
        log::info!("Backup written to {}", key);
        Ok(key)
    }

    /// Wipes every key in the store, backups included.
    pub fn clear_all(&self) -> AppResult<()> {
        self.store.clear()?;
        log::warn!("All local data cleared");
        Ok(())
    }

    pub async fn api_status(&self) -> ApiStatus {
        let online = self.backend_configured && self.backend.check_status().await;
        ApiStatus {
            configured: self.backend_configured,
            online,
        }
    }

    pub async fn sync(&self) -> AppResult<FullSyncReport> {
        Ok(FullSyncReport {
            quizzes: self.sync.sync_quizzes().await?,
            attempts: self.sync.sync_attempts().await?,
        })
    }
}
