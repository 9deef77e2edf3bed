use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    domain::{Quiz, QuizAttempt, QuizResults},
    dto::request::CompletionStatus,
};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            data,
            message: message.into(),
        }
    }
}

/// Result of pushing a locally committed record to the remote backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RemoteOutcome {
    Synced,
    SavedLocallyOnly { reason: String },
}

impl RemoteOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, RemoteOutcome::Synced)
    }
}

/// Quiz metadata without questions, so answers never leak through listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub quiz_id: String,
    pub date: String,
    pub subject: String,
    pub total_questions: u32,
    pub time_limit: u32,
    pub duration_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        QuizSummary {
            quiz_id: quiz.quiz_id.clone(),
            date: quiz.date.clone(),
            subject: quiz.subject.clone(),
            total_questions: quiz.total_questions,
            time_limit: quiz.time_limit,
            duration_minutes: quiz.duration_minutes(),
            created_at: quiz.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizAction {
    Start,
    Retake,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntry {
    pub quiz: QuizSummary,
    pub status: CompletionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<QuizAttempt>,
    pub action: QuizAction,
}

impl DashboardEntry {
    /// "Score: 3/5" for completed quizzes.
    pub fn score_label(&self) -> Option<String> {
        self.attempt
            .as_ref()
            .map(|a| format!("Score: {}/{}", a.score, self.quiz.total_questions))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPreview {
    pub question_count: usize,
    pub total_minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizCreated {
    pub quiz: QuizSummary,
    pub remote: RemoteOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuizRow {
    pub quiz: QuizSummary,
    pub attempt_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAttemptRow {
    pub attempt: QuizAttempt,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_quizzes: usize,
    pub total_attempts: usize,
    pub today_quizzes: usize,
    pub total_questions: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    pub quizzes: Vec<Quiz>,
    pub attempts: Vec<QuizAttempt>,
    pub exported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub remote: usize,
    pub local_only: usize,
    pub total: usize,
}

/// Quizzes and attempts pulled in one manual sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullSyncReport {
    pub quizzes: SyncReport,
    pub attempts: SyncReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApiStatus {
    pub configured: bool,
    pub online: bool,
}

impl ApiStatus {
    pub fn label(&self) -> &'static str {
        match (self.configured, self.online) {
            (false, _) => "Backend not configured - data saved locally",
            (true, true) => "Connected to backend",
            (true, false) => "Backend offline - data saved locally",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub results: QuizResults,
    pub attempt: QuizAttempt,
    pub remote: RemoteOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_name: String,
    pub email: String,
    pub quiz_id: String,
    pub subject: String,
    pub score: u32,
    pub total: u32,
    pub accuracy: f64,
    pub time: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub rank: usize,
    pub user_name: String,
    pub email: String,
    pub attempts: usize,
    pub best_score: u32,
    pub average_accuracy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Correct,
    Incorrect,
    Unattempted,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub number: usize,
    pub question: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<u8>,
    pub correct_answer: u8,
    pub explanation: String,
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsView {
    pub subject: String,
    pub results: QuizResults,
    pub review: Vec<QuestionReview>,
}
