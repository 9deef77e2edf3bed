use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizAttempt},
};

/// Fields of a `submitQuiz` call, named as the backend expects them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSubmission {
    pub quiz_id: String,
    pub user_name: String,
    pub email: String,
    pub answers_json: String,
    pub score: u32,
    pub percentage: f64,
    pub time_taken: String,
    pub attempt_date: String,
}

impl AttemptSubmission {
    pub fn from_attempt(attempt: &QuizAttempt, answers_json: String) -> Self {
        Self {
            quiz_id: attempt.quiz_id.clone(),
            user_name: attempt.user_name.clone(),
            email: attempt.email.clone(),
            answers_json,
            score: attempt.score,
            percentage: attempt.accuracy,
            time_taken: attempt.time.clone(),
            attempt_date: attempt.date.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuizFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// The remote quiz backend. Every failure comes back as `AppError::NetworkError`;
/// callers decide how to degrade.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizBackend: Send + Sync {
    async fn create_quiz(&self, quiz: &Quiz) -> AppResult<Value>;
    async fn submit_attempt(&self, submission: &AttemptSubmission) -> AppResult<Value>;
    async fn list_quizzes(&self, filters: &QuizFilters) -> AppResult<Vec<Quiz>>;
    /// `quiz_id` is a quiz identifier or `"all"`.
    async fn list_leaderboard(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>>;
    async fn check_status(&self) -> bool;
}

#[derive(Debug, Deserialize)]
struct RemoteEnvelope {
    status: String,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl RemoteEnvelope {
    fn into_data(self, action: &str) -> AppResult<Value> {
        if self.status == "success" {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err(AppError::NetworkError(
                self.message
                    .unwrap_or_else(|| format!("{} failed", action)),
            ))
        }
    }
}

/// Pulls `data.<field>` out as a list, skipping rows that do not parse.
fn rows_from<T: DeserializeOwned>(data: Value, field: &str) -> Vec<T> {
    let rows = match data {
        Value::Object(mut map) => map.remove(field),
        _ => None,
    };
    let Some(Value::Array(rows)) = rows else {
        return Vec::new();
    };

    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                log::warn!("Skipping malformed remote {} row: {}", field, err);
                None
            }
        })
        .collect()
}

/// Form-encoded writes and query-string reads against a single deployment URL.
pub struct HttpQuizBackend {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpQuizBackend {
    /// `None` yields an unconfigured backend that fails every call without touching the network.
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self) -> AppResult<&str> {
        self.base_url
            .as_deref()
            .ok_or_else(|| AppError::NetworkError("Backend URL is not configured".to_string()))
    }

    async fn post_form(&self, action: &str, fields: &[(&str, String)]) -> AppResult<Value> {
        let url = self.url()?;
        let mut form: Vec<(&str, &str)> = vec![("action", action)];
        form.extend(fields.iter().map(|(k, v)| (*k, v.as_str())));

        log::info!("Sending {} to backend", action);
        let envelope: RemoteEnvelope = self
            .client
            .post(url)
            .query(&[("action", action)])
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        envelope.into_data(action)
    }

    async fn get_query<Q: Serialize + ?Sized>(&self, action: &str, params: &Q) -> AppResult<Value> {
        let url = self.url()?;
        let envelope: RemoteEnvelope = self
            .client
            .get(url)
            .query(&[("action", action)])
            .query(params)
            .send()
            .await?
            .json()
            .await?;

        envelope.into_data(action)
    }
}

#[async_trait]
impl QuizBackend for HttpQuizBackend {
    async fn create_quiz(&self, quiz: &Quiz) -> AppResult<Value> {
        let questions_json = serde_json::to_string(&quiz.questions)
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        self.post_form(
            "createQuiz",
            &[
                ("date", quiz.date.clone()),
                ("subject", quiz.subject.clone()),
                ("questionsJson", questions_json),
                ("totalQuestions", quiz.total_questions.to_string()),
                ("timeLimit", quiz.time_limit.to_string()),
            ],
        )
        .await
    }

    async fn submit_attempt(&self, submission: &AttemptSubmission) -> AppResult<Value> {
        self.post_form(
            "submitQuiz",
            &[
                ("quizId", submission.quiz_id.clone()),
                ("userName", submission.user_name.clone()),
                ("email", submission.email.clone()),
                ("answersJson", submission.answers_json.clone()),
                ("score", submission.score.to_string()),
                ("percentage", submission.percentage.to_string()),
                ("timeTaken", submission.time_taken.clone()),
                ("attemptDate", submission.attempt_date.clone()),
            ],
        )
        .await
    }

    async fn list_quizzes(&self, filters: &QuizFilters) -> AppResult<Vec<Quiz>> {
        let data = self.get_query("getQuizzes", filters).await?;
        Ok(rows_from(data, "quizzes"))
    }

    async fn list_leaderboard(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let data = self
            .get_query("getLeaderboard", &[("quizId", quiz_id)])
            .await?;
        Ok(rows_from(data, "leaderboard"))
    }

    async fn check_status(&self) -> bool {
        let Ok(url) = self.url() else {
            log::warn!("Backend URL is not configured");
            return false;
        };

        match self
            .client
            .get(url)
            .query(&[("action", "ping")])
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log::warn!("Backend returned non-OK status: {}", response.status());
                false
            }
            Err(err) => {
                log::warn!("Backend connection failed: {}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_success_yields_data() {
        let envelope: RemoteEnvelope =
            serde_json::from_value(json!({"status": "success", "data": {"id": 1}})).unwrap();
        assert_eq!(envelope.into_data("createQuiz").unwrap(), json!({"id": 1}));
    }

    #[test]
    fn envelope_failure_uses_message_or_action() {
        let envelope: RemoteEnvelope =
            serde_json::from_value(json!({"status": "error", "message": "Sheet locked"})).unwrap();
        match envelope.into_data("submitQuiz") {
            Err(AppError::NetworkError(msg)) => assert_eq!(msg, "Sheet locked"),
            other => panic!("unexpected {:?}", other),
        }

        let envelope: RemoteEnvelope = serde_json::from_value(json!({"status": "oops"})).unwrap();
        match envelope.into_data("submitQuiz") {
            Err(AppError::NetworkError(msg)) => assert_eq!(msg, "submitQuiz failed"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn leaderboard_rows_accept_submission_field_names() {
        let data = json!({
            "leaderboard": [
                {
                    "quizId": "q1",
                    "userName": "Asha",
                    "email": "a@b.com",
                    "score": 4,
                    "total": 5,
                    "percentage": 80.0,
                    "timeTaken": "03:10",
                    "attemptDate": "2025-01-01"
                },
                {"broken": true}
            ]
        });

        let rows: Vec<QuizAttempt> = rows_from(data, "leaderboard");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].accuracy, 80.0);
        assert_eq!(rows[0].time, "03:10");
        assert_eq!(rows[0].date, "2025-01-01");
    }

    #[test]
    fn missing_rows_read_as_empty() {
        let rows: Vec<Quiz> = rows_from(json!({}), "quizzes");
        assert!(rows.is_empty());
        let rows: Vec<Quiz> = rows_from(Value::Null, "quizzes");
        assert!(rows.is_empty());
    }

    #[test]
    fn submission_copies_attempt_fields() {
        let attempt = crate::test_utils::fixtures::attempt("a@b.com", "q1", "2025-01-01", 3);
        let submission = AttemptSubmission::from_attempt(&attempt, "{\"0\":1}".to_string());
        assert_eq!(submission.percentage, 60.0);
        assert_eq!(submission.attempt_date, "2025-01-01");
        assert_eq!(submission.answers_json, "{\"0\":1}");
    }

    #[tokio::test]
    async fn unconfigured_backend_fails_without_network() {
        let backend = HttpQuizBackend::new(None);
        assert!(!backend.check_status().await);
        assert!(matches!(
            backend.list_quizzes(&QuizFilters::default()).await,
            Err(AppError::NetworkError(_))
        ));
    }
}
