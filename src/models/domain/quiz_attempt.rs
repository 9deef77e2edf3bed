use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user's completed run through a quiz. Remote leaderboard rows use the
/// submission field names, hence the aliases.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    #[serde(default)]
    pub attempt_id: String,
    pub quiz_id: String,
    pub user_name: String,
    pub email: String,
    pub score: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(alias = "percentage")]
    pub accuracy: f64,
    #[serde(alias = "timeTaken", default)]
    pub time: String,
    #[serde(alias = "attemptDate")]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Natural identity used when merging local and remote attempts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptKey {
    pub email: String,
    pub quiz_id: String,
    pub date: String,
}

impl QuizAttempt {
    pub fn new_attempt_id() -> String {
        format!("attempt_{}", Uuid::new_v4().simple())
    }

    /// Email is compared case-insensitively, as in [`QuizAttempt::belongs_to`].
    pub fn key(&self) -> AttemptKey {
        AttemptKey {
            email: self.email.to_ascii_lowercase(),
            quiz_id: self.quiz_id.clone(),
            date: self.date.clone(),
        }
    }

    pub fn belongs_to(&self, email: &str, quiz_id: &str) -> bool {
        self.quiz_id == quiz_id && self.email.eq_ignore_ascii_case(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_remote_row_with_submission_field_names() {
        let json = r#"{
            "quizId": "q1",
            "userName": "Asha",
            "email": "a@b.com",
            "score": 4,
            "percentage": 80.0,
            "timeTaken": "03:10",
            "attemptDate": "2025-01-01"
        }"#;

        let attempt: QuizAttempt = serde_json::from_str(json).expect("remote row should parse");
        assert_eq!(attempt.accuracy, 80.0);
        assert_eq!(attempt.time, "03:10");
        assert_eq!(attempt.date, "2025-01-01");
        assert!(attempt.attempt_id.is_empty());
        assert!(attempt.timestamp.is_none());
    }

    #[test]
    fn key_is_email_quiz_and_date() {
        let attempt = QuizAttempt {
            attempt_id: QuizAttempt::new_attempt_id(),
            quiz_id: "q1".to_string(),
            user_name: "Asha".to_string(),
            email: "a@b.com".to_string(),
            score: 3,
            total: 5,
            accuracy: 60.0,
            time: "01:00".to_string(),
            date: "2025-01-01".to_string(),
            timestamp: Some(Utc::now()),
        };

        assert!(attempt.attempt_id.starts_with("attempt_"));
        assert_eq!(
            attempt.key(),
            AttemptKey {
                email: "a@b.com".to_string(),
                quiz_id: "q1".to_string(),
                date: "2025-01-01".to_string(),
            }
        );
        assert!(attempt.belongs_to("A@B.com", "q1"));
        assert!(!attempt.belongs_to("a@b.com", "q2"));

        let shouted = QuizAttempt {
            email: "A@B.com".to_string(),
            ..attempt.clone()
        };
        assert_eq!(shouted.key(), attempt.key());
    }
}
