use serde::{Deserialize, Serialize};

/// Binds a user identity to the quiz currently being taken. One per store.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub user_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_quiz_id: Option<String>,
}

impl UserSession {
    pub fn new(user_name: &str, email: &str, quiz_id: &str) -> Self {
        UserSession {
            user_name: user_name.to_string(),
            email: email.to_string(),
            current_quiz_id: Some(quiz_id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_uses_stored_field_names() {
        let session = UserSession::new("Asha", "a@b.com", "quiz_1");
        let json = serde_json::to_string(&session).unwrap();

        assert_eq!(
            json,
            r#"{"userName":"Asha","email":"a@b.com","currentQuizId":"quiz_1"}"#
        );
    }
}
