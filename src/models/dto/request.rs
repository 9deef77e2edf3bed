use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

static DATE_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("DATE_REGEX is a valid regex pattern")
});

/// Starts (or retakes) a quiz. The quiz is picked either by id or by its schedule.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_quiz_target"))]
pub struct StartQuizRequest {
    #[validate(length(min = 3, max = 100, message = "Name must be at least 3 characters"))]
    pub user_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub quiz_id: Option<String>,

    #[validate(regex(path = *DATE_REGEX, message = "Date must be YYYY-MM-DD"))]
    pub date: Option<String>,

    pub subject: Option<String>,

    /// Required to start a second attempt when the policy asks for confirmation.
    #[serde(default)]
    pub confirm_retake: bool,
}

fn validate_quiz_target(request: &StartQuizRequest) -> Result<(), ValidationError> {
    let by_id = request.quiz_id.as_deref().is_some_and(|id| !id.is_empty());
    let by_schedule = request.date.is_some() && request.subject.as_deref().is_some_and(|s| !s.is_empty());
    if by_id || by_schedule {
        Ok(())
    } else {
        Err(ValidationError::new("quiz_target_required")
            .with_message("Pick a quiz by id or by date and subject".into()))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(regex(path = *DATE_REGEX, message = "Date must be YYYY-MM-DD"))]
    pub date: String,

    #[validate(length(min = 1, max = 100, message = "Subject is required"))]
    pub subject: String,

    /// Question set exactly as pasted by the admin.
    pub questions_json: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsPayload {
    pub questions_json: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AnswerRequest {
    #[validate(range(max = 3, message = "Option index must be between 0 and 3"))]
    pub option: u8,
}

/// Option the user currently sees selected, committed before moving on or submitting.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub selected: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigateRequest {
    Next,
    Prev,
    Question(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    Completed,
    Pending,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DashboardQuery {
    pub email: Option<String>,
    pub subject: Option<String>,
    pub status: Option<CompletionStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub quiz_id: Option<String>,
}
