use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_state::UserAnswers;

/// Scoring summary of the last submission, kept under `currentQuizResults` for the results view.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResults {
    pub quiz_id: String,
    pub total: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub unattempted: u32,
    pub score: u32,
    pub percentage: f64,
    pub time_taken: String,
    pub answers: UserAnswers,
    pub date: String,
}

impl QuizResults {
    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }
}
