use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Question index -> selected option index. Absent means unanswered.
pub type UserAnswers = BTreeMap<usize, u8>;

/// Resumable snapshot of an in-progress attempt, stored under `quizState_<quizId>`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    pub quiz_id: String,
    #[serde(rename = "currentQuestion", default)]
    pub current_question_index: usize,
    #[serde(default)]
    pub user_answers: UserAnswers,
    #[serde(default)]
    pub marked_for_review: BTreeSet<usize>,
    pub time_remaining: i64,
}

impl QuizState {
    pub fn fresh(quiz_id: &str, time_limit: u32) -> Self {
        QuizState {
            quiz_id: quiz_id.to_string(),
            current_question_index: 0,
            user_answers: UserAnswers::new(),
            marked_for_review: BTreeSet::new(),
            time_remaining: i64::from(time_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_reproduces_the_snapshot() {
        let mut state = QuizState::fresh("quiz_1", 300);
        state.current_question_index = 3;
        state.user_answers.insert(0, 2);
        state.user_answers.insert(3, 0);
        state.marked_for_review.insert(1);
        state.marked_for_review.insert(3);
        state.time_remaining = 187;

        let stored = serde_json::to_string(&state).unwrap();
        let loaded: QuizState = serde_json::from_str(&stored).unwrap();

        assert_eq!(loaded, state);
    }

    #[test]
    fn stored_layout_matches_browser_format() {
        let mut state = QuizState::fresh("quiz_1", 60);
        state.user_answers.insert(4, 1);
        state.marked_for_review.insert(2);

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["currentQuestion"], 0);
        assert_eq!(value["userAnswers"]["4"], 1);
        assert_eq!(value["markedForReview"][0], 2);
        assert_eq!(value["timeRemaining"], 60);
    }
}
