use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz_question::QuizQuestion;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub quiz_id: String,
    pub date: String, // YYYY-MM-DD the quiz is scheduled for
    pub subject: String,
    pub questions: Vec<QuizQuestion>,
    pub total_questions: u32,
    pub time_limit: u32, // seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Quiz {
    /// Builds a quiz with a fresh id; question count and time limit are derived from the questions.
    pub fn new(date: &str, subject: &str, questions: Vec<QuizQuestion>) -> Self {
        Quiz {
            quiz_id: format!("quiz_{}", Uuid::new_v4().simple()),
            date: date.to_string(),
            subject: subject.to_string(),
            total_questions: questions.len() as u32,
            time_limit: Self::time_limit_for(&questions),
            questions,
            created_at: Some(Utc::now()),
        }
    }

    /// Saturates at `u32::MAX`; authored sets are rejected before they get that far.
    pub fn time_limit_for(questions: &[QuizQuestion]) -> u32 {
        questions
            .iter()
            .fold(0u32, |acc, q| acc.saturating_add(q.time_allocation))
    }

    /// `None` when the allocations do not fit in a `u32`.
    pub fn checked_time_limit(questions: &[QuizQuestion]) -> Option<u32> {
        questions
            .iter()
            .try_fold(0u32, |acc, q| acc.checked_add(q.time_allocation))
    }

    pub fn question(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    /// Number of questions actually present; `total_questions` is trusted only when it agrees.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.time_limit.div_ceil(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(count: usize) -> Vec<QuizQuestion> {
        (0..count)
            .map(|i| QuizQuestion::new(&format!("Q{}", i), ["a", "b", "c", "d"], 0, "a"))
            .collect()
    }

    #[test]
    fn new_quiz_derives_totals_from_questions() {
        let quiz = Quiz::new("2025-10-18", "English", questions(5));

        assert!(quiz.quiz_id.starts_with("quiz_"));
        assert_eq!(quiz.total_questions, 5);
        assert_eq!(quiz.time_limit, 300);
        assert_eq!(quiz.duration_minutes(), 5);
    }

    #[test]
    fn time_limit_sums_per_question_allocations() {
        let mut qs = questions(2);
        qs[1] = qs[1].clone().with_time_allocation(45);

        let quiz = Quiz::new("2025-10-18", "English", qs);
        assert_eq!(quiz.time_limit, 105);
        assert_eq!(quiz.duration_minutes(), 2);
    }

    #[test]
    fn oversized_allocations_do_not_overflow() {
        let qs: Vec<QuizQuestion> = questions(2)
            .into_iter()
            .map(|q| q.with_time_allocation(u32::MAX))
            .collect();

        assert_eq!(Quiz::checked_time_limit(&qs), None);
        assert_eq!(Quiz::new("2025-10-18", "English", qs).time_limit, u32::MAX);
        assert_eq!(Quiz::checked_time_limit(&questions(3)), Some(180));
    }

    #[test]
    fn parses_stored_quiz_without_created_at() {
        let json = r#"{
            "quizId": "quiz_1",
            "date": "2025-01-01",
            "subject": "General Knowledge",
            "questions": [],
            "totalQuestions": 0,
            "timeLimit": 0
        }"#;

        let quiz: Quiz = serde_json::from_str(json).expect("quiz should parse");
        assert_eq!(quiz.quiz_id, "quiz_1");
        assert!(quiz.created_at.is_none());
    }
}
