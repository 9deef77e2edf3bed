use crate::models::domain::{Quiz, UserAnswers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub total: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub unattempted: u32,
}

impl ScoreSummary {
    pub fn score(&self) -> u32 {
        self.correct
    }

    pub fn accuracy(&self) -> f64 {
        accuracy(self.correct, self.total)
    }
}

/// Scores answers against the quiz key. Answers for indexes outside the quiz are ignored,
/// so `correct + incorrect + unattempted == total` always holds.
pub fn score_answers(quiz: &Quiz, answers: &UserAnswers) -> ScoreSummary {
    let total = quiz.question_count();
    let mut answered = 0u32;
    let mut correct = 0u32;

    for (&index, &selected) in answers.range(..total) {
        answered += 1;
        if quiz.questions[index].is_correct(selected) {
            correct += 1;
        }
    }

    ScoreSummary {
        total: total as u32,
        correct,
        incorrect: answered - correct,
        unattempted: total as u32 - answered,
    }
}

/// Percentage of correct answers; an empty quiz scores 0.
pub fn accuracy(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * f64::from(correct) / f64::from(total)
}

/// `MM:SS`; minutes keep counting past 99. Negative durations clamp to zero.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::quiz_with_questions;

    #[test]
    fn three_right_one_wrong_one_skipped() {
        let quiz = quiz_with_questions("2025-01-01", "General Knowledge", 5);
        assert_eq!(quiz.time_limit, 300);

        let mut answers = UserAnswers::new();
        answers.insert(0, 0);
        answers.insert(1, 1);
        answers.insert(2, 2);
        answers.insert(3, 0); // correct is 3

        let summary = score_answers(&quiz, &answers);
        assert_eq!(
            summary,
            ScoreSummary {
                total: 5,
                correct: 3,
                incorrect: 1,
                unattempted: 1,
            }
        );
        assert_eq!(summary.score(), 3);
        assert_eq!(summary.accuracy(), 60.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let quiz = quiz_with_questions("2025-01-01", "English", 8);
        let answers: UserAnswers = [(0, 0), (2, 1), (5, 1), (7, 3)].into_iter().collect();

        let first = score_answers(&quiz, &answers);
        for _ in 0..10 {
            assert_eq!(score_answers(&quiz, &answers), first);
        }
    }

    #[test]
    fn out_of_range_answers_do_not_count() {
        let quiz = quiz_with_questions("2025-01-01", "English", 2);
        let answers: UserAnswers = [(0, 0), (9, 1)].into_iter().collect();

        let summary = score_answers(&quiz, &answers);
        assert_eq!(summary.correct + summary.incorrect + summary.unattempted, 2);
        assert_eq!(summary.unattempted, 1);
    }

    #[test]
    fn accuracy_handles_empty_quiz() {
        assert_eq!(accuracy(0, 0), 0.0);
        assert_eq!(accuracy(1, 3), 100.0 / 3.0);
    }

    #[test]
    fn durations_format_as_minutes_and_seconds() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(75), "01:15");
        assert_eq!(format_duration(6000), "100:00");
        assert_eq!(format_duration(-4), "00:00");
    }
}
