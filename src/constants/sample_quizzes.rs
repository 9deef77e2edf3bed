use chrono::Utc;

use crate::models::domain::{Quiz, QuizQuestion};

const SAMPLE_QUESTION_COUNT: usize = 30;

struct Template {
    question: &'static str,
    options: [&'static str; 4],
    answer: u8,
    explanation: &'static str,
}

const GENERAL_KNOWLEDGE: [Template; 3] = [
    Template {
        question: "What is the capital of India?",
        options: ["Mumbai", "New Delhi", "Kolkata", "Chennai"],
        answer: 1,
        explanation: "New Delhi is the capital of India.",
    },
    Template {
        question: "Who is known as the Father of the Nation in India?",
        options: [
            "Jawaharlal Nehru",
            "Mahatma Gandhi",
            "Sardar Patel",
            "Subhas Chandra Bose",
        ],
        answer: 1,
        explanation: "Mahatma Gandhi is called the Father of the Nation.",
    },
    Template {
        question: "Which is the largest state in India by area?",
        options: ["Maharashtra", "Rajasthan", "Madhya Pradesh", "Uttar Pradesh"],
        answer: 1,
        explanation: "Rajasthan is the largest state by area.",
    },
];

const ENGLISH: [Template; 3] = [
    Template {
        question: "Choose the correct spelling:",
        options: ["Accommodate", "Accomodate", "Acommodate", "Acomodate"],
        answer: 0,
        explanation: "Accommodate is the correct spelling.",
    },
    Template {
        question: "What is the synonym of 'happy'?",
        options: ["Sad", "Joyful", "Angry", "Tired"],
        answer: 1,
        explanation: "Joyful means happy.",
    },
    Template {
        question: "Choose the antonym of 'difficult':",
        options: ["Hard", "Tough", "Easy", "Complex"],
        answer: 2,
        explanation: "Easy is the opposite of difficult.",
    },
];

fn sample_questions(templates: &[Template], count: usize) -> Vec<QuizQuestion> {
    templates
        .iter()
        .cycle()
        .take(count)
        .map(|t| QuizQuestion::new(t.question, t.options, t.answer, t.explanation))
        .collect()
}

fn sample_quiz(quiz_id: &str, date: &str, subject: &str, templates: &[Template]) -> Quiz {
    let questions = sample_questions(templates, SAMPLE_QUESTION_COUNT);
    Quiz {
        quiz_id: quiz_id.to_string(),
        date: date.to_string(),
        subject: subject.to_string(),
        total_questions: questions.len() as u32,
        time_limit: Quiz::time_limit_for(&questions),
        questions,
        created_at: Some(Utc::now()),
    }
}

/// Quizzes a brand-new profile starts with.
pub fn sample_quizzes() -> Vec<Quiz> {
    vec![
        sample_quiz(
            "quiz_sample_1",
            "2025-10-18",
            "General Knowledge",
            &GENERAL_KNOWLEDGE,
        ),
        sample_quiz("quiz_sample_2", "2025-10-19", "English", &ENGLISH),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_have_thirty_questions_and_thirty_minutes() {
        let quizzes = sample_quizzes();
        assert_eq!(quizzes.len(), 2);
        for quiz in &quizzes {
            assert_eq!(quiz.total_questions, 30);
            assert_eq!(quiz.questions.len(), 30);
            assert_eq!(quiz.time_limit, 1800);
        }
        assert_eq!(quizzes[1].questions[3].question, "Choose the correct spelling:");
    }
}
