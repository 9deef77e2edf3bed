use serde::{Deserialize, Serialize};

/// Every question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Seconds granted to a question whose `timeAllocation` is absent.
pub const DEFAULT_TIME_ALLOCATION: u32 = 60;

fn default_time_allocation() -> u32 {
    DEFAULT_TIME_ALLOCATION
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: u8,
    pub explanation: String,
    #[serde(default = "default_time_allocation")]
    pub time_allocation: u32,
}

impl QuizQuestion {
    pub fn new(
        question: &str,
        options: [&str; OPTION_COUNT],
        correct_answer: u8,
        explanation: &str,
    ) -> Self {
        QuizQuestion {
            question: question.to_string(),
            options: options.map(str::to_string),
            correct_answer,
            explanation: explanation.to_string(),
            time_allocation: DEFAULT_TIME_ALLOCATION,
        }
    }

    pub fn with_time_allocation(mut self, seconds: u32) -> Self {
        self.time_allocation = seconds;
        self
    }

    pub fn is_correct(&self, selected: u8) -> bool {
        selected == self.correct_answer
    }

    /// Letter shown next to an option index: 0 -> 'A'.
    pub fn option_label(index: u8) -> char {
        (b'A' + index) as char
    }
}
