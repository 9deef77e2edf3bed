use chrono::Utc;
use serde::Serialize;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        quiz_question::OPTION_COUNT, Quiz, QuizAttempt, QuizResults, QuizState, UserSession,
    },
    services::scoring::{format_duration, score_answers},
};

/// Timer turns amber at or below this many seconds.
pub const CAUTION_SECS: i64 = 300;
/// Timer turns red at or below this many seconds.
pub const CRITICAL_SECS: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Active,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// Remaining time just crossed the warning threshold.
    Warning,
    /// Time ran out on this tick. Reported once per session.
    Expired,
    /// Nothing to count: the session is no longer active or already expired.
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaletteStatus {
    Current,
    Marked,
    Answered,
    NotVisited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteSlot {
    pub number: usize,
    pub status: PaletteStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerBand {
    Normal,
    Caution,
    Critical,
}

impl TimerBand {
    pub fn for_remaining(seconds: i64) -> Self {
        if seconds <= CRITICAL_SECS {
            TimerBand::Critical
        } else if seconds <= CAUTION_SECS {
            TimerBand::Caution
        } else {
            TimerBand::Normal
        }
    }
}

/// Everything a presentation layer needs to draw the current question.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub quiz_id: String,
    pub subject: String,
    pub user_name: String,
    pub phase: SessionPhase,
    pub question_number: usize,
    pub total_questions: usize,
    pub question: String,
    pub options: Vec<String>,
    pub selected: Option<u8>,
    pub marked: bool,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    pub time_remaining: i64,
    pub timer_text: String,
    pub timer_band: TimerBand,
    pub progress_percent: u32,
    pub answered: usize,
    pub marked_count: usize,
    pub not_visited: usize,
    pub palette: Vec<PaletteSlot>,
    pub exit_guard: bool,
}

/// Records produced when a submission starts, before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionDraft {
    pub results: QuizResults,
    pub attempt: QuizAttempt,
}

/// One user's run through one quiz. Owns the answers, navigation and countdown;
/// performs no I/O.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    user: UserSession,
    state: QuizState,
    phase: SessionPhase,
    warning_secs: i64,
    expired: bool,
}

impl QuizSession {
    /// Resumes from `state`; a saved index past the end is clamped to the last question.
    pub fn new(quiz: Quiz, user: UserSession, mut state: QuizState, warning_secs: i64) -> Self {
        let last = quiz.question_count().saturating_sub(1);
        state.current_question_index = state.current_question_index.min(last);
        state
            .user_answers
            .retain(|&index, &mut option| index <= last && usize::from(option) < OPTION_COUNT);
        state.marked_for_review.retain(|&index| index <= last);

        Self {
            quiz,
            user,
            state,
            phase: SessionPhase::Active,
            warning_secs,
            expired: false,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn user(&self) -> &UserSession {
        &self.user
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn current_index(&self) -> usize {
        self.state.current_question_index
    }

    pub fn time_remaining(&self) -> i64 {
        self.state.time_remaining
    }

    /// Leaving mid-quiz should be confirmed while answers can still change.
    pub fn exit_guard_active(&self) -> bool {
        self.is_active()
    }

    pub fn snapshot(&self) -> QuizState {
        self.state.clone()
    }

    fn ensure_active(&self) -> AppResult<()> {
        match self.phase {
            SessionPhase::Active => Ok(()),
            SessionPhase::Submitting => Err(AppError::InvalidState(
                "Quiz submission is in progress".to_string(),
            )),
            SessionPhase::Submitted => Err(AppError::InvalidState(
                "Quiz has already been submitted".to_string(),
            )),
        }
    }

    fn total(&self) -> usize {
        self.quiz.question_count()
    }

    /// Moves to `index`; out-of-range indexes leave the position unchanged.
    pub fn go_to(&mut self, index: usize) -> AppResult<bool> {
        self.ensure_active()?;
        if index >= self.total() {
            return Ok(false);
        }
        self.state.current_question_index = index;
        Ok(true)
    }

    pub fn next(&mut self) -> AppResult<bool> {
        let next = self.state.current_question_index + 1;
        self.go_to(next)
    }

    pub fn prev(&mut self) -> AppResult<bool> {
        self.ensure_active()?;
        match self.state.current_question_index.checked_sub(1) {
            Some(prev) => self.go_to(prev),
            None => Ok(false),
        }
    }

    pub fn select_option(&mut self, option: u8) -> AppResult<()> {
        self.ensure_active()?;
        if usize::from(option) >= OPTION_COUNT {
            return Err(AppError::ValidationError(format!(
                "Option index must be between 0 and {}",
                OPTION_COUNT - 1
            )));
        }
        if self.total() == 0 {
            return Ok(());
        }
        self.state
            .user_answers
            .insert(self.state.current_question_index, option);
        Ok(())
    }

    pub fn clear_response(&mut self) -> AppResult<()> {
        self.ensure_active()?;
        self.state
            .user_answers
            .remove(&self.state.current_question_index);
        Ok(())
    }

    /// Returns whether the current question is marked afterwards.
    pub fn toggle_mark(&mut self) -> AppResult<bool> {
        self.ensure_active()?;
        let index = self.state.current_question_index;
        if self.state.marked_for_review.remove(&index) {
            Ok(false)
        } else if index < self.total() {
            self.state.marked_for_review.insert(index);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Commits the visible selection, if any, then advances when not on the last question.
    pub fn save_and_next(&mut self, visible: Option<u8>) -> AppResult<bool> {
        if let Some(option) = visible {
            self.select_option(option)?;
        }
        self.next()
    }

    /// Counts down one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_active() || self.expired {
            return TickOutcome::Idle;
        }
        if self.state.time_remaining <= 0 {
            self.expired = true;
            return TickOutcome::Expired;
        }

        let previous = self.state.time_remaining;
        self.state.time_remaining -= 1;
        let remaining = self.state.time_remaining;

        if remaining <= 0 {
            self.expired = true;
            TickOutcome::Expired
        } else if previous > self.warning_secs && remaining <= self.warning_secs {
            TickOutcome::Warning
        } else {
            TickOutcome::Running
        }
    }

    /// Freezes the session and scores it. Fails if a submission was already started,
    /// so a timeout racing a manual submit produces a single attempt.
    pub fn begin_submit(&mut self, visible: Option<u8>) -> AppResult<SubmissionDraft> {
        self.ensure_active()?;
        if let Some(option) = visible {
            self.select_option(option)?;
        }
        self.phase = SessionPhase::Submitting;

        let summary = score_answers(&self.quiz, &self.state.user_answers);
        let elapsed = i64::from(self.quiz.time_limit) - self.state.time_remaining.max(0);
        let time_taken = format_duration(elapsed);
        let now = Utc::now();
        let date = now.format("%Y-%m-%d").to_string();

        let results = QuizResults {
            quiz_id: self.quiz.quiz_id.clone(),
            total: summary.total,
            correct: summary.correct,
            incorrect: summary.incorrect,
            unattempted: summary.unattempted,
            score: summary.score(),
            percentage: summary.accuracy(),
            time_taken: time_taken.clone(),
            answers: self.state.user_answers.clone(),
            date: date.clone(),
        };
        let attempt = QuizAttempt {
            attempt_id: QuizAttempt::new_attempt_id(),
            quiz_id: self.quiz.quiz_id.clone(),
            user_name: self.user.user_name.clone(),
            email: self.user.email.clone(),
            score: summary.score(),
            total: summary.total,
            accuracy: summary.accuracy(),
            time: time_taken,
            date,
            timestamp: Some(now),
        };

        Ok(SubmissionDraft { results, attempt })
    }

    pub fn complete_submit(&mut self) {
        if self.phase == SessionPhase::Submitting {
            self.phase = SessionPhase::Submitted;
        }
    }

    /// Re-opens the session after a submission whose local write failed. An expired
    /// session reports expiry again on the next tick.
    pub fn abort_submit(&mut self) {
        if self.phase == SessionPhase::Submitting {
            self.phase = SessionPhase::Active;
            self.expired = false;
        }
    }

    pub fn slot_status(&self, index: usize) -> PaletteStatus {
        if index == self.state.current_question_index {
            PaletteStatus::Current
        } else if self.state.marked_for_review.contains(&index) {
            PaletteStatus::Marked
        } else if self.state.user_answers.contains_key(&index) {
            PaletteStatus::Answered
        } else {
            PaletteStatus::NotVisited
        }
    }

    pub fn palette(&self) -> Vec<PaletteSlot> {
        (0..self.total())
            .map(|index| PaletteSlot {
                number: index + 1,
                status: self.slot_status(index),
            })
            .collect()
    }

    pub fn answered_count(&self) -> usize {
        self.state.user_answers.len()
    }

    pub fn marked_count(&self) -> usize {
        self.state.marked_for_review.len()
    }

    pub fn progress_percent(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (100.0 * self.answered_count() as f64 / total as f64).round() as u32
    }

    pub fn view(&self) -> SessionView {
        let index = self.state.current_question_index;
        let question = self.quiz.question(index);
        let total = self.total();

        SessionView {
            quiz_id: self.quiz.quiz_id.clone(),
            subject: self.quiz.subject.clone(),
            user_name: self.user.user_name.clone(),
            phase: self.phase,
            question_number: index + 1,
            total_questions: total,
            question: question.map(|q| q.question.clone()).unwrap_or_default(),
            options: question.map(|q| q.options.to_vec()).unwrap_or_default(),
            selected: self.state.user_answers.get(&index).copied(),
            marked: self.state.marked_for_review.contains(&index),
            can_go_prev: index > 0,
            can_go_next: index + 1 < total,
            time_remaining: self.state.time_remaining,
            timer_text: format_duration(self.state.time_remaining),
            timer_band: TimerBand::for_remaining(self.state.time_remaining),
            progress_percent: self.progress_percent(),
            answered: self.answered_count(),
            marked_count: self.marked_count(),
            not_visited: total - self.answered_count(),
            palette: self.palette(),
            exit_guard: self.exit_guard_active(),
        }
    }
}
