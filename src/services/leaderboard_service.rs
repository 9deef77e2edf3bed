use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::QuizAttempt,
        dto::response::{
            LeaderboardEntry, QuestionReview, ResultsView, ReviewStatus, Standing,
        },
    },
    repositories::{QuizAttemptRepository, QuizRepository, SessionRepository},
    services::{merge::merge_attempts, remote_client::QuizBackend},
};

/// Read-only views over attempts and the last results snapshot.
pub struct LeaderboardService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    sessions: Arc<dyn SessionRepository>,
    backend: Arc<dyn QuizBackend>,
}

/// Higher score first, then higher accuracy, then whoever finished earlier.
fn ranking(a: &QuizAttempt, b: &QuizAttempt) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.accuracy.total_cmp(&a.accuracy))
        .then_with(|| match (a.timestamp, b.timestamp) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.date.cmp(&b.date),
        })
}

impl LeaderboardService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        sessions: Arc<dyn SessionRepository>,
        backend: Arc<dyn QuizBackend>,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            sessions,
            backend,
        }
    }

    async fn attempts_for(&self, quiz_id: Option<&str>) -> AppResult<Vec<QuizAttempt>> {
        let local = match quiz_id {
            Some(id) => self.attempts.list_for_quiz(id)?,
            None => self.attempts.list()?,
        };
        let remote = match self.backend.list_leaderboard(quiz_id.unwrap_or("all")).await {
            Ok(rows) => rows
                .into_iter()
                .filter(|a| quiz_id.map_or(true, |id| a.quiz_id == id))
                .collect(),
            Err(err) => {
                log::warn!("Leaderboard from local attempts only: {}", err);
                Vec::new()
            }
        };
        Ok(merge_attempts(remote, local).records)
    }

    /// Ranked attempts, optionally for one quiz. Nothing is written back.
    pub async fn entries(&self, quiz_id: Option<&str>) -> AppResult<Vec<LeaderboardEntry>> {
        let mut attempts = self.attempts_for(quiz_id).await?;
        attempts.sort_by(ranking);

        let subjects: HashMap<String, String> = self
            .quizzes
            .list()?
            .into_iter()
            .map(|q| (q.quiz_id, q.subject))
            .collect();

        Ok(attempts
            .into_iter()
            .enumerate()
            .map(|(i, a)| LeaderboardEntry {
                rank: i + 1,
                subject: subjects
                    .get(&a.quiz_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
                user_name: a.user_name,
                email: a.email,
                quiz_id: a.quiz_id,
                score: a.score,
                total: a.total,
                accuracy: a.accuracy,
                time: a.time,
                date: a.date,
            })
            .collect())
    }

    /// One row per email: attempt count, best score and mean accuracy.
    pub async fn standings(&self, quiz_id: Option<&str>) -> AppResult<Vec<Standing>> {
        let attempts = self.attempts_for(quiz_id).await?;

        let mut order: Vec<String> = Vec::new();
        let mut grouped: HashMap<String, Vec<QuizAttempt>> = HashMap::new();
        for attempt in attempts {
            let key = attempt.email.to_lowercase();
            if !grouped.contains_key(&key) {
                order.push(key.clone());
            }
            grouped.entry(key).or_default().push(attempt);
        }

        let mut standings: Vec<Standing> = order
            .into_iter()
            .filter_map(|key| grouped.remove(&key))
            .map(|group| {
                let best = group.iter().map(|a| a.score).max().unwrap_or(0);
                let average =
                    group.iter().map(|a| a.accuracy).sum::<f64>() / group.len() as f64;
                Standing {
                    rank: 0,
                    user_name: group[0].user_name.clone(),
                    email: group[0].email.clone(),
                    attempts: group.len(),
                    best_score: best,
                    average_accuracy: average,
                }
            })
            .collect();

        standings.sort_by(|a, b| {
            b.best_score
                .cmp(&a.best_score)
                .then_with(|| b.average_accuracy.total_cmp(&a.average_accuracy))
        });
        for (i, standing) in standings.iter_mut().enumerate() {
            standing.rank = i + 1;
        }
        Ok(standings)
    }

    /// The last submission joined with its quiz for per-question review.
    pub fn results_view(&self) -> AppResult<ResultsView> {
        let results = self
            .sessions
            .load_results()?
            .ok_or_else(|| AppError::NotFound("No results available".to_string()))?;
        let quiz = self
            .quizzes
            .find_by_id(&results.quiz_id)?
            .ok_or_else(|| AppError::NotFound("Quiz data not found".to_string()))?;

        let review = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let selected = results.answers.get(&i).copied();
                let status = match selected {
                    None => ReviewStatus::Unattempted,
                    Some(option) if q.is_correct(option) => ReviewStatus::Correct,
                    Some(_) => ReviewStatus::Incorrect,
                };
                QuestionReview {
                    number: i + 1,
                    question: q.question.clone(),
                    options: q.options.to_vec(),
                    selected,
                    correct_answer: q.correct_answer,
                    explanation: q.explanation.clone(),
                    status,
                }
            })
            .collect();

        Ok(ResultsView {
            subject: quiz.subject,
            results,
            review,
        })
    }
}
