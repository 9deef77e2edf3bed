use std::{collections::HashSet, hash::Hash};

use crate::models::domain::{Quiz, QuizAttempt};

#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T> {
    pub records: Vec<T>,
    pub remote: usize,
    pub local_only: usize,
}

/// Remote-wins merge keyed by a natural identifier.
///
/// Remote records come first, in remote order; a local record survives only when no
/// remote record shares its key, and is then kept whole. Within one source the first
/// record for a key wins. Merging the same remote snapshot again is a no-op.
pub fn merge_remote_wins<T, K, F>(remote: Vec<T>, local: Vec<T>, key: F) -> Merged<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(remote.len() + local.len());

    for record in remote {
        if seen.insert(key(&record)) {
            records.push(record);
        }
    }
    let remote_count = records.len();

    for record in local {
        if seen.insert(key(&record)) {
            records.push(record);
        }
    }
    let local_only = records.len() - remote_count;

    Merged {
        records,
        remote: remote_count,
        local_only,
    }
}

pub fn merge_quizzes(remote: Vec<Quiz>, local: Vec<Quiz>) -> Merged<Quiz> {
    merge_remote_wins(remote, local, |q| q.quiz_id.clone())
}

pub fn merge_attempts(remote: Vec<QuizAttempt>, local: Vec<QuizAttempt>) -> Merged<QuizAttempt> {
    merge_remote_wins(remote, local, QuizAttempt::key)
}
