//! Row score cache.
//!
//! Every row shows a derived score computed by a deliberately CPU-bound
//! numeric recurrence. The cache memoizes scores by `(id, age, status)` and
//! is bounded: once full, the oldest inserted key is evicted first (FIFO,
//! lookups do not refresh an entry).

use crate::{RecordId, Status};
use std::collections::{HashMap, VecDeque};

/// Default maximum number of cached scores.
pub const DEFAULT_SCORE_CAPACITY: usize = 2000;

/// Iterations of the score recurrence.
pub const SCORE_ITERATIONS: usize = 50_000;

const SCORE_GROWTH: f64 = 1.0001;
const SCORE_MODULUS: f64 = 97.3;

/// Compute the score of a row from scratch.
///
/// Starts from `age + 10` for active rows (`age - 5` otherwise) and applies
/// `acc = (acc * 1.0001) % 97.3` for [`SCORE_ITERATIONS`] rounds.
pub fn compute_score(age: u32, status: Status) -> f64 {
    let bias = match status {
        Status::Active => 10.0,
        Status::Inactive => -5.0,
    };
    let mut acc = f64::from(age) + bias;
    for _ in 0..SCORE_ITERATIONS {
        acc = (acc * SCORE_GROWTH) % SCORE_MODULUS;
    }
    acc
}

/// Cache key: the only inputs the score depends on, plus the row identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoreKey {
    pub id: RecordId,
    pub age: u32,
    pub status: Status,
}

/// Bounded FIFO memo of row scores.
#[derive(Debug, Clone)]
pub struct RowScoreCache {
    capacity: usize,
    entries: HashMap<ScoreKey, f64>,
    /// Insertion order, oldest first
    order: VecDeque<ScoreKey>,
    hits: u64,
    misses: u64,
}

impl RowScoreCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Score for a row, computed on a miss.
    pub fn score_for(&mut self, id: &str, age: u32, status: Status) -> f64 {
        let key = ScoreKey {
            id: id.to_string(),
            age,
            status,
        };

        if let Some(&score) = self.entries.get(&key) {
            self.hits += 1;
            return score;
        }

        self.misses += 1;
        let score = compute_score(age, status);
        self.insert(key, score);
        score
    }

    fn insert(&mut self, key: ScoreKey, score: f64) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, score);
    }

    pub fn contains(&self, id: &str, age: u32, status: Status) -> bool {
        self.entries.contains_key(&ScoreKey {
            id: id.to_string(),
            age,
            status,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl Default for RowScoreCache {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_CAPACITY)
    }
}
