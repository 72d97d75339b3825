//! Local leaderboard: append scores, query the ranked top entries per board.

mod store;

use std::cmp::Ordering;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Grade, NewScore, ScoreRecord, Topic};

pub use store::{JsonFileStore, LEADERBOARD_FILE, MemoryStore, ScoreStore, StoreError};

/// Entries returned per board.
pub const TOP_N: usize = 10;

/// Best percentage first, most recent first among equal percentages.
pub fn compare_records(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.ratio()
        .total_cmp(&a.ratio())
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// Rank `records` for one grade/topic board and keep the first `limit`.
pub fn rank(records: Vec<ScoreRecord>, grade: Grade, topic: Topic, limit: usize) -> Vec<ScoreRecord> {
    let mut board: Vec<ScoreRecord> = records
        .into_iter()
        .filter(|r| r.grade == grade && r.topic == topic)
        .collect();

    board.sort_by(compare_records);
    board.truncate(limit);
    board
}

pub struct Leaderboard {
    store: Box<dyn ScoreStore>,
}

impl Leaderboard {
    pub fn new(store: impl ScoreStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Record a finished quiz. Returns `None` when the store could not be
    /// written; the failure is logged and otherwise ignored.
    pub fn save_score(&self, score: NewScore) -> Option<ScoreRecord> {
        let record = score.into_record(Uuid::new_v4().to_string(), Utc::now().timestamp_millis());

        match self.store.append(record.clone()) {
            Ok(()) => {
                tracing::info!(
                    "Saved score {}/{} for {} (Tahun {}, {})",
                    record.score,
                    record.total_questions,
                    record.name,
                    record.grade,
                    record.topic
                );
                Some(record)
            }
            Err(err) => {
                tracing::warn!("Could not save score: {}", err);
                None
            }
        }
    }

    /// Top entries for a grade/topic board. Empty when the store is unreadable.
    pub fn top(&self, grade: Grade, topic: Topic) -> Vec<ScoreRecord> {
        match self.store.records() {
            Ok(records) => rank(records, grade, topic, TOP_N),
            Err(err) => {
                tracing::warn!("Could not read leaderboard: {}", err);
                Vec::new()
            }
        }
    }
}
