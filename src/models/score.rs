use serde::{Deserialize, Serialize};

use super::{Difficulty, Grade, Topic};

/// Name stored when the student left the name field blank.
pub const ANONYMOUS_NAME: &str = "Pelajar Misteri";

/// A persisted leaderboard entry.
///
/// Optional fields default when reading files written by older builds;
/// `grade` and `topic` are required because every query filters on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub grade: Grade,
    pub topic: Topic,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub timestamp: i64,
}

impl ScoreRecord {
    /// Fraction of questions answered correctly, 0.0 when the total is missing.
    pub fn ratio(&self) -> f64 {
        if self.total_questions == 0 {
            0.0
        } else {
            f64::from(self.score) / f64::from(self.total_questions)
        }
    }

    pub fn percentage(&self) -> u32 {
        (self.ratio() * 100.0).round() as u32
    }
}

/// A finished quiz, before the leaderboard assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScore {
    pub name: String,
    pub grade: Grade,
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub score: u32,
    pub total_questions: u32,
}

impl NewScore {
    pub fn into_record(self, id: String, timestamp: i64) -> ScoreRecord {
        let name = self.name.trim();
        let name = if name.is_empty() {
            ANONYMOUS_NAME.to_string()
        } else {
            name.to_string()
        };

        ScoreRecord {
            id,
            name,
            grade: self.grade,
            topic: self.topic,
            difficulty: self.difficulty,
            score: self.score.min(self.total_questions),
            total_questions: self.total_questions,
            timestamp,
        }
    }
}
