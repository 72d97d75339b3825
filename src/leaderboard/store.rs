//! Persistence backends for score records.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use thiserror::Error;

use crate::models::ScoreRecord;

pub const LEADERBOARD_FILE: &str = "leaderboard.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("leaderboard data is not a JSON array: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("leaderboard lock poisoned")]
    Poisoned,
}

/// Append-only storage for score records.
pub trait ScoreStore: Send + Sync {
    fn append(&self, record: ScoreRecord) -> Result<(), StoreError>;

    /// Every stored record, oldest first.
    fn records(&self) -> Result<Vec<ScoreRecord>, StoreError>;
}

/// Keeps records for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ScoreRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<ScoreRecord>>, StoreError> {
        self.records.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl ScoreStore for MemoryStore {
    fn append(&self, record: ScoreRecord) -> Result<(), StoreError> {
        self.lock()?.push(record);
        Ok(())
    }

    fn records(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        Ok(self.lock()?.clone())
    }
}

/// All records in one JSON array file, rewritten on every append.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at `<dir>/leaderboard.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(LEADERBOARD_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Entries exactly as stored, including ones this build cannot read.
    fn read_raw(&self) -> Result<Vec<Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.io_error(err)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn read(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let values = self.read_raw()?;
        let total = values.len();
        let records: Vec<ScoreRecord> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();

        if records.len() < total {
            tracing::warn!(
                "Skipped {} unreadable record(s) in {}",
                total - records.len(),
                self.path.display()
            );
        }

        Ok(records)
    }

    fn write(&self, records: &[Value]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl ScoreStore for JsonFileStore {
    fn append(&self, record: ScoreRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.read_raw()?;
        entries.push(serde_json::to_value(&record)?);
        self.write(&entries)
    }

    fn records(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.read()
    }
}
