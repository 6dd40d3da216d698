//! Bounded conversation history.
//!
//! Append-only, FIFO eviction once `capacity` is exceeded. The length never
//! exceeds the capacity, including right after loading from disk.
//!
//! History can be saved as a pretty-printed JSON array of turns and loaded
//! back; a missing file loads as an empty history.

use chatroute_core::message::Turn;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default number of turns kept.
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct History {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl History {
    /// Capacity is at least one turn.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a turn, returning the evicted oldest turn if the bound was hit.
    pub fn push(&mut self, turn: Turn) -> Option<Turn> {
        self.turns.push_back(turn);
        if self.turns.len() > self.capacity {
            self.turns.pop_front()
        } else {
            None
        }
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn oldest(&self) -> Option<&Turn> {
        self.turns.front()
    }

    pub fn latest(&self) -> Option<&Turn> {
        self.turns.back()
    }

    /// Copy of every stored turn, oldest first.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Copy of the `count` most recent turns, still oldest first.
    pub fn recent(&self, count: usize) -> Vec<Turn> {
        let skip = self.turns.len().saturating_sub(count);
        self.turns.iter().skip(skip).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Write all turns to `path` as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| HistoryError::Write {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let turns: Vec<&Turn> = self.turns.iter().collect();
        let json = serde_json::to_string_pretty(&turns).map_err(|e| HistoryError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        std::fs::write(path, json).map_err(|e| HistoryError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), turns = self.turns.len(), "History saved");
        Ok(())
    }

    /// Load turns from `path`. Only the newest `capacity` turns are kept.
    pub fn load(path: &Path, capacity: usize) -> Result<Self, HistoryError> {
        let mut history = Self::new(capacity);

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(history),
            Err(e) => {
                return Err(HistoryError::Read {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let turns: Vec<Turn> = serde_json::from_str(&content).map_err(|e| HistoryError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for turn in turns {
            history.push(turn);
        }

        debug!(path = %path.display(), turns = history.len(), "History loaded");
        Ok(history)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// History persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Failed to read history file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse history file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to write history file at {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}
