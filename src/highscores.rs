//! High score leaderboard system
//!
//! Tracks the top 10 finished runs, highest first.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_HIGH_SCORES;
use crate::error::HighScoreError;
use crate::sim::FinalResult;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Display date, formatted by the host
    pub date: String,
}

impl HighScoreEntry {
    pub fn new(score: u64, level: u32, date: impl Into<String>) -> Self {
        Self {
            score,
            level,
            date: date.into(),
        }
    }

    /// Entry for a finished run
    pub fn from_result(result: &FinalResult, date: impl Into<String>) -> Self {
        Self::new(result.score, result.level, date)
    }
}

/// Where finished runs are kept
pub trait ScoreStore {
    /// Record a run; returns its rank (1-indexed) if it made the board
    fn record_score(&mut self, entry: HighScoreEntry) -> Option<usize>;

    /// Best `n` entries, highest first
    fn top_scores(&self, n: usize) -> Vec<HighScoreEntry>;
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn best_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// True if `score` matches or beats everything on the board
    pub fn is_new_best(&self, score: u64) -> bool {
        self.best_score().is_none_or(|best| score >= best)
    }

    pub fn to_json(&self) -> Result<String, HighScoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a saved board, re-sorting and trimming it
    pub fn from_json(json: &str) -> Result<Self, HighScoreError> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    /// Load a board from disk; a missing file is an empty board
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HighScoreError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No high scores at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let scores = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), HighScoreError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ScoreStore for HighScores {
    fn record_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Ties keep the earlier run ahead
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    fn top_scores(&self, n: usize) -> Vec<HighScoreEntry> {
        self.entries.iter().take(n).cloned().collect()
    }
}
