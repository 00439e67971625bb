//! Best-episode leaderboard
//!
//! Keeps the top episode returns seen by the driver, persisted as JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FileError;

/// Maximum number of episodes to keep
pub const MAX_ENTRIES: usize = 10;

/// A single finished episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEntry {
    /// Reward accumulated over the episode
    pub total_reward: f64,
    /// Steps survived
    pub steps: u64,
    /// Episode number within the run that produced it
    pub episode: u64,
    /// Seed of the run that produced it
    pub seed: u64,
}

/// Episode leaderboard, sorted by descending return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<EpisodeEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a return qualifies for the leaderboard
    pub fn qualifies(&self, total_reward: f64) -> bool {
        if !total_reward.is_finite() {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries
            .last()
            .map(|e| total_reward > e.total_reward)
            .unwrap_or(true)
    }

    /// Get the rank a return would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, total_reward: f64) -> Option<usize> {
        if !self.qualifies(total_reward) {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| total_reward > e.total_reward);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished episode. Returns the rank achieved, if any.
    pub fn record(&mut self, entry: EpisodeEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.total_reward)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best return so far
    pub fn best(&self) -> Option<f64> {
        self.entries.first().map(|e| e.total_reward)
    }

    /// Load a leaderboard file; a missing file gives an empty board
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No leaderboard at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let board: Self = serde_json::from_str(&fs::read_to_string(path)?)?;
        log::info!("Loaded {} leaderboard entries", board.entries.len());
        Ok(board)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FileError> {
        fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}
