//! Aggregate game statistics with a JSON-backed store

use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub total_games: u32,
    pub total_wins: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_score: u32,
}

impl GameStats {
    pub fn record_win(&mut self, points: u32) {
        self.total_games += 1;
        self.total_wins += 1;
        self.current_streak += 1;
        self.best_streak = self.best_streak.max(self.current_streak);
        self.total_score += points;
    }

    /// A skipped or revealed round counts as a played game and breaks the streak.
    pub fn record_loss(&mut self) {
        self.total_games += 1;
        self.current_streak = 0;
    }

    /// Win rate in whole percent. Derived, never stored.
    pub fn win_rate(&self) -> u32 {
        if self.total_games == 0 {
            return 0;
        }
        ((f64::from(self.total_wins) / f64::from(self.total_games)) * 100.0).round() as u32
    }
}

/// JSON-backed stats store, written after every recorded round.
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<GameStats, GameError> {
        if !self.path.exists() {
            return Ok(GameStats::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, stats: &GameStats) -> Result<(), GameError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(stats)?)?;
        Ok(())
    }
}
