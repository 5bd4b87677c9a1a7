//! Data-driven game balance
//!
//! The level table and every scoring/timing constant live in one serializable
//! value so balance can be tweaked from JSON without touching the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::error::TuningError;

/// A named peg color offered to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub name: String,
    pub hex: String,
}

impl PaletteColor {
    fn new(name: &str, hex: &str) -> Self {
        Self {
            name: name.to_string(),
            hex: hex.to_string(),
        }
    }
}

/// Puzzle parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Pegs per secret code
    pub code_length: usize,
    /// Colors in play (palette prefix)
    pub num_colors: u8,
    /// Guesses before a code explodes
    pub max_guesses: usize,
    /// Time for a code to reach the bottom
    pub descent_ms: Millis,
    /// Time between automatic spawns
    pub spawn_interval_ms: Millis,
}

impl LevelConfig {
    const fn new(
        code_length: usize,
        num_colors: u8,
        max_guesses: usize,
        descent_ms: Millis,
        spawn_interval_ms: Millis,
    ) -> Self {
        Self {
            code_length,
            num_colors,
            max_guesses,
            descent_ms,
            spawn_interval_ms,
        }
    }
}

/// Built-in level table (last row repeats forever)
const DEFAULT_LEVELS: [LevelConfig; 11] = [
    LevelConfig::new(2, 4, 6, 60_000, 25_000), // Levels 1-3: two pegs
    LevelConfig::new(2, 4, 6, 55_000, 22_000),
    LevelConfig::new(3, 4, 6, 50_000, 20_000),
    LevelConfig::new(3, 5, 5, 50_000, 18_000), // Levels 4-6
    LevelConfig::new(3, 5, 5, 45_000, 16_000),
    LevelConfig::new(4, 5, 5, 45_000, 15_000),
    LevelConfig::new(4, 6, 5, 40_000, 14_000), // Levels 7-10
    LevelConfig::new(4, 6, 5, 35_000, 13_000),
    LevelConfig::new(5, 6, 5, 35_000, 12_000),
    LevelConfig::new(5, 6, 5, 30_000, 11_000),
    LevelConfig::new(5, 7, 5, 25_000, 10_000), // Level 11+
];

/// Power-up counts (used for the starting loadout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerupLoadout {
    pub reveal: u32,
    pub freeze: u32,
    pub nuke: u32,
}

/// Every N clears grants one of each reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSchedule {
    pub level_up_every: u32,
    pub reveal_every: u32,
    pub freeze_every: u32,
    pub nuke_every: u32,
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub palette: Vec<PaletteColor>,
    pub levels: Vec<LevelConfig>,
    /// Live puzzle cap
    pub max_codes: usize,
    pub points_per_peg: u32,
    pub speed_bonus: f64,
    /// Cracks in this many guesses or fewer earn the speed bonus
    pub speed_bonus_max_guesses: usize,
    pub close_call_bonus: u32,
    pub close_call_threshold: f64,
    pub combo_multipliers: Vec<f64>,
    /// Progress above which the urgent countdown plays
    pub urgent_threshold: f64,
    pub rewards: RewardSchedule,
    pub starting_powerups: PowerupLoadout,
    pub freeze_ms: Millis,
    /// Crack animation length before the code leaves the board
    pub crack_removal_ms: Millis,
    /// Explosion sequence length before the game-over screen
    pub explosion_ms: Millis,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            palette: vec![
                PaletteColor::new("red", "#ef4444"),
                PaletteColor::new("blue", "#3b82f6"),
                PaletteColor::new("green", "#22c55e"),
                PaletteColor::new("yellow", "#eab308"),
                PaletteColor::new("purple", "#a855f7"),
                PaletteColor::new("orange", "#f97316"),
                PaletteColor::new("pink", "#ec4899"),
                PaletteColor::new("cyan", "#06b6d4"),
            ],
            levels: DEFAULT_LEVELS.to_vec(),
            max_codes: 3,
            points_per_peg: 100,
            speed_bonus: 1.5,
            speed_bonus_max_guesses: 3,
            close_call_bonus: 200,
            close_call_threshold: 0.8,
            combo_multipliers: vec![1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0],
            urgent_threshold: 0.8,
            rewards: RewardSchedule {
                level_up_every: 5,
                reveal_every: 3,
                freeze_every: 7,
                nuke_every: 10,
            },
            starting_powerups: PowerupLoadout {
                reveal: 2,
                freeze: 1,
                nuke: 0,
            },
            freeze_ms: 10_000,
            crack_removal_ms: 300,
            explosion_ms: 2_000,
        }
    }
}

impl Tuning {
    /// Level parameters (1-based; clamps past the end of the table)
    pub fn level(&self, level: u32) -> &LevelConfig {
        let idx = (level.max(1) as usize - 1).min(self.levels.len().saturating_sub(1));
        &self.levels[idx]
    }

    /// Highest combo index reachable
    pub fn max_combo(&self) -> usize {
        self.combo_multipliers.len().saturating_sub(1)
    }

    /// Multiplier for a combo index (clamped)
    pub fn combo_multiplier(&self, combo: usize) -> f64 {
        self.combo_multipliers
            .get(combo.min(self.max_combo()))
            .copied()
            .unwrap_or(1.0)
    }

    /// Parse from JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject tables the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.levels.is_empty() {
            return Err(TuningError::Invalid("level table is empty".into()));
        }
        for (i, level) in self.levels.iter().enumerate() {
            let n = i + 1;
            if level.code_length == 0 {
                return Err(TuningError::Invalid(format!("level {n}: code_length is 0")));
            }
            if level.num_colors == 0 || level.num_colors as usize > self.palette.len() {
                return Err(TuningError::Invalid(format!(
                    "level {n}: num_colors {} outside 1..={}",
                    level.num_colors,
                    self.palette.len()
                )));
            }
            if level.max_guesses == 0 {
                return Err(TuningError::Invalid(format!("level {n}: max_guesses is 0")));
            }
            if level.descent_ms == 0 {
                return Err(TuningError::Invalid(format!("level {n}: descent_ms is 0")));
            }
        }
        if self.combo_multipliers.is_empty() {
            return Err(TuningError::Invalid("combo table is empty".into()));
        }
        if self.max_codes == 0 {
            return Err(TuningError::Invalid("max_codes is 0".into()));
        }
        let r = &self.rewards;
        if [r.level_up_every, r.reveal_every, r.freeze_every, r.nuke_every].contains(&0) {
            return Err(TuningError::Invalid("reward interval is 0".into()));
        }
        Ok(())
    }
}
