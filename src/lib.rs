//! Code Cascade - a descending multi-code Mastermind arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (codes, clock, scoring, session state)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard
//! - `error`: Error types
//!
//! Rendering, audio and input live in the host. They read `Session::view`,
//! play the cues from `Session::drain_cues`, and call the intent methods on `Session`.

pub mod error;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use error::{ActionError, HighScoreError, TuningError};
pub use highscores::{HighScoreEntry, HighScores, ScoreStore};
pub use sim::Session;
pub use tuning::Tuning;

/// Wall-clock milliseconds
pub type Millis = u64;

/// Game configuration constants
pub mod consts {
    use crate::Millis;

    /// Default frame length for headless runs (~60 Hz)
    pub const FRAME_MS: Millis = 16;
    /// Leaderboard size
    pub const MAX_HIGH_SCORES: usize = 10;
}
