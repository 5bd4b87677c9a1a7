//! Error types
//!
//! Rejected player intents are plain values: the session is left untouched and the
//! caller decides how to show it (shake, error sound).

use thiserror::Error;

use crate::sim::PowerupKind;

/// A player intent the session refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("not available on the current screen")]
    WrongScreen,

    #[error("guess has {filled} of {needed} pegs")]
    IncompleteGuess { filled: usize, needed: usize },

    #[error("no code selected")]
    NoPuzzleSelected,

    #[error("selected code is already cracked")]
    PuzzleCracking,

    #[error("code index {index} out of range ({len} on board)")]
    SelectionOutOfRange { index: usize, len: usize },

    #[error("color {color} out of range ({num_colors} in play)")]
    ColorOutOfRange { color: u8, num_colors: u8 },

    #[error("guess is already full")]
    DraftFull,

    #[error("guess slot {0} is empty")]
    SlotEmpty(usize),

    #[error("guess is empty")]
    DraftEmpty,

    #[error("no {0} power-ups left")]
    PowerupDepleted(PowerupKind),

    #[error("nothing left to reveal")]
    NothingToReveal,
}

/// Failure loading a tuning file
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Failure loading or saving the leaderboard
#[derive(Error, Debug)]
pub enum HighScoreError {
    #[error("high score JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("high score file: {0}")]
    Io(#[from] std::io::Error),
}
