//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters as explicit millisecond timestamps
//! - Seeded RNG only
//! - Stable iteration order (board order, newest first)
//! - No rendering, audio or platform dependencies

pub mod actions;
pub mod events;
pub mod oracle;
pub mod puzzle;
pub mod schedule;
pub mod scoring;
pub mod state;
pub mod tick;
pub mod view;

/// Peg color (index into the palette)
pub type Color = u8;

pub use actions::GuessOutcome;
pub use events::Cue;
pub use oracle::{Feedback, evaluate};
pub use puzzle::{GuessAttempt, Puzzle};
pub use schedule::{Deferred, Schedule, Scheduled};
pub use scoring::{CrackScore, Progression, progression, score_crack};
pub use state::{Draft, FinalResult, PowerupKind, Powerups, Screen, Session};
pub use tick::{flush_deferred, tick};
pub use view::{PuzzleView, SessionView};
