//! Named cues for the audio/visual layer
//!
//! The simulation only records cues; playing them is the host's job.

use serde::{Deserialize, Serialize};

/// Fire-and-forget cue emitted by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    /// New code dropped onto the board
    Spawn,
    /// Guess submitted, code still live
    Guess,
    /// Code cracked
    Crack,
    /// Code ran out of guesses
    Explode,
    /// A code hit the bottom
    Explosion,
    /// Rejected input
    Error,
    LevelUp,
    Reveal,
    Freeze,
    Start,
    GameOver,
    /// A code is close to the bottom
    TickUrgentStart,
    TickUrgentStop,
    /// Draft edited
    Click,
}

impl Cue {
    /// Stable name for hosts that key sounds by string
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Spawn => "spawn",
            Cue::Guess => "guess",
            Cue::Crack => "crack",
            Cue::Explode => "explode",
            Cue::Explosion => "explosion",
            Cue::Error => "error",
            Cue::LevelUp => "levelup",
            Cue::Reveal => "reveal",
            Cue::Freeze => "freeze",
            Cue::Start => "start",
            Cue::GameOver => "gameover",
            Cue::TickUrgentStart => "tick-urgent-start",
            Cue::TickUrgentStop => "tick-urgent-stop",
            Cue::Click => "click",
        }
    }
}
