//! Deferred actions keyed by session generation
//!
//! Animations that outlive a frame (crack fade-out, explosion sequence) are queued
//! here and flushed by the frame driver. Every entry remembers the generation it was
//! scheduled under so a restart can't be touched by a stale entry.

use serde::{Deserialize, Serialize};

use crate::Millis;

/// Work to run once its due time passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Take a cracked code off the board
    RemoveCracked { puzzle_id: u32 },
    /// Explosion finished, show game over
    FinishExplosion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduled {
    pub due: Millis,
    pub generation: u64,
    pub action: Deferred,
}

/// Pending deferred actions, kept sorted by due time (stable for ties)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pending: Vec<Scheduled>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due: Millis, generation: u64, action: Deferred) {
        let pos = self.pending.partition_point(|s| s.due <= due);
        self.pending.insert(
            pos,
            Scheduled {
                due,
                generation,
                action,
            },
        );
    }

    /// Remove and return every entry due at or before `now`
    pub fn take_due(&mut self, now: Millis) -> Vec<Scheduled> {
        let split = self.pending.partition_point(|s| s.due <= now);
        self.pending.drain(..split).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheduled> {
        self.pending.iter()
    }
}
