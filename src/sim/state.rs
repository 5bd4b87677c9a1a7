//! Session state and puzzle lifecycle
//!
//! One `Session` owns everything a run needs. Player intents live in `actions`,
//! the per-frame clock in `tick`.

use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::Color;
use super::events::Cue;
use super::puzzle::Puzzle;
use super::schedule::Schedule;
use crate::Millis;
use crate::error::ActionError;
use crate::tuning::{LevelConfig, PowerupLoadout, Tuning};

/// Which screen the player is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Menu,
    /// Active play (the only screen with a running clock)
    Game,
    /// A code hit the bottom; game over follows after a delay
    Explosion,
    GameOver,
    Scores,
    Instructions,
}

/// Consumable power-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerupKind {
    /// Fill the next guess slot with the right color
    Reveal,
    /// Stop the clock for a while
    Freeze,
    /// Crack the selected code outright
    Nuke,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Reveal, PowerupKind::Freeze, PowerupKind::Nuke];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Reveal => "reveal",
            PowerupKind::Freeze => "freeze",
            PowerupKind::Nuke => "nuke",
        }
    }
}

impl fmt::Display for PowerupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Power-up inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Powerups {
    pub reveal: u32,
    pub freeze: u32,
    pub nuke: u32,
}

impl From<PowerupLoadout> for Powerups {
    fn from(loadout: PowerupLoadout) -> Self {
        Self {
            reveal: loadout.reveal,
            freeze: loadout.freeze,
            nuke: loadout.nuke,
        }
    }
}

impl Powerups {
    pub fn count(&self, kind: PowerupKind) -> u32 {
        match kind {
            PowerupKind::Reveal => self.reveal,
            PowerupKind::Freeze => self.freeze,
            PowerupKind::Nuke => self.nuke,
        }
    }

    fn slot(&mut self, kind: PowerupKind) -> &mut u32 {
        match kind {
            PowerupKind::Reveal => &mut self.reveal,
            PowerupKind::Freeze => &mut self.freeze,
            PowerupKind::Nuke => &mut self.nuke,
        }
    }

    pub fn grant(&mut self, kind: PowerupKind) {
        *self.slot(kind) += 1;
    }

    /// Use one; false if none left
    pub fn spend(&mut self, kind: PowerupKind) -> bool {
        let slot = self.slot(kind);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// The guess being assembled.
///
/// Slots fill left to right; removing a slot shifts the later pegs left, so a draft
/// built through the public operations never has holes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Draft {
    slots: Vec<Option<Color>>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft with explicit (possibly empty) slots
    pub fn from_slots(slots: Vec<Option<Color>>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[Option<Color>] {
        &self.slots
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled() == 0
    }

    /// First empty slot below `capacity`
    pub fn first_unfilled(&self, capacity: usize) -> Option<usize> {
        (0..capacity).find(|&i| self.slots.get(i).copied().flatten().is_none())
    }

    /// Put a peg in a specific slot
    pub fn set(&mut self, index: usize, color: Color) {
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(color);
    }

    /// Fill the first empty slot; returns its index
    pub fn push(&mut self, color: Color, capacity: usize) -> Result<usize, ActionError> {
        let index = self.first_unfilled(capacity).ok_or(ActionError::DraftFull)?;
        self.set(index, color);
        Ok(index)
    }

    /// Clear a slot and close the gap
    pub fn remove(&mut self, index: usize) -> Result<Color, ActionError> {
        let color = self
            .slots
            .get(index)
            .copied()
            .flatten()
            .ok_or(ActionError::SlotEmpty(index))?;
        self.slots[index] = None;
        self.slots.retain(Option::is_some);
        Ok(color)
    }

    /// Drop the last peg
    pub fn pop(&mut self) -> Option<Color> {
        let index = self.slots.iter().rposition(Option::is_some)?;
        let color = self.slots[index];
        self.slots.truncate(index);
        color
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Drop slots past `len`
    pub fn truncate(&mut self, len: usize) {
        self.slots.truncate(len);
    }

    /// The full guess, if exactly `len` slots are all filled
    pub fn complete(&self, len: usize) -> Option<Vec<Color>> {
        if self.slots.len() != len {
            return None;
        }
        self.slots.iter().copied().collect()
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResult {
    pub score: u64,
    pub level: u32,
    pub puzzles_cleared: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Bumped on every restart/quit; deferred work from older runs is dropped
    pub generation: u64,
    pub screen: Screen,
    pub score: u64,
    /// 1-based level
    pub level: u32,
    /// Index into the combo multiplier table
    pub combo: usize,
    /// Live codes, newest first
    pub puzzles: Vec<Puzzle>,
    pub selected_index: usize,
    pub draft: Draft,
    pub powerups: Powerups,
    pub frozen: bool,
    pub frozen_since: Millis,
    pub freeze_end_time: Millis,
    pub last_spawn_time: Millis,
    pub puzzles_cleared: u32,
    /// Urgent countdown currently signalled
    pub urgent: bool,
    pub final_result: Option<FinalResult>,
    pub(crate) schedule: Schedule,
    pub(crate) cues: Vec<Cue>,
    next_id: u32,
}

impl Session {
    /// Fresh session on the menu screen
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let powerups = tuning.starting_powerups.into();
        Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            generation: 0,
            screen: Screen::Menu,
            score: 0,
            level: 1,
            combo: 0,
            puzzles: Vec::new(),
            selected_index: 0,
            draft: Draft::new(),
            powerups,
            frozen: false,
            frozen_since: 0,
            freeze_end_time: 0,
            last_spawn_time: 0,
            puzzles_cleared: 0,
            urgent: false,
            final_result: None,
            schedule: Schedule::new(),
            cues: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new puzzle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Parameters of the current level
    pub fn level_config(&self) -> LevelConfig {
        *self.tuning.level(self.level)
    }

    pub fn selected(&self) -> Option<&Puzzle> {
        self.puzzles.get(self.selected_index)
    }

    pub fn selected_mut(&mut self) -> Option<&mut Puzzle> {
        self.puzzles.get_mut(self.selected_index)
    }

    /// Pegs the draft needs (selected code, else the current level)
    pub fn active_code_length(&self) -> usize {
        self.selected()
            .map(Puzzle::code_length)
            .unwrap_or_else(|| self.level_config().code_length)
    }

    /// Colors the draft may use (selected code, else the current level)
    pub fn active_num_colors(&self) -> u8 {
        self.selected()
            .map(|p| p.num_colors)
            .unwrap_or_else(|| self.level_config().num_colors)
    }

    /// Codes that can still be played or lost
    pub fn live_puzzles(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.iter().filter(|p| !p.is_cracking())
    }

    /// Queued deferred actions
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Hand accumulated cues to the host
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub(crate) fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    /// Drop a new code at the top of the board; `None` when the board is full
    pub fn spawn_puzzle(&mut self, now: Millis) -> Option<u32> {
        if self.puzzles.len() >= self.tuning.max_codes {
            log::debug!("Spawn refused: {} codes on board", self.puzzles.len());
            return None;
        }
        let config = self.level_config();
        let id = self.next_entity_id();
        let puzzle = Puzzle::spawn(id, &config, now, &mut self.rng);
        self.puzzles.insert(0, puzzle);
        if self.live_puzzles().count() == 1 {
            self.select(0);
        } else {
            // Keep pointing at the same code
            self.selected_index += 1;
        }
        log::info!(
            "Spawned code {} (level {}, {} pegs, {} colors)",
            id,
            self.level,
            config.code_length,
            config.num_colors
        );
        self.cue(Cue::Spawn);
        Some(id)
    }

    /// Take a code off the board
    pub fn retire(&mut self, puzzle_id: u32) -> Option<Puzzle> {
        let idx = self.puzzles.iter().position(|p| p.id == puzzle_id)?;
        let puzzle = self.puzzles.remove(idx);
        if self.selected_index >= self.puzzles.len() {
            self.select(self.puzzles.len().saturating_sub(1));
        }
        Some(puzzle)
    }

    /// Point at another code, trimming the draft to its length
    pub(crate) fn select(&mut self, index: usize) {
        self.selected_index = index;
        let len = self.active_code_length();
        self.draft.truncate(len);
    }

    /// Highest-progress playable code (first wins ties)
    pub fn most_urgent(&self) -> Option<(usize, f64)> {
        self.puzzles
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_cracking())
            .fold(None, |best, (i, p)| match best {
                Some((_, top)) if p.progress <= top => best,
                _ => Some((i, p.progress)),
            })
    }

    /// Signal the urgent countdown on or off (edge-triggered)
    pub(crate) fn set_urgent(&mut self, urgent: bool) {
        if self.urgent == urgent {
            return;
        }
        self.urgent = urgent;
        self.cue(if urgent {
            Cue::TickUrgentStart
        } else {
            Cue::TickUrgentStop
        });
    }
}
