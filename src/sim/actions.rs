//! Player intents
//!
//! Every intent either applies fully or returns an `ActionError` with the session
//! left as it was.

use serde::{Deserialize, Serialize};

use super::Color;
use super::events::Cue;
use super::oracle::Feedback;
use super::schedule::Deferred;
use super::scoring::{CrackScore, progression, score_crack};
use super::state::{Draft, PowerupKind, Powerups, Screen, Session};
use super::tick::unfreeze;
use crate::Millis;
use crate::error::ActionError;

/// What a submitted guess did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GuessOutcome {
    /// Code still on the board
    Live(Feedback),
    /// Code solved
    Cracked(CrackScore),
    /// Guess budget spent; code destroyed, combo lost
    Exploded(Feedback),
}

impl Session {
    /// Reset everything and drop the first code
    pub fn start_game(&mut self, now: Millis) {
        self.generation += 1;
        self.set_urgent(false);
        self.screen = Screen::Game;
        self.score = 0;
        self.level = 1;
        self.combo = 0;
        self.puzzles.clear();
        self.selected_index = 0;
        self.draft = Draft::new();
        self.powerups = Powerups::from(self.tuning.starting_powerups);
        self.frozen = false;
        self.frozen_since = 0;
        self.freeze_end_time = 0;
        self.last_spawn_time = now;
        self.puzzles_cleared = 0;
        self.final_result = None;
        log::info!("Game {} started (seed {})", self.generation, self.seed);
        self.spawn_puzzle(now);
        self.cue(Cue::Start);
    }

    /// Abandon the run and return to the menu
    pub fn quit_to_menu(&mut self) {
        self.generation += 1;
        self.set_urgent(false);
        self.screen = Screen::Menu;
        self.puzzles.clear();
        self.selected_index = 0;
        self.draft.clear();
        self.frozen = false;
        log::info!("Returned to menu");
    }

    pub fn show_scores(&mut self) -> Result<(), ActionError> {
        self.require_screen(Screen::Menu)?;
        self.screen = Screen::Scores;
        Ok(())
    }

    pub fn show_instructions(&mut self) -> Result<(), ActionError> {
        self.require_screen(Screen::Menu)?;
        self.screen = Screen::Instructions;
        Ok(())
    }

    /// Leave the scores, instructions or game-over screen
    pub fn back_to_menu(&mut self) -> Result<(), ActionError> {
        match self.screen {
            Screen::Scores | Screen::Instructions | Screen::GameOver => {
                self.screen = Screen::Menu;
                Ok(())
            }
            _ => Err(ActionError::WrongScreen),
        }
    }

    /// Check the draft against the selected code
    pub fn submit_guess(&mut self, now: Millis) -> Result<GuessOutcome, ActionError> {
        self.require_screen(Screen::Game)?;

        let needed = self.active_code_length();
        let Some(guess) = self.draft.complete(needed) else {
            self.cue(Cue::Error);
            return Err(ActionError::IncompleteGuess {
                filled: self.draft.filled(),
                needed,
            });
        };
        let index = self.playable_selection()?;

        let puzzle = &mut self.puzzles[index];
        let feedback = puzzle.record_guess(guess);
        let (id, code_length, out_of_guesses) =
            (puzzle.id, puzzle.code_length(), puzzle.out_of_guesses());
        self.draft.clear();
        log::debug!(
            "Code {}: {} bulls, {} cows ({} guesses left)",
            id,
            feedback.bulls,
            feedback.cows,
            self.puzzles[index].guesses_left()
        );

        if feedback.is_solved(code_length) {
            Ok(GuessOutcome::Cracked(self.crack(index, now)))
        } else if out_of_guesses {
            self.explode(index);
            Ok(GuessOutcome::Exploded(feedback))
        } else {
            self.cue(Cue::Guess);
            Ok(GuessOutcome::Live(feedback))
        }
    }

    /// Point the draft at another code
    pub fn select_puzzle(&mut self, index: usize) -> Result<(), ActionError> {
        self.require_screen(Screen::Game)?;
        if index >= self.puzzles.len() {
            log::warn!("Select out of range: {} of {}", index, self.puzzles.len());
            return Err(ActionError::SelectionOutOfRange {
                index,
                len: self.puzzles.len(),
            });
        }
        self.select(index);
        Ok(())
    }

    /// Put a peg in the first empty slot; returns the slot
    pub fn add_color_to_draft(&mut self, color: Color) -> Result<usize, ActionError> {
        self.require_screen(Screen::Game)?;
        let num_colors = self.active_num_colors();
        if color >= num_colors {
            log::warn!("Color {} out of range ({} in play)", color, num_colors);
            return Err(ActionError::ColorOutOfRange { color, num_colors });
        }
        let slot = self.draft.push(color, self.active_code_length())?;
        self.cue(Cue::Click);
        Ok(slot)
    }

    /// Remove a peg; later pegs shift left
    pub fn remove_draft_slot(&mut self, index: usize) -> Result<Color, ActionError> {
        self.require_screen(Screen::Game)?;
        let color = self.draft.remove(index)?;
        self.cue(Cue::Click);
        Ok(color)
    }

    /// Remove the last peg
    pub fn pop_draft(&mut self) -> Result<Color, ActionError> {
        self.require_screen(Screen::Game)?;
        let color = self.draft.pop().ok_or(ActionError::DraftEmpty)?;
        self.cue(Cue::Click);
        Ok(color)
    }

    pub fn clear_draft(&mut self) -> Result<(), ActionError> {
        self.require_screen(Screen::Game)?;
        self.draft.clear();
        self.cue(Cue::Click);
        Ok(())
    }

    /// Spend one power-up
    pub fn use_powerup(&mut self, kind: PowerupKind, now: Millis) -> Result<(), ActionError> {
        self.require_screen(Screen::Game)?;
        if self.powerups.count(kind) == 0 {
            return Err(ActionError::PowerupDepleted(kind));
        }

        match kind {
            PowerupKind::Reveal => {
                let index = self.playable_selection()?;
                let puzzle = &self.puzzles[index];
                let slot = self
                    .draft
                    .first_unfilled(puzzle.code_length())
                    .ok_or(ActionError::NothingToReveal)?;
                let color = puzzle.secret[slot];
                self.draft.set(slot, color);
                log::info!("Revealed slot {} of code {}", slot, puzzle.id);
                self.cue(Cue::Reveal);
            }
            PowerupKind::Freeze => {
                // Close a window that expired between frames
                if self.frozen && now >= self.freeze_end_time {
                    unfreeze(self);
                }
                if !self.frozen {
                    self.frozen = true;
                    self.frozen_since = now;
                }
                self.freeze_end_time = now + self.tuning.freeze_ms;
                log::info!("Frozen until {}", self.freeze_end_time);
                self.cue(Cue::Freeze);
            }
            PowerupKind::Nuke => {
                let index = self.playable_selection()?;
                log::info!("Nuked code {}", self.puzzles[index].id);
                self.crack(index, now);
            }
        }

        self.powerups.spend(kind);
        Ok(())
    }

    fn require_screen(&self, screen: Screen) -> Result<(), ActionError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(ActionError::WrongScreen)
        }
    }

    /// Index of the selected code if it can still be played
    fn playable_selection(&self) -> Result<usize, ActionError> {
        let puzzle = self.selected().ok_or(ActionError::NoPuzzleSelected)?;
        if puzzle.is_cracking() {
            return Err(ActionError::PuzzleCracking);
        }
        Ok(self.selected_index)
    }

    /// Score a solved code and schedule its removal
    fn crack(&mut self, index: usize, now: Millis) -> CrackScore {
        let puzzle = &mut self.puzzles[index];
        puzzle.cracking_since = Some(now);
        let (id, code_length, guess_count, progress) = (
            puzzle.id,
            puzzle.code_length(),
            puzzle.guesses.len(),
            puzzle.progress,
        );

        let score = score_crack(&self.tuning, code_length, guess_count, progress, self.combo);
        self.combo = score.combo;
        self.score += score.points;
        self.puzzles_cleared += 1;
        log::info!(
            "Cracked code {} in {} guesses: +{} (combo x{}, total {})",
            id,
            guess_count,
            score.points,
            self.tuning.combo_multiplier(self.combo),
            self.score
        );

        let rewards = progression(&self.tuning, self.puzzles_cleared);
        if rewards.level_up {
            self.level += 1;
            log::info!("Level up: {}", self.level);
            self.cue(Cue::LevelUp);
        }
        if rewards.reveal {
            self.powerups.grant(PowerupKind::Reveal);
        }
        if rewards.freeze {
            self.powerups.grant(PowerupKind::Freeze);
        }
        if rewards.nuke {
            self.powerups.grant(PowerupKind::Nuke);
        }
        self.cue(Cue::Crack);

        self.schedule.push(
            now + self.tuning.crack_removal_ms,
            self.generation,
            Deferred::RemoveCracked { puzzle_id: id },
        );

        if let Some((urgent, _)) = self.most_urgent() {
            self.select(urgent);
        }
        score
    }

    /// Destroy a code that ran out of guesses
    fn explode(&mut self, index: usize) {
        let id = self.puzzles[index].id;
        self.combo = 0;
        self.retire(id);
        log::info!("Code {} exploded, combo reset", id);
        self.cue(Cue::Explode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::puzzle::Puzzle;
    use crate::tuning::Tuning;

    /// Session in play with a single known code
    fn session_with_secret(secret: Vec<Color>) -> Session {
        let mut session = Session::new(Tuning::default(), 42);
        session.start_game(0);
        let config = session.level_config();
        let id = session.next_entity_id();
        session.puzzles = vec![Puzzle::with_secret(id, secret, &config, 0)];
        session.selected_index = 0;
        session.drain_cues();
        session
    }

    fn enter(session: &mut Session, guess: &[Color]) -> Result<GuessOutcome, ActionError> {
        for &c in guess {
            session.add_color_to_draft(c)?;
        }
        session.submit_guess(1_000)
    }

    #[test]
    fn test_start_game_resets() {
        let mut session = Session::new(Tuning::default(), 3);
        session.score = 999;
        session.combo = 4;
        session.level = 7;
        session.start_game(500);
        assert_eq!(session.screen, Screen::Game);
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 1);
        assert_eq!(session.combo, 0);
        assert_eq!(session.puzzles.len(), 1);
        assert_eq!(session.last_spawn_time, 500);
        assert_eq!(session.drain_cues(), vec![Cue::Spawn, Cue::Start]);
    }

    #[test]
    fn test_walkthrough_level_one() {
        let mut session = session_with_secret(vec![1, 3]);
        assert_eq!(
            enter(&mut session, &[0, 0]),
            Ok(GuessOutcome::Live(Feedback { bulls: 0, cows: 0 }))
        );
        assert_eq!(
            enter(&mut session, &[1, 0]),
            Ok(GuessOutcome::Live(Feedback { bulls: 1, cows: 0 }))
        );
        assert_eq!(
            enter(&mut session, &[3, 1]),
            Ok(GuessOutcome::Live(Feedback { bulls: 0, cows: 2 }))
        );
        let Ok(GuessOutcome::Cracked(score)) = enter(&mut session, &[1, 3]) else {
            panic!("expected crack");
        };
        assert!(!score.speed_bonus);
        assert_eq!(score.combo, 1);
        assert_eq!(score.points, 300);
        assert_eq!(session.score, 300);
        assert_eq!(session.puzzles_cleared, 1);
        assert!(session.puzzles[0].is_cracking());
        assert!(session.draft.is_empty());
    }

    #[test]
    fn test_incomplete_guess_rejected() {
        let mut session = session_with_secret(vec![1, 3]);
        session.add_color_to_draft(2).unwrap();
        session.drain_cues();
        assert_eq!(
            session.submit_guess(10),
            Err(ActionError::IncompleteGuess {
                filled: 1,
                needed: 2
            })
        );
        assert!(session.puzzles[0].guesses.is_empty());
        assert_eq!(session.draft.filled(), 1);
        assert_eq!(session.drain_cues(), vec![Cue::Error]);
    }

    #[test]
    fn test_explode_resets_combo() {
        let mut session = session_with_secret(vec![1, 3]);
        session.combo = 5;
        for _ in 0..5 {
            assert!(matches!(enter(&mut session, &[0, 0]), Ok(GuessOutcome::Live(_))));
        }
        assert!(matches!(
            enter(&mut session, &[0, 0]),
            Ok(GuessOutcome::Exploded(_))
        ));
        assert_eq!(session.combo, 0);
        assert!(session.puzzles.is_empty());
        assert_eq!(session.selected_index, 0);
    }

    #[test]
    fn test_guess_on_cracking_code_rejected() {
        let mut session = session_with_secret(vec![1, 3]);
        enter(&mut session, &[1, 3]).unwrap();
        session.add_color_to_draft(1).unwrap();
        session.add_color_to_draft(3).unwrap();
        assert_eq!(session.submit_guess(2_000), Err(ActionError::PuzzleCracking));
        assert_eq!(session.puzzles_cleared, 1);
    }

    #[test]
    fn test_guess_goes_to_selected_code() {
        let mut session = session_with_secret(vec![1, 3]);
        let config = session.level_config();
        let id = session.next_entity_id();
        session
            .puzzles
            .push(Puzzle::with_secret(id, vec![2, 3], &config, 0));
        session.select_puzzle(1).unwrap();

        let outcome = enter(&mut session, &[2, 3]);
        assert!(matches!(outcome, Ok(GuessOutcome::Cracked(_))));
        assert!(session.puzzles[1].is_cracking());
        assert_eq!(session.puzzles[1].guesses.len(), 1);
        assert!(!session.puzzles[0].is_cracking());
        assert!(session.puzzles[0].guesses.is_empty());
        // Selection moves back to the code still in play
        assert_eq!(session.selected_index, 0);
    }

    #[test]
    fn test_color_bounds() {
        let mut session = session_with_secret(vec![1, 3]);
        assert_eq!(
            session.add_color_to_draft(4),
            Err(ActionError::ColorOutOfRange {
                color: 4,
                num_colors: 4
            })
        );
        assert_eq!(session.add_color_to_draft(0), Ok(0));
        assert_eq!(session.add_color_to_draft(1), Ok(1));
        assert_eq!(session.add_color_to_draft(2), Err(ActionError::DraftFull));
    }

    #[test]
    fn test_draft_edits() {
        let mut session = session_with_secret(vec![1, 3, 2]);
        session.add_color_to_draft(2).unwrap();
        session.add_color_to_draft(0).unwrap();
        session.add_color_to_draft(1).unwrap();
        assert_eq!(session.remove_draft_slot(0), Ok(2));
        assert_eq!(session.draft.slots(), &[Some(0), Some(1)]);
        assert_eq!(session.pop_draft(), Ok(1));
        session.clear_draft().unwrap();
        assert_eq!(session.pop_draft(), Err(ActionError::DraftEmpty));
        assert_eq!(session.remove_draft_slot(0), Err(ActionError::SlotEmpty(0)));
    }

    #[test]
    fn test_select_out_of_range() {
        let mut session = session_with_secret(vec![1, 3]);
        assert_eq!(
            session.select_puzzle(1),
            Err(ActionError::SelectionOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(session.select_puzzle(0), Ok(()));
    }

    #[test]
    fn test_reveal_fills_next_slot() {
        let mut session = session_with_secret(vec![1, 3]);
        session.add_color_to_draft(0).unwrap();
        session.use_powerup(PowerupKind::Reveal, 10).unwrap();
        assert_eq!(session.draft.slots(), &[Some(0), Some(3)]);
        assert_eq!(session.powerups.reveal, 1);
        assert!(session.puzzles[0].guesses.is_empty());
        assert_eq!(
            session.use_powerup(PowerupKind::Reveal, 20),
            Err(ActionError::NothingToReveal)
        );
        assert_eq!(session.powerups.reveal, 1);
    }

    #[test]
    fn test_depleted_powerup_is_noop() {
        let mut session = session_with_secret(vec![1, 3]);
        assert_eq!(
            session.use_powerup(PowerupKind::Nuke, 10),
            Err(ActionError::PowerupDepleted(PowerupKind::Nuke))
        );
        assert_eq!(session.puzzles_cleared, 0);
    }

    #[test]
    fn test_nuke_cracks_with_full_credit() {
        let mut session = session_with_secret(vec![1, 3]);
        session.powerups.nuke = 1;
        session.combo = 1;
        session.use_powerup(PowerupKind::Nuke, 10).unwrap();
        assert_eq!(session.powerups.nuke, 0);
        assert_eq!(session.combo, 2);
        // 200 * 1.5 speed bonus * 2.0 combo
        assert_eq!(session.score, 600);
        assert!(session.puzzles[0].is_cracking());
        assert_eq!(
            session.use_powerup(PowerupKind::Nuke, 20),
            Err(ActionError::PowerupDepleted(PowerupKind::Nuke))
        );
    }

    #[test]
    fn test_freeze_does_not_stack() {
        let mut session = session_with_secret(vec![1, 3]);
        session.powerups.freeze = 2;
        session.use_powerup(PowerupKind::Freeze, 1_000).unwrap();
        assert!(session.frozen);
        assert_eq!(session.freeze_end_time, 11_000);
        session.use_powerup(PowerupKind::Freeze, 4_000).unwrap();
        assert_eq!(session.frozen_since, 1_000);
        assert_eq!(session.freeze_end_time, 14_000);
        assert_eq!(session.powerups.freeze, 0);
    }

    #[test]
    fn test_rewards_on_twenty_first_clear() {
        let mut session = session_with_secret(vec![1, 3]);
        session.puzzles_cleared = 20;
        let before = session.powerups;
        enter(&mut session, &[1, 3]).unwrap();
        assert_eq!(session.puzzles_cleared, 21);
        assert_eq!(session.powerups.reveal, before.reveal + 1);
        assert_eq!(session.powerups.freeze, before.freeze + 1);
        assert_eq!(session.powerups.nuke, before.nuke);
        assert_eq!(session.level, 1);
    }

    #[test]
    fn test_level_up_every_fifth_clear() {
        let mut session = session_with_secret(vec![1, 3]);
        session.puzzles_cleared = 4;
        enter(&mut session, &[1, 3]).unwrap();
        assert_eq!(session.level, 2);
        let cues = session.drain_cues();
        assert!(cues.contains(&Cue::LevelUp));
    }

    #[test]
    fn test_intents_need_game_screen() {
        let mut session = Session::new(Tuning::default(), 1);
        assert_eq!(session.add_color_to_draft(0), Err(ActionError::WrongScreen));
        assert_eq!(session.submit_guess(0), Err(ActionError::WrongScreen));
        assert_eq!(session.show_scores(), Ok(()));
        assert_eq!(session.show_instructions(), Err(ActionError::WrongScreen));
        assert_eq!(session.back_to_menu(), Ok(()));
        assert_eq!(session.back_to_menu(), Err(ActionError::WrongScreen));
    }
}
