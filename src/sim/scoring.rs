//! Crack scoring, combo streaks and progression rewards

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Points awarded for one crack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrackScore {
    pub points: u64,
    /// Combo index after this crack
    pub combo: usize,
    pub speed_bonus: bool,
    pub close_call: bool,
}

/// Rewards unlocked by reaching a clear count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progression {
    pub level_up: bool,
    pub reveal: bool,
    pub freeze: bool,
    pub nuke: bool,
}

/// Score a crack.
///
/// Base points per peg, times the speed bonus, plus the flat close-call bonus, all
/// times the multiplier of the bumped combo, floored.
pub fn score_crack(
    tuning: &Tuning,
    code_length: usize,
    guess_count: usize,
    progress: f64,
    combo: usize,
) -> CrackScore {
    let mut points = (code_length as u64 * tuning.points_per_peg as u64) as f64;

    let speed_bonus = guess_count <= tuning.speed_bonus_max_guesses;
    if speed_bonus {
        points *= tuning.speed_bonus;
    }

    let close_call = progress > tuning.close_call_threshold;
    if close_call {
        points += tuning.close_call_bonus as f64;
    }

    let combo = (combo + 1).min(tuning.max_combo());
    points *= tuning.combo_multiplier(combo);

    CrackScore {
        points: points.floor() as u64,
        combo,
        speed_bonus,
        close_call,
    }
}

/// Rewards for the clear that brought the total to `puzzles_cleared`.
///
/// Each reward is its own modulus check, so one clear can unlock several.
pub fn progression(tuning: &Tuning, puzzles_cleared: u32) -> Progression {
    let r = &tuning.rewards;
    let hits =
        |every: u32| every > 0 && puzzles_cleared > 0 && puzzles_cleared.is_multiple_of(every);
    Progression {
        level_up: hits(r.level_up_every),
        reveal: hits(r.reveal_every),
        freeze: hits(r.freeze_every),
        nuke: hits(r.nuke_every),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_crack() {
        let tuning = Tuning::default();
        // Four guesses on a two-peg code, first in a streak
        let score = score_crack(&tuning, 2, 4, 0.3, 0);
        assert_eq!(score.combo, 1);
        assert!(!score.speed_bonus);
        assert!(!score.close_call);
        assert_eq!(score.points, 300); // 200 * 1.5
    }

    #[test]
    fn test_speed_and_close_call_order() {
        let tuning = Tuning::default();
        // (300 * 1.5 + 200) * 2 = 1300
        let score = score_crack(&tuning, 3, 2, 0.85, 1);
        assert!(score.speed_bonus);
        assert!(score.close_call);
        assert_eq!(score.combo, 2);
        assert_eq!(score.points, 1300);
    }

    #[test]
    fn test_close_call_is_strict() {
        let tuning = Tuning::default();
        assert!(!score_crack(&tuning, 2, 5, 0.8, 0).close_call);
        assert!(score_crack(&tuning, 2, 5, 0.8001, 0).close_call);
    }

    #[test]
    fn test_points_are_floored() {
        let tuning = Tuning::default();
        // 2 pegs * 100 * 1.5 = 300, combo 1 -> 1.5 => 450
        assert_eq!(score_crack(&tuning, 2, 1, 0.0, 0).points, 450);
        // 5 pegs, no bonus: 500 * 2.5 = 1250
        assert_eq!(score_crack(&tuning, 5, 5, 0.0, 2).points, 1250);
        let odd = Tuning {
            speed_bonus: 1.33,
            ..Tuning::default()
        };
        // 100 * 1.33 * 1.5 = 199.5
        assert_eq!(score_crack(&odd, 1, 1, 0.0, 0).points, 199);
    }

    #[test]
    fn test_progression_moduli_independent() {
        let tuning = Tuning::default();
        let p21 = progression(&tuning, 21);
        assert!(p21.reveal && p21.freeze);
        assert!(!p21.level_up && !p21.nuke);

        let p30 = progression(&tuning, 30);
        assert_eq!(
            p30,
            Progression {
                level_up: true,
                reveal: true,
                freeze: false,
                nuke: true
            }
        );
        assert_eq!(progression(&tuning, 1), Progression::default());
        assert_eq!(progression(&tuning, 0), Progression::default());
    }

    proptest! {
        #[test]
        fn prop_combo_never_exceeds_table(start in 0usize..20, cracks in 1usize..40) {
            let tuning = Tuning::default();
            let mut combo = start.min(tuning.max_combo());
            for _ in 0..cracks {
                combo = score_crack(&tuning, 3, 4, 0.5, combo).combo;
                prop_assert!(combo <= 6);
            }
        }

        #[test]
        fn prop_crack_always_scores(len in 1usize..=5, guesses in 0usize..=6, progress in 0.0f64..=1.0, combo in 0usize..=6) {
            let tuning = Tuning::default();
            let score = score_crack(&tuning, len, guesses, progress, combo);
            prop_assert!(score.points >= len as u64 * 100);
        }
    }
}
