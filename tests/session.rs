//! Full runs through the public session API

use code_cascade::sim::{Cue, GuessOutcome, PowerupKind, Puzzle, Screen, Session};
use code_cascade::{ActionError, HighScoreEntry, HighScores, ScoreStore, Tuning};

/// Replace the board with one known code
fn plant(session: &mut Session, secret: Vec<u8>, now: u64) -> u32 {
    let config = session.level_config();
    let id = session.next_entity_id();
    session.puzzles = vec![Puzzle::with_secret(id, secret, &config, now)];
    session.selected_index = 0;
    id
}

fn guess(session: &mut Session, colors: &[u8], now: u64) -> GuessOutcome {
    session.clear_draft().unwrap();
    for &c in colors {
        session.add_color_to_draft(c).unwrap();
    }
    session.submit_guess(now).unwrap()
}

#[test]
fn combo_builds_and_resets_on_explosion() {
    let mut session = Session::new(Tuning::default(), 7);
    session.start_game(0);
    let mut now = 0;

    for expected_combo in 1..=8usize {
        now += 1_000;
        plant(&mut session, vec![0, 1], now);
        let GuessOutcome::Cracked(score) = guess(&mut session, &[0, 1], now) else {
            panic!("expected crack");
        };
        assert_eq!(score.combo, expected_combo.min(6));
        session.update(now + 300);
        assert!(session.puzzles.is_empty() || !session.puzzles[0].is_cracking());
    }
    assert_eq!(session.combo, 6);
    // Cracks 5 advanced the level
    assert_eq!(session.level, 2);

    now += 1_000;
    plant(&mut session, vec![0, 1, 2], now);
    for _ in 0..6 {
        now += 10;
        guess(&mut session, &[3, 3, 3], now);
    }
    assert_eq!(session.combo, 0);
}

#[test]
fn full_game_to_leaderboard() {
    let mut session = Session::new(Tuning::default(), 21);
    let mut scores = HighScores::new();
    session.start_game(1_000);

    // Crack one code, then let everything fall
    plant(&mut session, vec![2, 2], 1_000);
    guess(&mut session, &[2, 2], 2_000);
    let score = session.score;
    assert_eq!(score, 450);

    let mut now = 2_000;
    while session.screen == Screen::Game {
        now += 16;
        session.update(now);
    }
    assert_eq!(session.screen, Screen::Explosion);
    while session.screen == Screen::Explosion {
        now += 16;
        session.update(now);
    }
    assert_eq!(session.screen, Screen::GameOver);

    let result = session.final_result.expect("final result after game over");
    assert_eq!(result.score, score);
    let rank = scores.record_score(HighScoreEntry::from_result(&result, "2026-10-19"));
    assert_eq!(rank, Some(1));
    assert_eq!(scores.top_scores(5)[0].score, 450);

    let cues = session.drain_cues();
    let explosion = cues.iter().position(|c| *c == Cue::Explosion).unwrap();
    let game_over = cues.iter().position(|c| *c == Cue::GameOver).unwrap();
    assert!(explosion < game_over);

    // Intents are refused once the run is over
    assert_eq!(session.add_color_to_draft(0), Err(ActionError::WrongScreen));
    session.back_to_menu().unwrap();
    assert_eq!(session.screen, Screen::Menu);
}

#[test]
fn old_codes_keep_their_own_length_after_level_up() {
    let mut session = Session::new(Tuning::default(), 3);
    session.start_game(0);
    session.level = 3;
    // Code spawned back on level 1 has two pegs
    plant(&mut session, vec![1, 0], 0);
    assert_eq!(session.active_code_length(), 2);
    assert!(matches!(
        guess(&mut session, &[1, 0], 500),
        GuessOutcome::Cracked(_)
    ));
}

#[test]
fn powerups_granted_and_spent() {
    let mut session = Session::new(Tuning::default(), 4);
    session.start_game(0);
    let mut now = 0;
    for _ in 0..10 {
        now += 500;
        plant(&mut session, vec![3, 0], now);
        guess(&mut session, &[3, 0], now);
    }
    // 2 start + clears 3, 6, 9
    assert_eq!(session.powerups.reveal, 5);
    // 1 start + clear 7
    assert_eq!(session.powerups.freeze, 2);
    // clear 10
    assert_eq!(session.powerups.nuke, 1);

    plant(&mut session, vec![1, 2], now);
    session.use_powerup(PowerupKind::Reveal, now).unwrap();
    session.use_powerup(PowerupKind::Reveal, now).unwrap();
    assert_eq!(session.draft.complete(2), Some(vec![1, 2]));
    assert_eq!(session.powerups.reveal, 3);
}
