// Integration tests (native) for the `mimic-me` crate.
// These tests drive the game the way the detector callbacks do, without a browser.

use mimic_me::detector::DetectionFrame;
use mimic_me::game::{EntropyPicker, ScriptedPicker};
use mimic_me::{Game, GameConfig, Phase, Update};

const RELAXED: &str = "☺"; // 9786
const SCREAM: &str = "😱"; // 128561
const SMILEY: &str = "😃"; // 128515

fn config(max_score: u32) -> GameConfig {
    GameConfig {
        max_score,
        candidate_emojis: vec![9786, 128561, 128515],
        hold_duration_secs: 1.0,
    }
}

/// Game whose first target is ☺, then 😱, then 😃, repeating.
fn started(max_score: u32) -> (Game, ScriptedPicker) {
    let mut game = Game::new(config(max_score)).unwrap();
    let mut picker = ScriptedPicker::new(vec![0, 1, 2]);
    game.init(&mut picker);
    (game, picker)
}

#[test]
fn init_yields_zero_score_and_candidate_target() {
    let mut game = Game::new(config(1)).unwrap();
    let mut picker = EntropyPicker::new();
    for _ in 0..50 {
        let target = game.init(&mut picker);
        assert_eq!(game.score(), 0);
        assert_eq!(game.phase(), Phase::Playing);
        assert!(game.config().candidate_emojis.contains(&target));
        assert_eq!(game.target(), Some(target));
    }
}

#[test]
fn init_may_repeat_the_previous_target() {
    let mut game = Game::new(config(1)).unwrap();
    let mut picker = ScriptedPicker::new(vec![1, 1]);
    let first = game.init(&mut picker);
    let second = game.init(&mut picker);
    assert_eq!(first, second);
}

#[test]
fn holding_past_threshold_scores_once_and_retargets() {
    let (mut game, mut picker) = started(5);
    assert_eq!(game.target(), Some(9786));

    assert_eq!(game.update(RELAXED, 0.0, &mut picker), Update::Holding { held_secs: 0.0 });
    assert_eq!(game.hold_start(), Some(0.0));
    assert_eq!(
        game.update(RELAXED, 1.5, &mut picker),
        Update::Scored { target: 128561, score: 1 }
    );
    assert_eq!(game.score(), 1);
    assert_eq!(game.target(), Some(128561));
    assert_eq!(game.hold_start(), None);
}

#[test]
fn holding_exactly_the_threshold_does_not_score() {
    let (mut game, mut picker) = started(5);
    game.update(RELAXED, 2.0, &mut picker);
    assert_eq!(game.update(RELAXED, 3.0, &mut picker), Update::Holding { held_secs: 1.0 });
    assert_eq!(game.score(), 0);
    assert_eq!(game.target(), Some(9786));
}

#[test]
fn mismatch_resets_the_hold() {
    let (mut game, mut picker) = started(5);
    game.update(RELAXED, 0.0, &mut picker);
    game.update(RELAXED, 0.9, &mut picker);
    assert_eq!(game.update(SMILEY, 1.0, &mut picker), Update::Mismatch);
    assert_eq!(game.hold_start(), None);

    // accumulation restarts from the next match
    assert_eq!(game.update(RELAXED, 1.2, &mut picker), Update::Holding { held_secs: 0.0 });
    assert_eq!(game.update(RELAXED, 2.1, &mut picker), Update::Holding { held_secs: 2.1 - 1.2 });
    assert_eq!(game.score(), 0);
}

#[test]
fn empty_or_garbled_glyph_counts_as_mismatch() {
    let (mut game, mut picker) = started(5);
    game.update(RELAXED, 0.0, &mut picker);
    assert_eq!(game.update("", 0.5, &mut picker), Update::Mismatch);
    assert_eq!(game.hold_start(), None);
    game.update(RELAXED, 0.6, &mut picker);
    assert_eq!(game.update("☺☺", 0.7, &mut picker), Update::Mismatch);
}

#[test]
fn reaching_max_score_wins_once_and_halts_scoring() {
    let (mut game, mut picker) = started(1);
    game.update(RELAXED, 0.0, &mut picker);
    let won = game.update(RELAXED, 1.5, &mut picker);
    assert_eq!(won, Update::Won { target: 128561, score: 1 });
    assert_eq!(game.phase(), Phase::Won);

    // further frames, even matching ones, change nothing
    assert_eq!(game.update(SCREAM, 2.0, &mut picker), Update::Ignored);
    assert_eq!(game.update(SCREAM, 9.0, &mut picker), Update::Ignored);
    assert_eq!(game.score(), 1);

    // reset brings the game back
    game.init(&mut picker);
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.score(), 0);
}

#[test]
fn score_never_decreases_within_a_session() {
    let (mut game, mut picker) = started(10);
    let glyphs = [RELAXED, SCREAM, SMILEY];
    let mut last = 0;
    let mut t = 0.0;
    for step in 0..60 {
        let glyph = glyphs[(step / 4) % glyphs.len()];
        game.update(glyph, t, &mut picker);
        assert!(game.score() >= last);
        last = game.score();
        t += 0.4;
    }
    assert!(last > 0);
}

#[test]
fn frame_driven_round() {
    // what the image-results callback feeds the game
    let json = r#"[{"featurePoints": [{"x": 1, "y": 2}, {"x": 3, "y": 4}],
                    "emojis": {"dominantEmoji": "☺"}}]"#;
    let (mut game, mut picker) = started(1);
    for ts in [0.0, 0.5, 1.01] {
        let frame = DetectionFrame::from_faces_json(json, ts).unwrap();
        let face = frame.first_face().unwrap();
        game.update(&face.emojis.dominant_emoji, frame.timestamp, &mut picker);
    }
    assert_eq!(game.phase(), Phase::Won);
}

#[test]
fn custom_config_from_json_drives_the_game() {
    let cfg = GameConfig::from_json(r#"{"maxScore": 2, "candidateEmojis": [128561], "holdDurationSeconds": 0.25}"#)
        .unwrap();
    let mut game = Game::new(cfg).unwrap();
    let mut picker = EntropyPicker::new();
    assert_eq!(game.init(&mut picker), 128561);
    game.update(SCREAM, 0.0, &mut picker);
    assert_eq!(game.update(SCREAM, 0.3, &mut picker), Update::Scored { target: 128561, score: 1 });
    game.update(SCREAM, 0.4, &mut picker);
    assert_eq!(game.update(SCREAM, 0.7, &mut picker), Update::Won { target: 128561, score: 2 });
}
