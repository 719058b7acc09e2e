//! End-to-end flow through the session controller with on-disk persistence

use std::path::PathBuf;

use glam::Vec2;

use falling_fury::persistence::{FileStorage, HIGH_SCORE_FILE, LEADERBOARD_FILE};
use falling_fury::renderer::RecordingSurface;
use falling_fury::session::{InputEvent, Key, SessionController, StateId, Transition};
use falling_fury::sim::{EnemyKind, GameEvent, SoundCue};
use falling_fury::{ScoreTracker, Settings};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("falling-fury-it-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn settings(dir: &PathBuf) -> Settings {
    Settings {
        seed: Some(42),
        player_name: "Tester".to_string(),
        data_dir: dir.clone(),
        // manual spawns only
        max_enemies: 0,
        ..Settings::default()
    }
}

fn session(dir: &PathBuf) -> SessionController {
    let score = ScoreTracker::new(Box::new(FileStorage::new(dir)));
    SessionController::new(settings(dir), score)
}

fn press(session: &mut SessionController, key: Key) {
    if let Some(t) = session.handle_input(InputEvent::KeyPressed(key)) {
        assert!(session.apply(t));
    }
}

fn click(session: &mut SessionController, pos: Vec2) {
    session.handle_input(InputEvent::PointerDown(pos));
    assert_eq!(session.update(1.0 / 60.0), None);
    session.handle_input(InputEvent::PointerUp(pos));
    assert_eq!(session.update(0.0), None);
}

#[test]
fn test_full_session_persists_results() {
    let dir = scratch_dir("full");
    let mut session = session(&dir);
    let mut surface = RecordingSurface::new();

    session.render(&mut surface);
    assert!(surface.contains_text("FALLING FURY"));
    assert!(surface.contains_text("No scores yet"));

    press(&mut session, Key::Enter);
    assert_eq!(session.state_id(), StateId::Playing);

    // Three stacked commons: the third hit reaches the combo threshold
    for _ in 0..3 {
        session.play_state_mut().unwrap().spawn_enemy(EnemyKind::Common, 400.0);
    }
    for _ in 0..3 {
        click(&mut session, Vec2::new(420.0, 20.0));
    }
    assert_eq!(session.score().current(), 3);
    assert_eq!(session.score().streak(), 3);
    assert_eq!(session.play_state().unwrap().health, 13);

    let cues: Vec<SoundCue> = session.drain_events().iter().filter_map(GameEvent::sound_cue).collect();
    assert_eq!(cues, vec![SoundCue::Hit, SoundCue::Hit, SoundCue::Hit, SoundCue::Combo]);

    surface.clear();
    session.render(&mut surface);
    assert!(surface.contains_text("Health: 13 | Points: 3"));
    assert!(surface.contains_text("COMBO x1"));

    press(&mut session, Key::Escape);
    assert_eq!(session.state_id(), StateId::Paused);
    surface.clear();
    session.render(&mut surface);
    assert!(surface.contains_text("PAUSED"));

    press(&mut session, Key::Q);
    assert_eq!(session.state_id(), StateId::GameOver);
    surface.clear();
    session.render(&mut surface);
    assert!(surface.contains_text("Final Score: 3"));
    assert!(surface.contains_text("NEW HIGH SCORE!"));

    assert_eq!(std::fs::read_to_string(dir.join(HIGH_SCORE_FILE)).unwrap(), "3");
    let board = std::fs::read_to_string(dir.join(LEADERBOARD_FILE)).unwrap();
    assert!(board.starts_with("Tester 3 "));

    press(&mut session, Key::Enter);
    assert_eq!(session.state_id(), StateId::Menu);
    session.shutdown();

    // A fresh program run sees the saved results
    let reloaded = self::session(&dir);
    assert_eq!(reloaded.score().high_score(), 3);
    assert_eq!(reloaded.score().leaderboard().len(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_new_record_reaches_disk_before_game_over() {
    let dir = scratch_dir("midgame");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(HIGH_SCORE_FILE), "1").unwrap();

    let mut session = session(&dir);
    press(&mut session, Key::Enter);
    session.play_state_mut().unwrap().spawn_enemy(EnemyKind::Bonus, 100.0);
    click(&mut session, Vec2::new(110.0, 10.0));

    assert_eq!(session.state_id(), StateId::Playing);
    assert_eq!(session.score().current(), 5);
    assert_eq!(std::fs::read_to_string(dir.join(HIGH_SCORE_FILE)).unwrap(), "5");
    assert!(
        session
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::NewHighScore { score: 5 }))
    );

    // The banner still shows even though the record was saved already
    press(&mut session, Key::Q);
    assert!(session.game_over_summary().unwrap().new_high_score);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_missed_enemies_end_the_match() {
    let dir = scratch_dir("misses");
    let mut session = session(&dir);
    press(&mut session, Key::Enter);

    for _ in 0..5 {
        session.play_state_mut().unwrap().spawn_enemy(EnemyKind::Tank, 0.0);
    }
    // 120 px/s needs a bit over 8.3 s to leave a 1000 px screen
    let mut requested = None;
    for _ in 0..600 {
        requested = session.update(1.0 / 60.0);
        if requested.is_some() {
            break;
        }
    }
    assert_eq!(requested, Some(Transition::GameOver));
    assert_eq!(session.play_state().unwrap().health, 0);
    assert_eq!(session.state_id(), StateId::Playing);

    assert!(session.apply(Transition::GameOver));
    let summary = session.game_over_summary().unwrap();
    assert_eq!(summary.score, 0);
    assert!(!summary.new_high_score);
    let _ = std::fs::remove_dir_all(&dir);
}
