//! Per-scene draw routines and HUD text

use glam::Vec2;

use super::Surface;
use crate::Aabb;
use crate::color::{Color, colors};
use crate::score::ScoreTracker;
use crate::session::GameOverSummary;
use crate::sim::PlayState;

const HUD_SIZE: u32 = 24;
const TITLE_SIZE: u32 = 64;
const HEADING_SIZE: u32 = 40;
const LINE_HEIGHT: f32 = 32.0;
const MARGIN: f32 = 10.0;

/// Dim layer drawn over a frozen match
const PAUSE_OVERLAY: Color = Color::rgba(0, 0, 0, 160);

pub fn health_line(health: i32, points: u64) -> String {
    format!("Health: {health} | Points: {points}")
}

/// Empty below the combo threshold
pub fn combo_line(score: &ScoreTracker) -> String {
    score.combo_label()
}

fn background<S: Surface + ?Sized>(size: Vec2, surface: &mut S) {
    surface.fill_rect(Aabb::from_pos_size(Vec2::ZERO, size), colors::BACKGROUND);
}

/// Rough horizontal centring for a monospace-ish font
fn centered(text: &str, size: u32, width: f32, y: f32) -> Vec2 {
    let approx = text.chars().count() as f32 * size as f32 * 0.5;
    Vec2::new(((width - approx) * 0.5).max(0.0), y)
}

/// Live match: enemies, particles, then HUD. World drawing is offset by the shake.
pub fn render_play<S: Surface + ?Sized>(state: &PlayState, score: &ScoreTracker, surface: &mut S) {
    let screen = Vec2::new(state.config.width, state.config.height);
    background(screen, surface);

    let offset = state.camera_offset;
    for enemy in state.enemies() {
        surface.fill_rect(enemy.bounds().translated(offset), enemy.color);
    }
    for particle in state.particles.iter_active() {
        surface.fill_circle(particle.pos + offset, particle.radius, particle.color);
    }

    let mut y = MARGIN;
    surface.draw_text(
        &health_line(state.health, score.current()),
        Vec2::new(MARGIN, y),
        HUD_SIZE,
        colors::HUD_TEXT,
    );
    y += LINE_HEIGHT;

    let combo = combo_line(score);
    if !combo.is_empty() {
        surface.draw_text(&combo, Vec2::new(MARGIN, y), HUD_SIZE, colors::COMBO_GOLD);
        y += LINE_HEIGHT;
    }

    let best_color = if score.surpassed_high_score() {
        colors::COMBO_GOLD
    } else {
        colors::HUD_TEXT
    };
    surface.draw_text(
        &format!("High Score: {}", score.high_score()),
        Vec2::new(MARGIN, y),
        HUD_SIZE,
        best_color,
    );
}

/// Frozen match under a dim layer
pub fn render_paused<S: Surface + ?Sized>(state: &PlayState, score: &ScoreTracker, surface: &mut S) {
    render_play(state, score, surface);

    let width = state.config.width;
    let screen = Vec2::new(width, state.config.height);
    surface.fill_rect(Aabb::from_pos_size(Vec2::ZERO, screen), PAUSE_OVERLAY);

    let y = screen.y * 0.4;
    surface.draw_text("PAUSED", centered("PAUSED", HEADING_SIZE, width, y), HEADING_SIZE, colors::TITLE_TEXT);
    let hint = "Esc: resume | Q: quit";
    surface.draw_text(hint, centered(hint, HUD_SIZE, width, y + 60.0), HUD_SIZE, colors::HUD_TEXT);
}

/// Title, prompt and the leaderboard
pub fn render_menu<S: Surface + ?Sized>(screen: Vec2, score: &ScoreTracker, surface: &mut S) {
    background(screen, surface);
    let width = screen.x;

    let title = "FALLING FURY";
    surface.draw_text(title, centered(title, TITLE_SIZE, width, 120.0), TITLE_SIZE, colors::TITLE_TEXT);
    let prompt = "Press Enter to start";
    surface.draw_text(prompt, centered(prompt, HUD_SIZE, width, 220.0), HUD_SIZE, colors::HUD_TEXT);
    let best = format!("High Score: {}", score.high_score());
    surface.draw_text(&best, centered(&best, HUD_SIZE, width, 260.0), HUD_SIZE, colors::COMBO_GOLD);

    let board = score.leaderboard();
    let mut y = 340.0;
    if board.is_empty() {
        let empty = "No scores yet";
        surface.draw_text(empty, centered(empty, HUD_SIZE, width, y), HUD_SIZE, colors::HUD_TEXT);
        return;
    }
    for (i, entry) in board.entries().iter().enumerate() {
        let line = format!("{:>2}. {:<12} {:>8}  {}", i + 1, entry.name, entry.score, entry.date);
        surface.draw_text(&line, centered(&line, HUD_SIZE, width, y), HUD_SIZE, colors::HUD_TEXT);
        y += LINE_HEIGHT;
    }
}

/// Final score, high score banner and leaderboard placement
pub fn render_game_over<S: Surface + ?Sized>(screen: Vec2, summary: &GameOverSummary, surface: &mut S) {
    background(screen, surface);
    let width = screen.x;
    let mut y = screen.y * 0.3;

    surface.draw_text("GAME OVER", centered("GAME OVER", TITLE_SIZE, width, y), TITLE_SIZE, colors::WARNING_TEXT);
    y += 100.0;

    let final_score = format!("Final Score: {}", summary.score);
    surface.draw_text(&final_score, centered(&final_score, HEADING_SIZE, width, y), HEADING_SIZE, colors::TITLE_TEXT);
    y += 60.0;

    if summary.new_high_score {
        let banner = "NEW HIGH SCORE!";
        surface.draw_text(banner, centered(banner, HEADING_SIZE, width, y), HEADING_SIZE, colors::COMBO_GOLD);
        y += 60.0;
    }
    if let Some(rank) = summary.rank {
        let placed = format!("Leaderboard rank #{rank}");
        surface.draw_text(&placed, centered(&placed, HUD_SIZE, width, y), HUD_SIZE, colors::HUD_TEXT);
        y += LINE_HEIGHT;
    }

    let prompt = "Press Enter for menu";
    surface.draw_text(prompt, centered(prompt, HUD_SIZE, width, y + 40.0), HUD_SIZE, colors::HUD_TEXT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use crate::sim::{EnemyKind, PlayConfig};

    fn tracker() -> ScoreTracker {
        ScoreTracker::new(Box::new(MemoryStorage::default()))
    }

    #[test]
    fn test_hud_text() {
        assert_eq!(health_line(10, 42), "Health: 10 | Points: 42");
    }

    #[test]
    fn test_play_draws_enemies_and_hud() {
        let mut state = PlayState::new(PlayConfig::default(), 3);
        state.spawn_enemy(EnemyKind::Tank, 40.0);
        state.spawn_enemy(EnemyKind::Common, 400.0);
        let score = tracker();
        let mut surface = RecordingSurface::new();

        render_play(&state, &score, &mut surface);

        // background + two enemies
        assert_eq!(surface.rect_count(), 3);
        assert!(surface.contains_text("Health: 10 | Points: 0"));
        assert!(surface.contains_text("High Score: 0"));
        assert!(!surface.contains_text("COMBO"));
        assert!(matches!(
            surface.commands[1],
            DrawCommand::Rect { rect, .. } if rect.min == Vec2::new(40.0, 0.0)
        ));
    }

    #[test]
    fn test_play_shows_combo_label() {
        let state = PlayState::new(PlayConfig::default(), 3);
        let mut score = tracker();
        for _ in 0..5 {
            score.add_points(1);
        }
        let mut surface = RecordingSurface::new();
        render_play(&state, &score, &mut surface);
        assert!(surface.contains_text("COMBO x2"));
    }

    #[test]
    fn test_camera_offset_moves_world_only() {
        let mut state = PlayState::new(PlayConfig::default(), 3);
        state.spawn_enemy(EnemyKind::Common, 100.0);
        state.camera_offset = Vec2::new(5.0, -3.0);
        let mut surface = RecordingSurface::new();
        render_play(&state, &tracker(), &mut surface);

        assert!(matches!(
            surface.commands[1],
            DrawCommand::Rect { rect, .. } if rect.min == Vec2::new(105.0, -3.0)
        ));
        assert!(matches!(
            &surface.commands[2],
            DrawCommand::Text { pos, .. } if *pos == Vec2::new(MARGIN, MARGIN)
        ));
    }

    #[test]
    fn test_game_over_banner() {
        let mut surface = RecordingSurface::new();
        let summary = GameOverSummary {
            score: 77,
            new_high_score: true,
            rank: Some(1),
        };
        render_game_over(Vec2::splat(1000.0), &summary, &mut surface);
        assert!(surface.contains_text("Final Score: 77"));
        assert!(surface.contains_text("NEW HIGH SCORE!"));
        assert!(surface.contains_text("#1"));

        surface.clear();
        let summary = GameOverSummary {
            score: 3,
            new_high_score: false,
            rank: None,
        };
        render_game_over(Vec2::splat(1000.0), &summary, &mut surface);
        assert!(!surface.contains_text("NEW HIGH SCORE!"));
        assert!(!surface.contains_text("rank"));
    }

    #[test]
    fn test_menu_lists_leaderboard() {
        let mut score = tracker();
        score.add_to_leaderboard("ann", 40, "2024-03-03").unwrap();
        let mut surface = RecordingSurface::new();
        render_menu(Vec2::splat(1000.0), &score, &mut surface);
        assert!(surface.contains_text("FALLING FURY"));
        assert!(surface.texts().iter().any(|t| t.contains("ann") && t.contains("40")));
    }
}
