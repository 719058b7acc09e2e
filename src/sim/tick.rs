//! Per-frame simulation step
//!
//! Order within a tick: spawn, move and cull, resolve a click, check for game over.

use glam::Vec2;

use super::state::{GameEvent, PlayState};
use crate::consts::HIT_HEAL;
use crate::score::ScoreTracker;
use crate::settings::SpawnCadence;

/// Screen shake applied when an enemy gets past
const MISS_SHAKE_DURATION: f32 = 0.2;
const MISS_SHAKE_INTENSITY: f32 = 6.0;

/// Pointer input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Pointer position in world coordinates
    pub pointer: Vec2,
    /// Primary button currently held
    pub pointer_down: bool,
}

impl TickInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn press(pointer: Vec2) -> Self {
        Self {
            pointer,
            pointer_down: true,
        }
    }
}

/// Values the host needs after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub health: i32,
    pub score: u64,
    pub game_over: bool,
}

/// Advance the play state by `dt` seconds
pub fn tick(state: &mut PlayState, score: &mut ScoreTracker, input: &TickInput, dt: f32) -> TickOutcome {
    if state.game_over {
        return outcome(state, score);
    }
    let dt = dt.max(0.0);
    state.time_ticks += 1;

    update_spawning(state, dt);
    update_enemies(state, score, dt);
    resolve_click(state, score, input);

    state.particles.update(dt);
    state.update_camera(dt);

    if !state.announced_high_score && score.stored_high_score() > 0 && score.surpassed_high_score() {
        state.announced_high_score = true;
        state.events.push(GameEvent::NewHighScore { score: score.current() });
        log::info!("New high score in progress: {}", score.current());
    }

    if state.health <= 0 {
        state.game_over = true;
        state.events.push(GameEvent::GameOver { score: score.current() });
        log::info!("Game over: score {} after {} ticks", score.current(), state.time_ticks);
    }

    outcome(state, score)
}

fn outcome(state: &PlayState, score: &ScoreTracker) -> TickOutcome {
    TickOutcome {
        health: state.health,
        score: score.current(),
        game_over: state.game_over,
    }
}

/// Spawn one enemy when the timer is due and there is room; otherwise accrue
fn update_spawning(state: &mut PlayState, dt: f32) {
    if state.live.len() >= state.config.max_enemies {
        return;
    }

    if state.spawn_timer >= state.config.spawn_interval {
        // An exhausted pool just means no spawn this tick
        state.spawn_random_enemy();
        state.spawn_timer = 0.0;
    } else {
        state.spawn_timer += match state.config.spawn_cadence {
            SpawnCadence::Seconds => dt,
            SpawnCadence::Ticks => 1.0,
        };
    }
}

/// Move every live enemy, retiring expired ones and penalizing those that got past
fn update_enemies(state: &mut PlayState, score: &mut ScoreTracker, dt: f32) {
    let height = state.config.height;
    let mut i = 0;
    while i < state.live.len() {
        let handle = state.live[i];
        let Some(enemy) = state.enemies.get_mut(handle) else {
            // Not reachable through the pool; drop the dangling handle
            state.live.remove(i);
            continue;
        };
        enemy.update(dt);

        if !enemy.active {
            state.despawn(i);
            state.events.push(GameEvent::BonusExpired);
            continue;
        }

        if enemy.is_off_screen(height) {
            let kind = enemy.kind;
            let penalty = enemy.health_penalty;
            let miss_at = Vec2::new(enemy.bounds().center().x, height);

            state.despawn(i);
            state.health -= penalty;
            score.break_combo();
            state.particles.emit_miss_effect(miss_at);
            if state.config.screen_shake {
                state.shake.start(MISS_SHAKE_DURATION, MISS_SHAKE_INTENSITY);
            }
            state.events.push(GameEvent::EnemyMissed { kind, penalty });
            log::debug!("Missed {} enemy, health {}", kind.as_str(), state.health);
            continue;
        }

        i += 1;
    }
}

/// Edge-triggered: only the not-pressed → pressed transition can score a hit
fn resolve_click(state: &mut PlayState, score: &mut ScoreTracker, input: &TickInput) {
    let pressed_now = input.pointer_down && !state.pointer_held;
    state.pointer_held = input.pointer_down;
    if !pressed_now {
        return;
    }

    // First match in spawn order wins
    let hit = state.live.iter().enumerate().find_map(|(i, &h)| {
        state
            .enemies
            .get(h)
            .filter(|e| e.is_clicked(input.pointer))
            .map(|e| (i, e.kind, e.points, e.color))
    });
    let Some((index, kind, base_points, color)) = hit else {
        return;
    };

    state.despawn(index);
    let points = score.add_points(base_points);
    state.health += HIT_HEAL;
    state.particles.emit_click_effect(input.pointer, color);
    state.events.push(GameEvent::EnemyHit {
        kind,
        points,
        pos: input.pointer,
    });

    if score.at_combo_milestone() {
        state.particles.emit_combo_effect(input.pointer);
        state.events.push(GameEvent::ComboMilestone { streak: score.streak() });
    }
    log::debug!("Hit {} enemy for {} points", kind.as_str(), points);
}
