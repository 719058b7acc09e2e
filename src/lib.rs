//! Falling Fury - click the falling blocks before they hit the floor
//!
//! Core modules:
//! - `sim`: Gameplay simulation (enemies, spawning, physics, particles)
//! - `pool`: Generic object pool with generation-checked handles
//! - `score`: Score, combo multiplier and high score bookkeeping
//! - `highscores`: Bounded leaderboard
//! - `persistence`: Plain-text save files with atomic rewrites
//! - `session`: Menu/Playing/Paused/GameOver state machine
//! - `renderer`: Draw pass over a host-supplied surface
//! - `resources`: Named asset registry
//! - `settings`: Data-driven configuration

pub mod color;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod pool;
pub mod renderer;
pub mod resources;
pub mod score;
pub mod session;
pub mod settings;
pub mod sim;

pub use color::Color;
pub use error::{PersistError, PoolError, ResourceError, SettingsError};
pub use highscores::{Leaderboard, LeaderboardEntry};
pub use pool::{ObjectPool, PoolHandle, Pooled};
pub use score::ScoreTracker;
pub use settings::{QualityPreset, Settings, SpawnCadence};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (60 Hz, matches the frame cap)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Visible area
    pub const WINDOW_WIDTH: f32 = 1000.0;
    pub const WINDOW_HEIGHT: f32 = 1000.0;

    /// Player
    pub const STARTING_HEALTH: i32 = 10;
    /// Health regained per successful click
    pub const HIT_HEAL: i32 = 1;

    /// Spawning
    pub const MAX_ENEMIES: usize = 30;
    /// Ticks between spawns when counting frames
    pub const SPAWN_INTERVAL_TICKS: f32 = 10.0;
    /// Seconds between spawns when scaling by delta time (10 ticks at 60 Hz)
    pub const SPAWN_INTERVAL_SECS: f32 = SPAWN_INTERVAL_TICKS / 60.0;

    /// Enemy base shape before variant scale
    pub const ENEMY_BASE_SIZE: f32 = 100.0;
    /// Bonus enemies vanish after this many seconds
    pub const BONUS_MAX_LIFETIME: f32 = 5.0;
    /// Fraction of the bonus lifetime after which it starts fading
    pub const BONUS_FADE_START: f32 = 0.7;

    /// Combo scoring
    pub const COMBO_THRESHOLD: u32 = 3;
    pub const BASE_MULTIPLIER: f32 = 1.0;
    pub const MULTIPLIER_INCREMENT: f32 = 0.5;
    /// Hits between combo milestone effects once the threshold is reached
    pub const COMBO_MILESTONE_STEP: u32 = 5;

    /// Leaderboard
    pub const MAX_LEADERBOARD_ENTRIES: usize = 10;

    /// Particles
    pub const DEFAULT_PARTICLE_POOL: usize = 200;
    /// Downward acceleration applied to particles (pixels/s²)
    pub const PARTICLE_GRAVITY: f32 = 300.0;
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Axis-aligned rectangle in world coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Min edge inclusive, max edge exclusive
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_contains_edges() {
        let rect = Aabb::from_pos_size(Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0));
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(59.9, 59.9)));
        assert!(!rect.contains(Vec2::new(60.0, 30.0)));
        assert!(!rect.contains(Vec2::new(9.9, 30.0)));
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(3.0, 1.0, 1.0), 1.0);
    }
}
