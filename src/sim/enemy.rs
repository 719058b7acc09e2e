//! Enemy variants, stat profiles and the factory that builds them

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::{Color, colors};
use crate::consts::*;
use crate::Aabb;

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Standard enemy
    #[default]
    Common,
    /// Quick, wiggles sideways
    Fast,
    /// Slow, costs more health if missed
    Tank,
    /// Harmless if missed, high points, expires on its own
    Bonus,
}

/// Fixed per-variant stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    /// Fall speed (pixels/s)
    pub speed: f32,
    pub points: u32,
    /// Health lost when the enemy reaches the bottom
    pub health_penalty: i32,
    pub color: Color,
    pub scale: f32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [EnemyKind::Common, EnemyKind::Fast, EnemyKind::Tank, EnemyKind::Bonus];

    pub const fn profile(self) -> EnemyProfile {
        match self {
            EnemyKind::Common => EnemyProfile {
                speed: 200.0,
                points: 1,
                health_penalty: 1,
                color: colors::COMMON,
                scale: 0.5,
            },
            EnemyKind::Fast => EnemyProfile {
                speed: 350.0,
                points: 2,
                health_penalty: 1,
                color: colors::FAST,
                scale: 0.4,
            },
            EnemyKind::Tank => EnemyProfile {
                speed: 120.0,
                points: 3,
                health_penalty: 2,
                color: colors::TANK,
                scale: 0.7,
            },
            EnemyKind::Bonus => EnemyProfile {
                speed: 250.0,
                points: 5,
                health_penalty: 0,
                color: colors::BONUS,
                scale: 0.45,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Common => "common",
            EnemyKind::Fast => "fast",
            EnemyKind::Tank => "tank",
            EnemyKind::Bonus => "bonus",
        }
    }

    /// Map a roll in `0..100` onto the spawn distribution (50/25/20/5)
    pub fn from_roll(roll: u32) -> Self {
        match roll {
            0..50 => EnemyKind::Common,
            50..75 => EnemyKind::Fast,
            75..95 => EnemyKind::Tank,
            _ => EnemyKind::Bonus,
        }
    }
}

/// A falling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    pub speed: f32,
    pub points: u32,
    pub health_penalty: i32,
    pub color: Color,
    pub scale: f32,
    pub active: bool,
    /// Seconds since spawn
    pub lifetime: f32,
}

impl Default for Enemy {
    fn default() -> Self {
        let mut enemy = EnemyFactory::create(EnemyKind::Common, Vec2::ZERO);
        enemy.active = false;
        enemy
    }
}

impl Enemy {
    /// Current box; derived from position and scale on every call
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, Vec2::splat(ENEMY_BASE_SIZE * self.scale))
    }

    /// Fall, then apply the variant's own behaviour
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }

        self.pos.y += self.speed * dt;

        match self.kind {
            EnemyKind::Common | EnemyKind::Tank => {}
            EnemyKind::Fast => {
                self.pos.x += fast_wiggle(self.pos.y, dt);
            }
            EnemyKind::Bonus => {
                self.lifetime += dt;
                self.scale = 0.5 + 0.2 * (self.lifetime * 10.0).sin();

                let fade_start = BONUS_MAX_LIFETIME * BONUS_FADE_START;
                if self.lifetime > fade_start {
                    let t = (self.lifetime - fade_start) / (BONUS_MAX_LIFETIME - fade_start);
                    self.color.a = (255.0 * (1.0 - t)).clamp(0.0, 255.0) as u8;
                }

                if self.lifetime > BONUS_MAX_LIFETIME {
                    self.active = false;
                }
            }
        }
    }

    pub fn is_clicked(&self, point: Vec2) -> bool {
        self.bounds().contains(point)
    }

    pub fn is_off_screen(&self, screen_height: f32) -> bool {
        self.pos.y > screen_height
    }
}

/// Lateral offset for fast enemies; depends only on vertical position
#[inline]
pub fn fast_wiggle(y: f32, dt: f32) -> f32 {
    (y * 0.01).sin() * 50.0 * dt
}

/// Builds enemies from the fixed profile table
pub struct EnemyFactory;

impl EnemyFactory {
    pub fn create(kind: EnemyKind, pos: Vec2) -> Enemy {
        let profile = kind.profile();
        Enemy {
            kind,
            pos,
            speed: profile.speed,
            points: profile.points,
            health_penalty: profile.health_penalty,
            color: profile.color,
            scale: profile.scale,
            active: true,
            lifetime: 0.0,
        }
    }

    pub fn create_random<R: Rng + ?Sized>(rng: &mut R, pos: Vec2) -> Enemy {
        let kind = EnemyKind::from_roll(rng.random_range(0..100));
        Self::create(kind, pos)
    }
}
