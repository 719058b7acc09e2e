//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod enemy;
pub mod particles;
pub mod state;
pub mod tick;

pub use enemy::{Enemy, EnemyFactory, EnemyKind, EnemyProfile};
pub use particles::{Particle, ParticleSystem, ScreenShake};
pub use state::{GameEvent, PlayConfig, PlayState, SoundCue};
pub use tick::{TickInput, TickOutcome, tick};
