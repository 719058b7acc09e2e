//! Visual effects: a fixed particle pool and screen shake
//!
//! Nothing here affects gameplay. Emissions that find no free particle are
//! dropped; the pool never grows.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::color::{Color, colors};
use crate::consts::PARTICLE_GRAVITY;
use crate::lerp;

/// Combo effect: number of waves and particles per wave
const COMBO_WAVES: u32 = 5;
const COMBO_WAVE_SIZE: usize = 3;
/// Seconds between combo waves
const COMBO_WAVE_INTERVAL: f32 = 0.1;
/// Pending combo effects kept at once; extras are dropped
const MAX_PENDING_WAVES: usize = 8;

/// A single particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds since emission
    pub age: f32,
    pub max_lifetime: f32,
    pub start_color: Color,
    pub end_color: Color,
    pub start_radius: f32,
    pub end_radius: f32,
    /// Interpolated values for drawing
    pub color: Color,
    pub radius: f32,
    pub active: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            age: 0.0,
            max_lifetime: 1.0,
            start_color: Color::rgb(255, 255, 255),
            end_color: Color::rgba(255, 255, 255, 0),
            start_radius: 5.0,
            end_radius: 0.0,
            color: Color::rgb(255, 255, 255),
            radius: 5.0,
            active: false,
        }
    }
}

impl Particle {
    /// Age, move and interpolate. Deactivates once the lifetime is used up.
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }

        self.age += dt;
        if self.age >= self.max_lifetime {
            self.active = false;
            return;
        }

        self.pos += self.vel * dt;
        self.vel.y += PARTICLE_GRAVITY * dt;

        let t = self.age / self.max_lifetime;
        self.radius = lerp(self.start_radius, self.end_radius, t);
        let mut color = self.start_color.lerp(self.end_color, t);
        color.a = (255.0 * (1.0 - t)) as u8;
        self.color = color;
    }
}

/// Shape of a single emission
#[derive(Debug, Clone, Copy)]
struct Emission {
    color: Color,
    speed: f32,
    /// Added to every particle's initial velocity
    bias: Vec2,
    /// Overrides the randomized start radius
    radius: Option<f32>,
    /// Overrides the randomized lifetime
    lifetime: Option<f32>,
}

impl Emission {
    fn burst(color: Color, speed: f32) -> Self {
        Self {
            color,
            speed,
            bias: Vec2::new(0.0, -100.0),
            radius: None,
            lifetime: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingWave {
    pos: Vec2,
    remaining: u32,
    timer: f32,
}

/// Fixed-size particle pool
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    pending_waves: Vec<PendingWave>,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(pool_size: usize, seed: u64) -> Self {
        log::debug!("ParticleSystem created with {} particles", pool_size);
        Self {
            particles: vec![Particle::default(); pool_size],
            pending_waves: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Activate up to `count` idle particles around `pos`. Returns how many were emitted.
    pub fn emit_burst(&mut self, pos: Vec2, count: usize, color: Color, speed: f32) -> usize {
        self.emit(pos, count, Emission::burst(color, speed))
    }

    /// Large burst in the clicked enemy's colour
    pub fn emit_click_effect(&mut self, pos: Vec2, enemy_color: Color) -> usize {
        self.emit_burst(pos, 20, enemy_color.with_alpha(255), 200.0)
    }

    /// Small muted-red burst that drifts down
    pub fn emit_miss_effect(&mut self, pos: Vec2) -> usize {
        let emission = Emission {
            bias: Vec2::new(0.0, 80.0),
            ..Emission::burst(colors::MISS, 100.0)
        };
        self.emit(pos, 10, emission)
    }

    /// Gold sparkles in waves; the first wave fires now, the rest follow in `update`
    pub fn emit_combo_effect(&mut self, pos: Vec2) -> usize {
        let emitted = self.emit_combo_wave(pos);
        if self.pending_waves.len() < MAX_PENDING_WAVES {
            self.pending_waves.push(PendingWave {
                pos,
                remaining: COMBO_WAVES - 1,
                timer: COMBO_WAVE_INTERVAL,
            });
        }
        emitted
    }

    pub fn update(&mut self, dt: f32) {
        let mut due = Vec::new();
        for wave in &mut self.pending_waves {
            wave.timer -= dt;
            while wave.timer <= 0.0 && wave.remaining > 0 {
                due.push(wave.pos);
                wave.remaining -= 1;
                wave.timer += COMBO_WAVE_INTERVAL;
            }
        }
        self.pending_waves.retain(|w| w.remaining > 0);
        for pos in due {
            self.emit_combo_wave(pos);
        }

        for particle in self.particles.iter_mut().filter(|p| p.active) {
            particle.update(dt);
        }
    }

    /// Deactivate everything, including queued combo waves
    pub fn clear(&mut self) {
        for particle in &mut self.particles {
            particle.active = false;
        }
        self.pending_waves.clear();
    }

    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn pending_wave_count(&self) -> usize {
        self.pending_waves.len()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.active)
    }

    fn emit_combo_wave(&mut self, pos: Vec2) -> usize {
        let emission = Emission {
            radius: Some(8.0),
            lifetime: Some(1.5),
            ..Emission::burst(colors::COMBO_GOLD, 150.0)
        };
        self.emit(pos, COMBO_WAVE_SIZE, emission)
    }

    fn emit(&mut self, pos: Vec2, count: usize, emission: Emission) -> usize {
        let mut emitted = 0;
        for particle in self.particles.iter_mut() {
            if emitted >= count {
                break;
            }
            if particle.active {
                continue;
            }

            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let magnitude = emission.speed + self.rng.random_range(0.0..100.0);
            let lifetime = emission
                .lifetime
                .unwrap_or_else(|| 0.5 + self.rng.random_range(0..100) as f32 / 200.0);
            let radius = emission
                .radius
                .unwrap_or_else(|| 3.0 + self.rng.random_range(0..5) as f32);

            *particle = Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * magnitude + emission.bias,
                age: 0.0,
                max_lifetime: lifetime,
                start_color: emission.color,
                end_color: emission.color.with_alpha(0),
                start_radius: radius,
                end_radius: 0.5,
                color: emission.color,
                radius,
                active: true,
            };
            emitted += 1;
        }

        if emitted < count {
            log::trace!("Particle pool exhausted: emitted {} of {}", emitted, count);
        }
        emitted
    }
}

/// Decaying random camera offset
#[derive(Debug, Clone, Default)]
pub struct ScreenShake {
    duration: f32,
    intensity: f32,
    timer: f32,
    active: bool,
}

impl ScreenShake {
    pub fn start(&mut self, duration: f32, intensity: f32) {
        if duration <= 0.0 {
            return;
        }
        self.duration = duration;
        self.intensity = intensity;
        self.timer = 0.0;
        self.active = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.timer += dt;
        if self.timer >= self.duration {
            self.active = false;
        }
    }

    /// Random offset within the current (linearly decaying) intensity
    pub fn offset<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        if !self.active {
            return Vec2::ZERO;
        }
        let current = self.intensity * (1.0 - self.timer / self.duration);
        Vec2::new(
            rng.random_range(-1.0..=1.0) * current,
            rng.random_range(-1.0..=1.0) * current,
        )
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stop(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_activates_requested_count() {
        let mut ps = ParticleSystem::new(50, 1);
        assert_eq!(ps.emit_burst(Vec2::new(10.0, 10.0), 12, Color::rgb(1, 2, 3), 100.0), 12);
        assert_eq!(ps.active_count(), 12);
        for p in ps.iter_active() {
            assert_eq!(p.pos, Vec2::new(10.0, 10.0));
            assert!((0.5..1.0).contains(&p.max_lifetime));
            assert!((3.0..=7.0).contains(&p.start_radius));
            assert_eq!(p.end_color.a, 0);
        }
    }

    #[test]
    fn test_exhaustion_drops_silently() {
        let mut ps = ParticleSystem::new(15, 1);
        assert_eq!(ps.emit_click_effect(Vec2::ZERO, Color::rgb(0, 255, 0)), 15);
        assert_eq!(ps.emit_miss_effect(Vec2::ZERO), 0);
        assert_eq!(ps.capacity(), 15);
    }

    #[test]
    fn test_particles_retire_after_lifetime() {
        let mut ps = ParticleSystem::new(30, 3);
        ps.emit_click_effect(Vec2::ZERO, Color::rgb(255, 0, 0));
        ps.update(0.4);
        assert_eq!(ps.active_count(), 20);
        ps.update(0.6);
        assert_eq!(ps.active_count(), 0);

        // retired particles are reusable
        assert_eq!(ps.emit_click_effect(Vec2::ZERO, Color::rgb(255, 0, 0)), 20);
    }

    #[test]
    fn test_update_interpolates_and_applies_gravity() {
        let mut p = Particle {
            vel: Vec2::new(0.0, 0.0),
            max_lifetime: 1.0,
            start_radius: 4.0,
            end_radius: 0.0,
            start_color: Color::rgb(200, 0, 0),
            end_color: Color::rgba(200, 0, 0, 0),
            active: true,
            ..Particle::default()
        };
        p.update(0.5);
        assert!(p.active);
        assert_eq!(p.radius, 2.0);
        assert_eq!(p.color.a, 127);
        assert_eq!(p.vel.y, PARTICLE_GRAVITY * 0.5);
    }

    #[test]
    fn test_miss_effect_leans_down() {
        let mut ps = ParticleSystem::new(200, 9);
        ps.emit_miss_effect(Vec2::ZERO);
        let mean_vy: f32 = ps.iter_active().map(|p| p.vel.y).sum::<f32>() / 10.0;
        let mut click = ParticleSystem::new(200, 9);
        click.emit_burst(Vec2::ZERO, 10, colors::MISS, 100.0);
        let click_mean: f32 = click.iter_active().map(|p| p.vel.y).sum::<f32>() / 10.0;
        assert!(mean_vy > click_mean);
    }

    #[test]
    fn test_combo_effect_arrives_in_waves() {
        let mut ps = ParticleSystem::new(200, 5);
        assert_eq!(ps.emit_combo_effect(Vec2::new(50.0, 50.0)), 3);
        assert_eq!(ps.pending_wave_count(), 1);
        for p in ps.iter_active() {
            assert_eq!(p.start_radius, 8.0);
            assert_eq!(p.max_lifetime, 1.5);
            assert_eq!(p.start_color, colors::COMBO_GOLD);
        }

        for _ in 0..4 {
            ps.update(0.1);
        }
        assert_eq!(ps.active_count(), 15);
        assert_eq!(ps.pending_wave_count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut ps = ParticleSystem::new(20, 5);
        ps.emit_combo_effect(Vec2::ZERO);
        ps.clear();
        assert_eq!(ps.active_count(), 0);
        assert_eq!(ps.pending_wave_count(), 0);
    }

    #[test]
    fn test_screen_shake_decays_and_stops() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut shake = ScreenShake::default();
        assert_eq!(shake.offset(&mut rng), Vec2::ZERO);

        shake.start(0.2, 10.0);
        assert!(shake.is_active());
        let o = shake.offset(&mut rng);
        assert!(o.x.abs() <= 10.0 && o.y.abs() <= 10.0);

        shake.update(0.25);
        assert!(!shake.is_active());
        assert_eq!(shake.offset(&mut rng), Vec2::ZERO);
    }
}
