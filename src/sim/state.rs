//! Play session state
//!
//! Everything the tick mutates lives here except the score, which is a
//! long-lived service owned by the caller.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::enemy::{Enemy, EnemyFactory, EnemyKind};
use super::particles::{ParticleSystem, ScreenShake};
use crate::consts::ENEMY_BASE_SIZE;
use crate::pool::{ObjectPool, PoolHandle};
use crate::settings::{Settings, SpawnCadence};

/// Stream offsets for the effect RNGs, so visuals never consume gameplay randomness
const PARTICLE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;
const SHAKE_STREAM: u64 = 0xd1b5_4a32_d192_ed03;

/// Gameplay events queued during a tick, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemySpawned { kind: EnemyKind },
    EnemyHit { kind: EnemyKind, points: u64, pos: Vec2 },
    EnemyMissed { kind: EnemyKind, penalty: i32 },
    /// A bonus ran out of lifetime before reaching the floor
    BonusExpired,
    ComboMilestone { streak: u32 },
    /// First tick this session on which the score beat the stored high score
    NewHighScore { score: u64 },
    GameOver { score: u64 },
}

/// Sound a host audio layer should play for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Hit,
    Miss,
    Combo,
    HighScore,
    GameOver,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Hit => "hit",
            SoundCue::Miss => "miss",
            SoundCue::Combo => "combo",
            SoundCue::HighScore => "highscore",
            SoundCue::GameOver => "gameover",
        }
    }
}

impl GameEvent {
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::EnemyHit { .. } => Some(SoundCue::Hit),
            GameEvent::EnemyMissed { .. } => Some(SoundCue::Miss),
            GameEvent::ComboMilestone { .. } => Some(SoundCue::Combo),
            GameEvent::NewHighScore { .. } => Some(SoundCue::HighScore),
            GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
            GameEvent::EnemySpawned { .. } | GameEvent::BonusExpired => None,
        }
    }
}

/// Tunables copied out of [`Settings`] when a session starts
#[derive(Debug, Clone, PartialEq)]
pub struct PlayConfig {
    pub width: f32,
    pub height: f32,
    pub starting_health: i32,
    pub max_enemies: usize,
    pub spawn_cadence: SpawnCadence,
    pub spawn_interval: f32,
    pub enemy_pool_size: usize,
    pub enemy_pool_growth: bool,
    pub particle_pool_size: usize,
    pub screen_shake: bool,
}

impl From<&Settings> for PlayConfig {
    fn from(s: &Settings) -> Self {
        Self {
            width: s.window_width,
            height: s.window_height,
            starting_health: s.starting_health,
            max_enemies: s.max_enemies,
            spawn_cadence: s.spawn_cadence,
            spawn_interval: s.spawn_interval,
            enemy_pool_size: s.enemy_pool_size,
            enemy_pool_growth: s.enemy_pool_growth,
            particle_pool_size: s.max_particles(),
            screen_shake: s.effective_screen_shake(),
        }
    }
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// One match
#[derive(Debug)]
pub struct PlayState {
    pub config: PlayConfig,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) enemies: ObjectPool<Enemy>,
    /// Live enemy handles in spawn order
    pub(crate) live: Vec<PoolHandle>,
    pub health: i32,
    /// Seconds or ticks accrued toward the next spawn
    pub spawn_timer: f32,
    /// Pointer state seen on the previous tick (for edge detection)
    pub pointer_held: bool,
    pub particles: ParticleSystem,
    pub shake: ScreenShake,
    shake_rng: Pcg32,
    /// World-space offset for this frame's draw, sampled from the shake
    pub camera_offset: Vec2,
    pub time_ticks: u64,
    pub game_over: bool,
    /// Whether NewHighScore has fired this session
    pub(crate) announced_high_score: bool,
    pub(crate) events: Vec<GameEvent>,
}

impl PlayState {
    pub fn new(config: PlayConfig, seed: u64) -> Self {
        let enemies = ObjectPool::new(config.enemy_pool_size, Enemy::default, config.enemy_pool_growth)
            .with_reset(|e: &mut Enemy| *e = Enemy::default());
        let particles = ParticleSystem::new(config.particle_pool_size, seed ^ PARTICLE_STREAM);

        Self {
            health: config.starting_health,
            // First spawn happens on the first tick
            spawn_timer: config.spawn_interval,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            enemies,
            live: Vec::with_capacity(config.max_enemies),
            pointer_held: false,
            particles,
            shake: ScreenShake::default(),
            shake_rng: Pcg32::seed_from_u64(seed ^ SHAKE_STREAM),
            camera_offset: Vec2::ZERO,
            time_ticks: 0,
            game_over: false,
            announced_high_score: false,
            events: Vec::new(),
            config,
        }
    }

    /// Spawn a specific variant at `x` along the top edge.
    /// Returns false when the pool is exhausted.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, x: f32) -> bool {
        self.place(EnemyFactory::create(kind, Vec2::new(x, 0.0)))
    }

    /// Spawn a random variant at a random position along the top edge
    pub fn spawn_random_enemy(&mut self) -> bool {
        let mut enemy = EnemyFactory::create_random(&mut self.rng, Vec2::ZERO);
        let span = self.config.width - ENEMY_BASE_SIZE * enemy.scale;
        enemy.pos.x = if span > 0.0 { self.rng.random_range(0.0..span) } else { 0.0 };
        self.place(enemy)
    }

    fn place(&mut self, enemy: Enemy) -> bool {
        let handle = match self.enemies.acquire() {
            Ok(handle) => handle,
            Err(e) => {
                log::debug!("Skipping spawn: {e}");
                return false;
            }
        };
        let kind = enemy.kind;
        if let Some(slot) = self.enemies.get_mut(handle) {
            *slot = enemy;
        }
        self.live.push(handle);
        self.events.push(GameEvent::EnemySpawned { kind });
        log::debug!("Spawned {} enemy ({} live)", kind.as_str(), self.live.len());
        true
    }

    /// Drop a live enemy from the spawn list and return it to the pool in one step
    pub(crate) fn despawn(&mut self, live_index: usize) {
        let handle = self.live.remove(live_index);
        if let Err(e) = self.enemies.release(handle) {
            log::warn!("Enemy release failed: {e}");
        }
    }

    /// Live enemies in spawn order
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.live.iter().filter_map(|&h| self.enemies.get(h))
    }

    pub fn enemy_count(&self) -> usize {
        self.live.len()
    }

    pub fn enemy_pool(&self) -> &ObjectPool<Enemy> {
        &self.enemies
    }

    /// Events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the shake and resample the camera offset
    pub(crate) fn update_camera(&mut self, dt: f32) {
        self.shake.update(dt);
        self.camera_offset = self.shake.offset(&mut self.shake_rng);
    }
}
