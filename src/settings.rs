//! Game settings and preferences
//!
//! Stored as JSON next to the save files. Missing or unreadable settings fall
//! back to defaults so the game always starts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particle pool size for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => DEFAULT_PARTICLE_POOL,
            QualityPreset::High => 400,
        }
    }
}

/// How the spawn timer advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnCadence {
    /// Timer counts seconds (scaled by delta time)
    #[default]
    Seconds,
    /// Timer counts ticks regardless of delta time
    Ticks,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Arena ===
    pub window_width: f32,
    pub window_height: f32,

    // === Gameplay ===
    pub starting_health: i32,
    /// Live enemy cap
    pub max_enemies: usize,
    pub spawn_cadence: SpawnCadence,
    /// Seconds (or ticks, per `spawn_cadence`) between spawns
    pub spawn_interval: f32,
    /// Enemy pool slots allocated up front
    pub enemy_pool_size: usize,
    /// Whether the enemy pool may allocate past `enemy_pool_size`
    pub enemy_pool_growth: bool,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,

    // === Visual Effects ===
    /// Particle effects (hit bursts, miss sparks, combo sparkles)
    pub particles: bool,
    /// Screen shake on misses
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    // === Profile ===
    /// Name recorded on the leaderboard
    pub player_name: String,
    /// Directory holding high score and leaderboard files
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,

            starting_health: STARTING_HEALTH,
            max_enemies: MAX_ENEMIES,
            spawn_cadence: SpawnCadence::Seconds,
            spawn_interval: SPAWN_INTERVAL_SECS,
            enemy_pool_size: MAX_ENEMIES,
            enemy_pool_growth: false,
            seed: None,

            particles: true,
            screen_shake: true,

            reduced_motion: false,

            player_name: "Player".to_string(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Frame-counting cadence with a 10-tick interval
    pub fn with_tick_cadence(mut self) -> Self {
        self.spawn_cadence = SpawnCadence::Ticks;
        self.spawn_interval = SPAWN_INTERVAL_TICKS;
        self
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle pool size
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
