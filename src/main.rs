//! Falling Fury entry point
//!
//! Headless demo: plays one seeded match with a simple autoplayer on a fixed
//! 60 Hz timestep, logs what would be drawn, then prints the leaderboard.

use std::error::Error;
use std::path::{Path, PathBuf};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use falling_fury::color::Color;
use falling_fury::consts::*;
use falling_fury::persistence::FileStorage;
use falling_fury::renderer::Surface;
use falling_fury::resources::Resources;
use falling_fury::session::{InputEvent, Key, SessionController, StateId};
use falling_fury::{Aabb, QualityPreset, ScoreTracker, Settings};

const SETTINGS_FILE: &str = "settings.json";
const FONT_NAME: &str = "main";
const FONT_FILE: &str = "assets/font.ttf";

/// Longest match the demo will play before quitting (seconds)
const DEMO_MAX_SECONDS: f32 = 120.0;
/// Frames between autoplayer clicks
const CLICK_EVERY: u64 = 12;
/// Chance the autoplayer actually aims at an enemy
const AIM_ACCURACY: f64 = 0.6;

/// Surface that counts draw calls and logs text
#[derive(Debug, Default)]
struct LogSurface {
    rects: usize,
    circles: usize,
    lines: Vec<String>,
}

impl LogSurface {
    fn flush(&mut self, level: log::Level) {
        log::log!(level, "frame: {} rects, {} circles", self.rects, self.circles);
        for line in self.lines.drain(..) {
            log::log!(level, "  {line}");
        }
        self.rects = 0;
        self.circles = 0;
    }
}

impl Surface for LogSurface {
    fn fill_rect(&mut self, _rect: Aabb, _color: Color) {
        self.rects += 1;
    }

    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {
        self.circles += 1;
    }

    fn draw_text(&mut self, text: &str, _pos: Vec2, _size: u32, _color: Color) {
        self.lines.push(text.to_string());
    }
}

/// Real font if one ships next to the binary, otherwise an empty placeholder
fn load_font(resources: &mut Resources) -> Result<(), Box<dyn Error>> {
    let path = Path::new(FONT_FILE);
    if path.exists() {
        resources.load_font(FONT_NAME, path)?;
    } else {
        log::warn!("{} not found; headless run uses a placeholder font", path.display());
        resources.insert(falling_fury::error::ResourceKind::Font, FONT_NAME, Vec::new());
    }
    // Fatal if it is still missing
    resources.font(FONT_NAME)?;
    Ok(())
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

/// Where the autoplayer clicks this frame, if anywhere
fn autoplay_target(session: &SessionController, rng: &mut Pcg32) -> Option<Vec2> {
    let state = session.play_state()?;
    // Lowest enemy is the most urgent
    let target = state
        .enemies()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?
        .bounds()
        .center();
    if rng.random_bool(AIM_ACCURACY) {
        Some(target)
    } else {
        Some(Vec2::new(target.x, (target.y - 200.0).max(0.0)))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Falling Fury (headless) starting...");

    // Usage: falling-fury [settings.json] [low|medium|high]
    let mut args = std::env::args().skip(1);
    let settings_path = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let mut settings = Settings::load(&settings_path);
    if let Some(name) = args.next() {
        match QualityPreset::parse(&name) {
            Some(preset) => settings.quality = preset,
            None => log::warn!("Unknown quality preset {name:?}, keeping {}", settings.quality.as_str()),
        }
    }
    log::info!("Quality: {}", settings.quality.as_str());
    let seed = *settings.seed.get_or_insert_with(clock_seed);
    log::info!("Seed: {seed}");

    let mut resources = Resources::new();
    load_font(&mut resources)?;

    let score = ScoreTracker::new(Box::new(FileStorage::new(&settings.data_dir)));
    let mut session = SessionController::new(settings, score);
    let mut surface = LogSurface::default();
    let mut rng = Pcg32::seed_from_u64(seed);

    session.render(&mut surface);
    surface.flush(log::Level::Debug);
    if let Some(t) = session.handle_input(InputEvent::KeyPressed(Key::Enter)) {
        session.apply(t);
    }

    let mut accumulator = 0.0f32;
    let mut frame = 0u64;
    let mut played = 0.0f32;
    while session.state_id() == StateId::Playing {
        // Simulated frame time with some jitter, as a real host would see
        let frame_dt = (SIM_DT * rng.random_range(0.5..2.0)).min(0.1);
        accumulator += frame_dt;
        frame += 1;

        if frame % CLICK_EVERY == 0 {
            if let Some(pos) = autoplay_target(&session, &mut rng) {
                session.handle_input(InputEvent::PointerDown(pos));
            }
        } else if session.input().pointer_down {
            let pos = session.input().pointer;
            session.handle_input(InputEvent::PointerUp(pos));
        }

        let mut substeps = 0;
        let mut pending = None;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS && pending.is_none() {
            pending = session.update(SIM_DT);
            accumulator -= SIM_DT;
            played += SIM_DT;
            substeps += 1;
        }

        for event in session.drain_events() {
            if let Some(cue) = event.sound_cue() {
                log::debug!("sound: {}", cue.name());
            }
        }

        if played >= DEMO_MAX_SECONDS && pending.is_none() {
            log::info!("Demo time limit reached, quitting");
            pending = session.handle_input(InputEvent::KeyPressed(Key::Q));
        }
        if let Some(t) = pending {
            session.apply(t);
        }

        // Log one frame per simulated second
        if frame % 60 == 0 {
            session.render(&mut surface);
            surface.flush(log::Level::Info);
        }
    }

    session.render(&mut surface);
    surface.flush(log::Level::Info);
    if let Some(t) = session.handle_input(InputEvent::KeyPressed(Key::Enter)) {
        session.apply(t);
    }

    println!("\nLeaderboard:");
    let board = session.score().leaderboard();
    if board.is_empty() {
        println!("  (empty)");
    }
    for (i, entry) in board.entries().iter().enumerate() {
        println!("  {:>2}. {:<12} {:>8}  {}", i + 1, entry.name, entry.score, entry.date);
    }
    println!("High score: {}", session.score().high_score());

    session.shutdown();
    resources.clear();
    Ok(())
}
