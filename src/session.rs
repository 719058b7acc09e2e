//! Menu / Playing / Paused / GameOver state machine
//!
//! Exactly one scene is active. Input and updates never switch scenes on their
//! own: they return a [`Transition`] that the caller hands back to
//! [`SessionController::apply`].

use glam::Vec2;

use crate::highscores::today;
use crate::renderer::{self, Surface};
use crate::score::ScoreTracker;
use crate::settings::Settings;
use crate::sim::{GameEvent, PlayConfig, PlayState, TickInput, tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Q,
}

/// Host input, already translated into world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    PointerMoved(Vec2),
    PointerDown(Vec2),
    PointerUp(Vec2),
}

/// Scene change requested by input or by the running match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    StartGame,
    Pause,
    Resume,
    GameOver,
    BackToMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateId {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Result of a finished match, filled in when the game-over scene is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameOverSummary {
    pub score: u64,
    pub new_high_score: bool,
    /// Leaderboard placement, if the run made it on
    pub rank: Option<usize>,
}

#[derive(Debug)]
enum Scene {
    Menu,
    Playing(Box<PlayState>),
    /// Holds the match untouched until it resumes
    Paused(Box<PlayState>),
    GameOver(GameOverSummary),
}

impl Scene {
    fn id(&self) -> StateId {
        match self {
            Scene::Menu => StateId::Menu,
            Scene::Playing(_) => StateId::Playing,
            Scene::Paused(_) => StateId::Paused,
            Scene::GameOver(_) => StateId::GameOver,
        }
    }
}

/// Owns the settings, the score service and the active scene
#[derive(Debug)]
pub struct SessionController {
    settings: Settings,
    score: ScoreTracker,
    scene: Scene,
    input: TickInput,
    /// A press no tick has seen yet
    press_pending: bool,
    /// Release that arrived while a press was still pending
    release_pending: bool,
    seed_base: u64,
    games_started: u64,
    events: Vec<GameEvent>,
}

impl SessionController {
    /// Starts on the menu. Match seeds derive from `settings.seed` (0 when unset).
    pub fn new(settings: Settings, score: ScoreTracker) -> Self {
        let seed_base = settings.seed.unwrap_or(0);
        log::info!("Session ready (seed base {seed_base})");
        Self {
            settings,
            score,
            scene: Scene::Menu,
            input: TickInput::default(),
            press_pending: false,
            release_pending: false,
            seed_base,
            games_started: 0,
            events: Vec::new(),
        }
    }

    pub fn state_id(&self) -> StateId {
        self.scene.id()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    /// The match, whether running or paused
    pub fn play_state(&self) -> Option<&PlayState> {
        match &self.scene {
            Scene::Playing(state) | Scene::Paused(state) => Some(&**state),
            _ => None,
        }
    }

    pub fn play_state_mut(&mut self) -> Option<&mut PlayState> {
        match &mut self.scene {
            Scene::Playing(state) | Scene::Paused(state) => Some(&mut **state),
            _ => None,
        }
    }

    pub fn game_over_summary(&self) -> Option<&GameOverSummary> {
        match &self.scene {
            Scene::GameOver(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn input(&self) -> &TickInput {
        &self.input
    }

    /// Gameplay events collected since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Route input to the active scene
    pub fn handle_input(&mut self, event: InputEvent) -> Option<Transition> {
        match event {
            InputEvent::PointerMoved(pos) => {
                self.input.pointer = pos;
                None
            }
            InputEvent::PointerDown(pos) => {
                self.input = TickInput::press(pos);
                self.press_pending = matches!(self.scene, Scene::Playing(_));
                self.release_pending = false;
                None
            }
            InputEvent::PointerUp(pos) => {
                self.input.pointer = pos;
                // Hold the press until a tick has registered it
                if self.press_pending {
                    self.release_pending = true;
                } else {
                    self.input.pointer_down = false;
                }
                None
            }
            InputEvent::KeyPressed(key) => match (&self.scene, key) {
                (Scene::Menu, Key::Enter) => Some(Transition::StartGame),
                (Scene::Playing(_), Key::Escape) => Some(Transition::Pause),
                (Scene::Paused(_), Key::Escape) => Some(Transition::Resume),
                (Scene::Playing(_) | Scene::Paused(_), Key::Q) => Some(Transition::GameOver),
                (Scene::GameOver(_), Key::Enter) => Some(Transition::BackToMenu),
                _ => None,
            },
        }
    }

    /// Advance the active scene. Only a running match does anything.
    pub fn update(&mut self, dt: f32) -> Option<Transition> {
        let Scene::Playing(state) = &mut self.scene else {
            return None;
        };
        let outcome = tick(state, &mut self.score, &self.input, dt);

        self.press_pending = false;
        if std::mem::take(&mut self.release_pending) {
            self.input.pointer_down = false;
        }

        if state.events.iter().any(|e| matches!(e, GameEvent::NewHighScore { .. })) {
            match self.score.save_high_score() {
                Ok(_) => log::info!("High score {} saved mid-game", self.score.stored_high_score()),
                Err(e) => log::warn!("Failed to save high score: {e}"),
            }
        }
        self.events.append(&mut state.events);
        outcome.game_over.then_some(Transition::GameOver)
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let screen = Vec2::new(self.settings.window_width, self.settings.window_height);
        match &self.scene {
            Scene::Menu => renderer::render_menu(screen, &self.score, surface),
            Scene::Playing(state) => renderer::render_play(state, &self.score, surface),
            Scene::Paused(state) => renderer::render_paused(state, &self.score, surface),
            Scene::GameOver(summary) => renderer::render_game_over(screen, summary, surface),
        }
    }

    /// Perform a requested transition. Returns false if it does not apply to the
    /// current scene.
    pub fn apply(&mut self, transition: Transition) -> bool {
        match transition {
            Transition::StartGame => self.start_game(),
            Transition::Pause => self.pause(),
            Transition::Resume => self.resume(),
            Transition::GameOver => self.game_over(),
            Transition::BackToMenu => self.back_to_menu(),
        }
    }

    /// Menu or game over → a fresh match
    pub fn start_game(&mut self) -> bool {
        if !matches!(self.scene, Scene::Menu | Scene::GameOver(_)) {
            return false;
        }
        let seed = self.seed_base.wrapping_add(self.games_started);
        self.games_started += 1;
        let state = PlayState::new(PlayConfig::from(&self.settings), seed);
        self.change_state(|_| Scene::Playing(Box::new(state)));
        true
    }

    pub fn pause(&mut self) -> bool {
        if !matches!(self.scene, Scene::Playing(_)) {
            return false;
        }
        self.change_state(|scene| match scene {
            Scene::Playing(state) => Scene::Paused(state),
            other => other,
        });
        true
    }

    pub fn resume(&mut self) -> bool {
        if !matches!(self.scene, Scene::Paused(_)) {
            return false;
        }
        self.change_state(|scene| match scene {
            Scene::Paused(state) => Scene::Playing(state),
            other => other,
        });
        true
    }

    /// Playing or paused → game over
    pub fn game_over(&mut self) -> bool {
        if !matches!(self.scene, Scene::Playing(_) | Scene::Paused(_)) {
            return false;
        }
        let score = self.score.current();
        self.change_state(|_| {
            Scene::GameOver(GameOverSummary {
                score,
                ..GameOverSummary::default()
            })
        });
        true
    }

    pub fn back_to_menu(&mut self) -> bool {
        if !matches!(self.scene, Scene::GameOver(_)) {
            return false;
        }
        self.change_state(|_| Scene::Menu);
        true
    }

    /// Exit hook on the old scene, swap, enter hook on the new one
    fn change_state(&mut self, next: impl FnOnce(Scene) -> Scene) {
        let from = self.scene.id();
        self.on_exit();
        let previous = std::mem::replace(&mut self.scene, Scene::Menu);
        self.scene = next(previous);
        self.on_enter(from);
        log::info!("State change: {:?} -> {:?}", from, self.scene.id());
    }

    fn on_exit(&mut self) {
        match &mut self.scene {
            Scene::Playing(state) => {
                // Frozen frames are drawn steady
                state.shake.stop();
                state.camera_offset = Vec2::ZERO;
            }
            Scene::Menu | Scene::Paused(_) | Scene::GameOver(_) => {}
        }
    }

    fn on_enter(&mut self, from: StateId) {
        match &mut self.scene {
            Scene::Playing(state) => {
                if from == StateId::Paused {
                    log::info!("Resumed at {} points", self.score.current());
                } else {
                    self.score.reset();
                    self.input = TickInput::default();
                    self.press_pending = false;
                    self.release_pending = false;
                    log::info!("New game (seed {})", state.seed);
                }
            }
            Scene::Paused(_) => log::info!("Paused"),
            Scene::GameOver(summary) => {
                if let Err(e) = self.score.save_high_score() {
                    log::warn!("Failed to save high score: {e}");
                }
                // Also true when the record was already saved mid-game
                summary.new_high_score = self.score.beat_session_start_high_score();
                if summary.score > 0 && self.score.qualifies_for_leaderboard() {
                    let added = self
                        .score
                        .add_to_leaderboard(&self.settings.player_name, summary.score, &today());
                    summary.rank = match added {
                        Ok(rank) => rank,
                        Err(e) => {
                            log::warn!("Failed to save leaderboard: {e}");
                            None
                        }
                    };
                }
                log::info!(
                    "Game over: {} points{}",
                    summary.score,
                    if summary.new_high_score { " (new high score)" } else { "" }
                );
            }
            Scene::Menu => {}
        }
    }

    /// Flush anything worth keeping before the program exits
    pub fn shutdown(&mut self) {
        if self.play_state().is_some() {
            match self.score.save_high_score() {
                Ok(true) => log::info!("High score flushed on exit"),
                Ok(false) => {}
                Err(e) => log::warn!("Failed to save high score on exit: {e}"),
            }
        }
        log::info!("Session closed after {} games", self.games_started);
    }
}
