//! Draw pass
//!
//! The crate has no graphics backend. Hosts implement [`Surface`] over
//! whatever they draw with; the pass only issues rectangles, circles and text.

mod hud;

pub use hud::{combo_line, health_line, render_game_over, render_menu, render_paused, render_play};

use glam::Vec2;

use crate::Aabb;
use crate::color::Color;

/// Draw target supplied by the host
pub trait Surface {
    fn fill_rect(&mut self, rect: Aabb, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// `pos` is the top-left of the text, `size` the font size in pixels
    fn draw_text(&mut self, text: &str, pos: Vec2, size: u32, color: Color);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect { rect: Aabb, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Text { text: String, pos: Vec2, size: u32, color: Color },
}

/// Surface that keeps every call for later inspection
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    pub fn rect_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: u32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            size,
            color,
        });
    }
}
