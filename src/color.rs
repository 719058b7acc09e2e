//! 8-bit RGBA colour shared by the simulation and the render pass

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Channel-wise interpolation, `t` clamped to [0, 1]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const COMMON: Color = Color::rgb(0, 255, 0);
    pub const FAST: Color = Color::rgb(255, 0, 0);
    pub const TANK: Color = Color::rgb(0, 0, 255);
    pub const BONUS: Color = Color::rgb(255, 255, 0);
    pub const MISS: Color = Color::rgb(255, 100, 100);
    pub const COMBO_GOLD: Color = Color::rgb(255, 215, 0);
    pub const HUD_TEXT: Color = Color::rgb(0, 255, 255);
    pub const TITLE_TEXT: Color = Color::rgb(255, 255, 255);
    pub const WARNING_TEXT: Color = Color::rgb(255, 64, 64);
    pub const BACKGROUND: Color = Color::rgb(5, 5, 12);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::rgb(0, 100, 200);
        let b = Color::rgba(255, 100, 0, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::rgba(128, 100, 100, 128));
    }
}
