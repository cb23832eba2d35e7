use std::ops::Range;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::rng::Rng;

/// Size of the display surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Bottom-right corner; the top-left is the origin.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Uniformly random point inside `[0, width] x [0, height]`.
    pub fn random_point(&self, rng: &mut Rng) -> Vec2 {
        Vec2::new(rng.next_f32() * self.width, rng.next_f32() * self.height)
    }
}

/// Immutable per-tick view of the ambient state a particle update reads.
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot {
    /// Last known pointer position.
    pub pointer: Vec2,
    /// Surface bounds particles bounce inside.
    pub bounds: Viewport,
}

/// Hue range particles draw their color from, in degrees: `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub hue_min: f32,
    pub hue_max: f32,
}

impl Palette {
    /// Blue to purple.
    pub const OCEAN: Palette = Palette { hue_min: 200.0, hue_max: 260.0 };

    pub fn hues(&self) -> Range<f32> {
        self.hue_min..self.hue_max
    }

    pub fn sample(&self, rng: &mut Rng) -> f32 {
        rng.range(self.hues())
    }

    pub fn contains(&self, hue: f32) -> bool {
        self.hues().contains(&hue)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::OCEAN
    }
}

/// Page theme announced by the theme toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Parse the theme name carried by the theme-change event.
    pub fn from_name(name: &str) -> Option<Theme> {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_point_inside_viewport() {
        let vp = Viewport::new(500.0, 300.0);
        let mut rng = Rng::new(5);
        for _ in 0..500 {
            let p = vp.random_point(&mut rng);
            assert!(p.x >= 0.0 && p.x <= 500.0);
            assert!(p.y >= 0.0 && p.y <= 300.0);
        }
    }

    #[test]
    fn palette_samples_in_range() {
        let mut rng = Rng::new(8);
        for _ in 0..500 {
            assert!(Palette::OCEAN.contains(Palette::OCEAN.sample(&mut rng)));
        }
    }

    #[test]
    fn theme_names() {
        assert_eq!(Theme::from_name("dark"), Some(Theme::Dark));
        assert_eq!(Theme::from_name(" Light "), Some(Theme::Light));
        assert_eq!(Theme::from_name("sepia"), None);
    }
}
