use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::types::{Palette, Theme};

/// Configuration for the particle backdrop.
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Viewport width → particle count.
    pub capacity: CapacityBands,
    /// Hue range used while the page is in the light theme.
    pub light_palette: Palette,
    /// Hue range used while the page is in the dark theme.
    pub dark_palette: Palette,
    /// Particles closer than this are linked (default: 120).
    pub connection_distance: f32,
    /// Link opacity at zero distance (default: 0.3).
    pub connection_opacity: f32,
    /// How often the link set is rebuilt.
    pub connection_cadence: ConnectionCadence,
    /// Pointer attraction radius (default: 100).
    pub pointer_radius: f32,
    /// Impulse scale at the pointer (default: 0.01).
    pub pointer_strength: f32,
    /// Extra opacity near the pointer (default: 0.3).
    pub pointer_opacity_boost: f32,
    /// Per-frame velocity multiplier (default: 0.99).
    pub damping: f32,
    /// Frames a burst particle lives (default: 60).
    pub burst_lifespan: u32,
    /// Probability a click spawns a burst (default: 0.3).
    pub click_burst_chance: f32,
    /// Burst particles per click (default: 8).
    pub click_burst_count: usize,
    pub performance: PerformanceConfig,
    pub constellation: ConstellationConfig,
    /// Fixed RNG seed. `None` lets the host supply entropy.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            capacity: CapacityBands::default(),
            light_palette: Palette::OCEAN,
            dark_palette: Palette::OCEAN,
            connection_distance: 120.0,
            connection_opacity: 0.3,
            connection_cadence: ConnectionCadence::default(),
            pointer_radius: 100.0,
            pointer_strength: 0.01,
            pointer_opacity_boost: 0.3,
            damping: 0.99,
            burst_lifespan: 60,
            click_burst_chance: 0.3,
            click_burst_count: 8,
            performance: PerformanceConfig::default(),
            constellation: ConstellationConfig::default(),
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Palette for a theme.
    pub fn palette_for(&self, theme: Theme) -> Palette {
        match theme {
            Theme::Light => self.light_palette,
            Theme::Dark => self.dark_palette,
        }
    }

    /// Reject configs the field cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capacity.validate()?;
        for palette in [self.light_palette, self.dark_palette] {
            if !(palette.hue_min < palette.hue_max) {
                return Err(ConfigError::EmptyPalette(palette));
            }
        }
        check_probability("click_burst_chance", self.click_burst_chance)?;
        check_probability("constellation.link_chance", self.constellation.link_chance)?;
        check_probability("performance.capacity_scale", self.performance.capacity_scale)?;
        match self.connection_cadence {
            ConnectionCadence::Probability { chance } => check_probability("connection_cadence.chance", chance)?,
            ConnectionCadence::Interval { frames: 0 } => return Err(ConfigError::ZeroInterval),
            ConnectionCadence::Interval { .. } => {}
        }
        if self.burst_lifespan == 0 {
            return Err(ConfigError::ZeroBurstLifespan);
        }
        if !(self.constellation.star_spacing > 0.0) {
            return Err(ConfigError::NonPositiveStarSpacing(self.constellation.star_spacing));
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

/// One step of the capacity function: widths strictly below `below` get `count` particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityBand {
    pub below: f32,
    pub count: usize,
}

/// Step function from viewport width to particle count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityBands {
    /// Bands in ascending `below` order.
    pub bands: Vec<CapacityBand>,
    /// Count for widths past the last band.
    pub fallback: usize,
}

impl Default for CapacityBands {
    fn default() -> Self {
        Self {
            bands: vec![
                CapacityBand { below: 480.0, count: 30 },
                CapacityBand { below: 768.0, count: 50 },
                CapacityBand { below: 1024.0, count: 80 },
            ],
            fallback: 100,
        }
    }
}

impl CapacityBands {
    pub fn capacity_for(&self, width: f32) -> usize {
        self.bands
            .iter()
            .find(|band| width < band.below)
            .map(|band| band.count)
            .unwrap_or(self.fallback)
    }

    /// Largest count any width can produce.
    pub fn max_capacity(&self) -> usize {
        self.bands.iter().map(|b| b.count).fold(self.fallback, usize::max)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bands.windows(2).any(|w| w[0].below >= w[1].below) {
            return Err(ConfigError::UnsortedBands);
        }
        Ok(())
    }
}

/// When the link set is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConnectionCadence {
    /// Rebuild with independent probability `chance` each frame.
    Probability { chance: f32 },
    /// Rebuild every `frames` frames.
    Interval { frames: u32 },
}

impl Default for ConnectionCadence {
    fn default() -> Self {
        ConnectionCadence::Probability { chance: 0.1 }
    }
}

/// Frame-rate guard: a window below `min_fps` scales the capacity down on the next resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub min_fps: u32,
    pub capacity_scale: f32,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            min_fps: 30,
            capacity_scale: 0.7,
        }
    }
}

/// Static star layer shown on wide viewports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstellationConfig {
    pub enabled: bool,
    /// Only viewports strictly wider than this get stars.
    pub min_width: f32,
    /// Delay after start before the stars appear, in ms.
    pub delay_ms: f64,
    /// One star per this many pixels of width.
    pub star_spacing: f32,
    pub star_size: f32,
    /// Stars closer than this may be linked.
    pub link_distance: f32,
    pub link_chance: f32,
    pub line_opacity: f32,
    /// Upper bound of the random twinkle delay for stars, in seconds.
    pub star_twinkle_secs: f32,
    /// Upper bound of the random twinkle delay for lines, in seconds.
    pub line_twinkle_secs: f32,
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_width: 768.0,
            delay_ms: 2000.0,
            star_spacing: 50.0,
            star_size: 2.0,
            link_distance: 200.0,
            link_chance: 0.3,
            line_opacity: 0.2,
            star_twinkle_secs: 3.0,
            line_twinkle_secs: 4.0,
        }
    }
}

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnsortedBands,
    EmptyPalette(Palette),
    ProbabilityOutOfRange { name: &'static str, value: f32 },
    ZeroInterval,
    ZeroBurstLifespan,
    NonPositiveStarSpacing(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnsortedBands => write!(f, "capacity bands must be in strictly ascending width order"),
            ConfigError::EmptyPalette(p) => write!(f, "palette hue range [{}, {}) is empty", p.hue_min, p.hue_max),
            ConfigError::ProbabilityOutOfRange { name, value } => write!(f, "{} must be within [0, 1], got {}", name, value),
            ConfigError::ZeroInterval => write!(f, "connection interval must be at least one frame"),
            ConfigError::ZeroBurstLifespan => write!(f, "burst lifespan must be at least one frame"),
            ConfigError::NonPositiveStarSpacing(v) => write!(f, "constellation star spacing must be positive, got {}", v),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bands_match_breakpoints() {
        let bands = CapacityBands::default();
        assert_eq!(bands.capacity_for(320.0), 30);
        assert_eq!(bands.capacity_for(479.9), 30);
        assert_eq!(bands.capacity_for(480.0), 50);
        assert_eq!(bands.capacity_for(500.0), 50);
        assert_eq!(bands.capacity_for(767.0), 50);
        assert_eq!(bands.capacity_for(768.0), 80);
        assert_eq!(bands.capacity_for(1023.0), 80);
        assert_eq!(bands.capacity_for(1024.0), 100);
        assert_eq!(bands.capacity_for(2560.0), 100);
        assert_eq!(bands.max_capacity(), 100);
    }

    #[test]
    fn empty_json_is_default() {
        let config = FieldConfig::from_json("{}").unwrap();
        assert_eq!(config.connection_distance, 120.0);
        assert_eq!(config.capacity, CapacityBands::default());
        assert_eq!(config.connection_cadence, ConnectionCadence::Probability { chance: 0.1 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let json = r#"{
            "connection_cadence": { "mode": "interval", "frames": 10 },
            "dark_palette": { "hue_min": 260.0, "hue_max": 300.0 },
            "constellation": { "enabled": false },
            "seed": 1234
        }"#;
        let config = FieldConfig::from_json(json).unwrap();
        assert_eq!(config.connection_cadence, ConnectionCadence::Interval { frames: 10 });
        assert_eq!(config.palette_for(Theme::Dark).hue_min, 260.0);
        assert_eq!(config.palette_for(Theme::Light), Palette::OCEAN);
        assert!(!config.constellation.enabled);
        assert_eq!(config.constellation.min_width, 768.0);
        assert_eq!(config.seed, Some(1234));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(FieldConfig::from_json("{ \"damping\": \"fast\" }").is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = FieldConfig::default();
        config.click_burst_chance = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "click_burst_chance", .. })
        ));

        let mut config = FieldConfig::default();
        config.connection_cadence = ConnectionCadence::Interval { frames: 0 };
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));

        let mut config = FieldConfig::default();
        config.capacity.bands.reverse();
        assert_eq!(config.validate(), Err(ConfigError::UnsortedBands));

        let mut config = FieldConfig::default();
        config.light_palette = Palette { hue_min: 260.0, hue_max: 200.0 };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPalette(_))));
    }

    #[test]
    fn config_error_messages() {
        let err = ConfigError::ProbabilityOutOfRange { name: "x", value: 2.0 };
        assert_eq!(err.to_string(), "x must be within [0, 1], got 2");
    }
}
