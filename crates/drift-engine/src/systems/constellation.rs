//! Static star layer for wide screens.
//!
//! Generated once; the page animates the twinkle with the per-star and
//! per-line delays, so nothing here ticks.

use glam::Vec2;

use crate::api::config::ConstellationConfig;
use crate::api::types::Viewport;
use crate::core::rng::Rng;
use crate::renderer::color::Rgb;
use crate::renderer::geometry::{line_quad, LineEnd, LINE_VERTICES};
use crate::renderer::instance::{InstanceBuffer, LineVertex, StarInstance};

/// Constellation line thickness in pixels.
pub const LINE_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec2,
    pub twinkle_delay: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstellationLine {
    pub a: usize,
    pub b: usize,
    pub twinkle_delay: f32,
}

/// Stars, the lines kept between them, and their render buffers.
#[derive(Debug)]
pub struct Constellation {
    stars: Vec<Star>,
    lines: Vec<ConstellationLine>,
    star_instances: InstanceBuffer<StarInstance>,
    line_vertices: InstanceBuffer<LineVertex>,
}

impl Constellation {
    /// Whether a viewport is wide enough to get a constellation at all.
    pub fn fits(viewport: Viewport, config: &ConstellationConfig) -> bool {
        config.enabled && viewport.width > config.min_width
    }

    /// One star per `star_spacing` pixels of width; each pair closer than
    /// `link_distance` is linked with probability `link_chance`.
    pub fn generate(viewport: Viewport, config: &ConstellationConfig, rng: &mut Rng) -> Self {
        let count = (viewport.width / config.star_spacing).floor().max(0.0) as usize;
        let stars: Vec<Star> = (0..count)
            .map(|_| Star {
                position: viewport.random_point(rng),
                twinkle_delay: rng.next_f32() * config.star_twinkle_secs,
            })
            .collect();

        let mut lines = Vec::new();
        for i in 0..stars.len() {
            for j in i + 1..stars.len() {
                let distance = stars[i].position.distance(stars[j].position);
                if distance < config.link_distance && rng.chance(config.link_chance) {
                    lines.push(ConstellationLine {
                        a: i,
                        b: j,
                        twinkle_delay: rng.next_f32() * config.line_twinkle_secs,
                    });
                }
            }
        }

        let mut star_instances = InstanceBuffer::with_capacity(stars.len());
        for star in &stars {
            star_instances.push(StarInstance {
                x: star.position.x,
                y: star.position.y,
                size: config.star_size,
                twinkle_delay: star.twinkle_delay,
            });
        }

        let mut line_vertices = InstanceBuffer::with_capacity(lines.len() * LINE_VERTICES);
        for line in &lines {
            let end = |star: &Star| LineEnd {
                pos: star.position.to_array(),
                color: Rgb::WHITE,
                alpha: config.line_opacity,
            };
            line_vertices.extend_from_slice(&line_quad(
                end(&stars[line.a]),
                end(&stars[line.b]),
                LINE_WIDTH,
                line.twinkle_delay,
            ));
        }

        Constellation {
            stars,
            lines,
            star_instances,
            line_vertices,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn lines(&self) -> &[ConstellationLine] {
        &self.lines
    }

    pub fn star_instances(&self) -> &InstanceBuffer<StarInstance> {
        &self.star_instances
    }

    pub fn line_vertices(&self) -> &InstanceBuffer<LineVertex> {
        &self.line_vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_count_follows_width() {
        let mut rng = Rng::new(3);
        let c = Constellation::generate(Viewport::new(1280.0, 800.0), &ConstellationConfig::default(), &mut rng);
        assert_eq!(c.stars().len(), 25);
        assert_eq!(c.star_instances().len(), 25);
        for s in c.stars() {
            assert!(s.twinkle_delay >= 0.0 && s.twinkle_delay < 3.0);
        }
    }

    #[test]
    fn lines_only_between_close_stars() {
        let mut rng = Rng::new(9);
        let c = Constellation::generate(Viewport::new(1920.0, 1080.0), &ConstellationConfig::default(), &mut rng);
        for line in c.lines() {
            assert!(line.a < line.b);
            let d = c.stars()[line.a].position.distance(c.stars()[line.b].position);
            assert!(d < 200.0, "line spans {}", d);
            assert!(line.twinkle_delay < 4.0);
        }
        assert_eq!(c.line_vertices().len(), c.lines().len() * LINE_VERTICES);
    }

    #[test]
    fn link_chance_zero_means_no_lines() {
        let mut rng = Rng::new(9);
        let config = ConstellationConfig {
            link_chance: 0.0,
            ..ConstellationConfig::default()
        };
        let c = Constellation::generate(Viewport::new(1920.0, 1080.0), &config, &mut rng);
        assert!(c.lines().is_empty());
    }

    #[test]
    fn narrow_viewports_do_not_fit() {
        let config = ConstellationConfig::default();
        assert!(!Constellation::fits(Viewport::new(768.0, 600.0), &config));
        assert!(Constellation::fits(Viewport::new(769.0, 600.0), &config));
        let disabled = ConstellationConfig { enabled: false, ..config };
        assert!(!Constellation::fits(Viewport::new(1920.0, 600.0), &disabled));
    }
}
