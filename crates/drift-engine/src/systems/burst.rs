//! Click bursts: short-lived particles flying out of a point.
//! Separate from the swarm: no capacity, no respawn, own frame lane.

use std::f32::consts::TAU;
use std::ops::Range;

use glam::Vec2;

use crate::api::types::Palette;
use crate::core::rng::Rng;
use crate::renderer::color::Rgb;
use crate::renderer::instance::{InstanceBuffer, ParticleInstance};

/// One burst particle.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstParticle {
    pub origin: Vec2,
    /// Unit vector of travel.
    pub direction: Vec2,
    /// Pixels per frame.
    pub speed: f32,
    pub size: f32,
    pub hue: f32,
    /// Frames left.
    pub life: u32,
    pub lifespan: u32,
}

impl BurstParticle {
    pub const SPEED: Range<f32> = 2.0..7.0;
    pub const SIZE: Range<f32> = 2.0..8.0;

    /// Advance one frame. Returns false once expired.
    pub fn tick(&mut self) -> bool {
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    /// Remaining fraction of life; drives both scale and opacity.
    pub fn progress(&self) -> f32 {
        self.life as f32 / self.lifespan as f32
    }

    pub fn position(&self) -> Vec2 {
        let elapsed = (self.lifespan - self.life) as f32;
        self.origin + self.direction * self.speed * elapsed
    }

    pub fn instance(&self) -> ParticleInstance {
        let p = self.position();
        let progress = self.progress();
        ParticleInstance {
            glow: 0.0,
            ..ParticleInstance::new(p.x, p.y, self.size * progress, Rgb::from_hue(self.hue), progress)
        }
    }
}

/// All live burst particles and their render slots.
#[derive(Debug, Default)]
pub struct BurstSet {
    particles: Vec<BurstParticle>,
    instances: InstanceBuffer<ParticleInstance>,
}

impl BurstSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `count` particles from `origin`, evenly spread around the circle.
    pub fn emit(&mut self, origin: Vec2, count: usize, lifespan: u32, palette: Palette, rng: &mut Rng) {
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            self.particles.push(BurstParticle {
                origin,
                direction: Vec2::from_angle(angle),
                speed: rng.range(BurstParticle::SPEED),
                size: rng.range(BurstParticle::SIZE),
                hue: palette.sample(rng),
                life: lifespan,
                lifespan,
            });
        }
        self.rebuild_instances();
    }

    /// Advance every burst particle one frame, dropping expired ones.
    /// Returns true while any remain.
    pub fn tick(&mut self) -> bool {
        self.particles.retain_mut(|p| p.tick());
        self.rebuild_instances();
        !self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.instances.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[BurstParticle] {
        &self.particles
    }

    pub fn instances(&self) -> &InstanceBuffer<ParticleInstance> {
        &self.instances
    }

    fn rebuild_instances(&mut self) {
        self.instances.clear();
        for p in &self.particles {
            self.instances.push(p.instance());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_spreads_evenly() {
        let mut set = BurstSet::new();
        let mut rng = Rng::new(42);
        set.emit(Vec2::new(100.0, 100.0), 4, 60, Palette::OCEAN, &mut rng);
        assert_eq!(set.len(), 4);
        let dirs: Vec<Vec2> = set.particles().iter().map(|p| p.direction).collect();
        assert!((dirs[0] - Vec2::X).length() < 1e-5);
        assert!((dirs[1] - Vec2::Y).length() < 1e-5);
        assert!((dirs[2] + Vec2::X).length() < 1e-5);
        assert!((dirs[3] + Vec2::Y).length() < 1e-5);
        for p in set.particles() {
            assert!(p.speed >= 2.0 && p.speed < 7.0);
            assert!(p.size >= 2.0 && p.size < 8.0);
        }
    }

    #[test]
    fn expires_after_lifespan() {
        let mut set = BurstSet::new();
        let mut rng = Rng::new(42);
        set.emit(Vec2::new(100.0, 100.0), 8, 60, Palette::OCEAN, &mut rng);
        for frame in 1..60 {
            assert!(set.tick(), "still alive at frame {}", frame);
            assert_eq!(set.len(), 8);
        }
        assert!(!set.tick());
        assert!(set.is_empty());
        assert!(set.instances().is_empty());
    }

    #[test]
    fn moves_outward_and_fades() {
        let mut p = BurstParticle {
            origin: Vec2::new(10.0, 10.0),
            direction: Vec2::X,
            speed: 3.0,
            size: 6.0,
            hue: 220.0,
            life: 60,
            lifespan: 60,
        };
        for _ in 0..30 {
            p.tick();
        }
        assert_eq!(p.position(), Vec2::new(100.0, 10.0));
        let inst = p.instance();
        assert!((inst.alpha - 0.5).abs() < 1e-6);
        assert!((inst.size - 3.0).abs() < 1e-6);
        assert_eq!(inst.glow, 0.0);
    }
}
