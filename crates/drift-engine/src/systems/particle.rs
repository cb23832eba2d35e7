//! Swarm particles: spawn, per-frame kinematics, respawn.

use std::ops::Range;

use glam::Vec2;

use crate::api::config::FieldConfig;
use crate::api::types::{FrameSnapshot, Palette, Viewport};
use crate::core::rng::Rng;
use crate::renderer::color::Rgb;
use crate::renderer::instance::ParticleInstance;

/// Tunables the per-frame update reads. Built once from the config.
#[derive(Debug, Clone, Copy)]
pub struct Kinematics {
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    pub pointer_opacity_boost: f32,
    pub damping: f32,
}

impl Kinematics {
    pub fn from_config(config: &FieldConfig) -> Self {
        Self {
            pointer_radius: config.pointer_radius,
            pointer_strength: config.pointer_strength,
            pointer_opacity_boost: config.pointer_opacity_boost,
            damping: config.damping,
        }
    }
}

impl Default for Kinematics {
    fn default() -> Self {
        Self::from_config(&FieldConfig::default())
    }
}

/// A single swarm particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Diameter in pixels, fixed for the particle's whole existence.
    pub size: f32,
    /// Hue in degrees, drawn from the active palette.
    pub hue: f32,
    /// Always within [0, 1].
    pub opacity: f32,
    /// Frames left before respawn. Always `<= max_life`.
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// Initial velocity components are drawn from `[-SPEED, SPEED)`.
    pub const SPEED: f32 = 0.25;
    pub const SIZE: Range<f32> = 2.0..10.0;
    pub const OPACITY: Range<f32> = 0.3..0.8;
    pub const MIN_LIFE: u32 = 50;
    pub const MAX_LIFE: u32 = 150;

    /// Fresh particle somewhere inside `bounds`, at full life.
    pub fn spawn(bounds: Viewport, palette: Palette, rng: &mut Rng) -> Self {
        let max_life = rng.int_inclusive(Self::MIN_LIFE, Self::MAX_LIFE);
        Particle {
            position: bounds.random_point(rng),
            velocity: random_velocity(rng),
            size: rng.range(Self::SIZE),
            hue: palette.sample(rng),
            opacity: rng.range(Self::OPACITY),
            life: max_life,
            max_life,
        }
    }

    /// Reinitialize in place after life runs out. Size and `max_life` survive.
    pub fn respawn(&mut self, bounds: Viewport, palette: Palette, rng: &mut Rng) {
        self.position = bounds.random_point(rng);
        self.velocity = random_velocity(rng);
        self.life = self.max_life;
        self.hue = palette.sample(rng);
    }

    /// Advance one frame. Returns true when life is exhausted and the particle
    /// must be respawned before it is drawn.
    pub fn tick(&mut self, frame: &FrameSnapshot, kin: &Kinematics) -> bool {
        self.position += self.velocity;

        let bounds = frame.bounds;
        if self.position.x < 0.0 || self.position.x > bounds.width {
            self.velocity.x = -self.velocity.x;
            self.position.x = self.position.x.clamp(0.0, bounds.width);
        }
        if self.position.y < 0.0 || self.position.y > bounds.height {
            self.velocity.y = -self.velocity.y;
            self.position.y = self.position.y.clamp(0.0, bounds.height);
        }

        self.life = self.life.saturating_sub(1);
        self.opacity = self.life_ratio() * 0.5 + 0.1;

        // Pointer exactly on the particle has no direction: no force.
        let to_pointer = frame.pointer - self.position;
        let distance = to_pointer.length();
        if distance > 0.0 && distance < kin.pointer_radius {
            let force = (kin.pointer_radius - distance) / kin.pointer_radius;
            self.velocity += to_pointer / distance * force * kin.pointer_strength;
            self.opacity = (self.opacity + force * kin.pointer_opacity_boost).min(1.0);
        }

        self.velocity *= kin.damping;

        self.life == 0
    }

    pub fn life_ratio(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }

    pub fn color(&self) -> Rgb {
        Rgb::from_hue(self.hue)
    }

    /// Render slot contents for this particle.
    pub fn instance(&self) -> ParticleInstance {
        ParticleInstance::new(self.position.x, self.position.y, self.size, self.color(), self.opacity)
    }
}

fn random_velocity(rng: &mut Rng) -> Vec2 {
    Vec2::new(
        rng.range(-Particle::SPEED..Particle::SPEED),
        rng.range(-Particle::SPEED..Particle::SPEED),
    )
}
