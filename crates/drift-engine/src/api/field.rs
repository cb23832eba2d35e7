use glam::Vec2;

use crate::api::config::{ConnectionCadence, FieldConfig};
use crate::api::types::{FrameSnapshot, Palette, Viewport};
use crate::core::rng::Rng;
use crate::core::schedule::{FrameLane, FrameScheduler, FrameSource};
use crate::renderer::instance::{InstanceBuffer, ParticleInstance};
use crate::systems::burst::BurstSet;
use crate::systems::connection::ConnectionSet;
use crate::systems::particle::{Kinematics, Particle};

/// The particle backdrop: a capacity-managed swarm, its proximity links and
/// any live click bursts.
///
/// Particles live in an index-addressed `Vec`; `instances[i]` is the render
/// slot for `particles[i]`, so growing appends both and shrinking truncates
/// both. The field drives itself through the [`FrameSource`] it owns: every
/// swarm frame reschedules the next one until [`pause`](Self::pause) or
/// [`destroy`](Self::destroy).
pub struct ParticleField<F: FrameSource> {
    config: FieldConfig,
    kinematics: Kinematics,
    viewport: Viewport,
    pointer: Vec2,
    palette: Palette,
    /// Target particle count; equals `particles.len()`.
    capacity: usize,
    /// Multiplier applied to the band capacity on resize (performance mode).
    capacity_scale: f32,
    particles: Vec<Particle>,
    instances: InstanceBuffer<ParticleInstance>,
    connections: ConnectionSet,
    bursts: BurstSet,
    rng: Rng,
    frames: F,
    scheduler: FrameScheduler,
    /// Swarm frames run so far.
    frame: u64,
}

impl<F: FrameSource> ParticleField<F> {
    /// Build a field for `viewport`, populate it to capacity and schedule the
    /// first swarm frame.
    pub fn new(viewport: Viewport, config: FieldConfig, frames: F, seed: u64) -> Self {
        let capacity = config.capacity.capacity_for(viewport.width);
        let mut field = ParticleField {
            kinematics: Kinematics::from_config(&config),
            viewport,
            pointer: Vec2::ZERO,
            palette: config.light_palette,
            capacity: 0,
            capacity_scale: 1.0,
            particles: Vec::with_capacity(config.capacity.max_capacity()),
            instances: InstanceBuffer::with_capacity(config.capacity.max_capacity()),
            connections: ConnectionSet::new(),
            bursts: BurstSet::new(),
            rng: Rng::new(seed),
            frames,
            scheduler: FrameScheduler::new(),
            frame: 0,
            config,
        };
        field.grow_to(capacity);
        field.scheduler.schedule(FrameLane::Swarm, &mut field.frames);
        log::info!(
            "particle field: {} particles on {}x{}",
            field.particles.len(),
            viewport.width,
            viewport.height
        );
        field
    }

    /// Advance the swarm one frame: kinematics, synchronous respawn, render
    /// slots, and (on sampling frames) a full link rebuild.
    pub fn tick(&mut self) {
        self.frame += 1;
        let snapshot = self.snapshot();
        for (idx, particle) in self.particles.iter_mut().enumerate() {
            if particle.tick(&snapshot, &self.kinematics) {
                particle.respawn(self.viewport, self.palette, &mut self.rng);
            }
            if let Some(slot) = self.instances.get_mut(idx) {
                *slot = particle.instance();
            }
        }
        if self.sample_connections() {
            self.rebuild_connections();
        }
    }

    /// Discard the link set and relink every pair closer than the connection distance.
    pub fn rebuild_connections(&mut self) {
        self.connections.rebuild(
            &self.particles,
            self.config.connection_distance,
            self.config.connection_opacity,
        );
    }

    /// Advance burst particles one frame. Returns true while any remain.
    pub fn tick_bursts(&mut self) -> bool {
        self.bursts.tick()
    }

    /// Frame callback from the host. Ignores lanes with nothing pending.
    pub fn on_frame(&mut self, lane: FrameLane) {
        if !self.scheduler.is_pending(lane) {
            return;
        }
        self.scheduler.fired(lane);
        match lane {
            FrameLane::Swarm => {
                self.tick();
                self.scheduler.schedule(FrameLane::Swarm, &mut self.frames);
            }
            FrameLane::Burst => {
                if self.tick_bursts() {
                    self.scheduler.schedule(FrameLane::Burst, &mut self.frames);
                }
            }
        }
    }

    /// Store the new viewport and grow or shrink the swarm to the new capacity.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let target = self.target_capacity();
        if target != self.capacity {
            log::debug!("particle field: capacity {} -> {}", self.capacity, target);
        }
        if target > self.particles.len() {
            self.grow_to(target);
        } else if target < self.particles.len() {
            self.particles.truncate(target);
            self.instances.truncate(target);
            self.connections.forget_from(target);
        }
        self.capacity = target;
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
    }

    /// Cancel the pending swarm frame. Bursts keep running.
    pub fn pause(&mut self) {
        if self.scheduler.cancel(FrameLane::Swarm, &mut self.frames) {
            log::debug!("particle field: paused");
        }
    }

    /// Schedule a swarm frame unless one is already pending.
    pub fn resume(&mut self) {
        if self.scheduler.schedule(FrameLane::Swarm, &mut self.frames) {
            log::debug!("particle field: resumed");
        }
    }

    /// Switch palettes: every particle gets a fresh hue from `palette` and its
    /// render slot is refreshed now. Later spawns draw from it too.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        for (idx, particle) in self.particles.iter_mut().enumerate() {
            particle.hue = palette.sample(&mut self.rng);
            if let Some(slot) = self.instances.get_mut(idx) {
                *slot = particle.instance();
            }
        }
        log::debug!("particle field: palette {}..{}", palette.hue_min, palette.hue_max);
    }

    /// Fire-and-forget burst of `count` particles from `(x, y)`.
    pub fn burst(&mut self, x: f32, y: f32, count: usize) {
        self.bursts.emit(
            Vec2::new(x, y),
            count,
            self.config.burst_lifespan,
            self.palette,
            &mut self.rng,
        );
        if !self.bursts.is_empty() {
            self.scheduler.schedule(FrameLane::Burst, &mut self.frames);
        }
    }

    /// Enter performance mode: future capacities are scaled down (applied on
    /// the next resize). One-way and applied once; returns false if already on.
    pub fn degrade(&mut self) -> bool {
        if self.capacity_scale < 1.0 {
            return false;
        }
        self.capacity_scale = self.config.performance.capacity_scale;
        log::info!("particle field: performance mode, capacity scale {:.2}", self.capacity_scale);
        true
    }

    /// Stop both lanes and drop every particle, link and burst with their
    /// render slots. The field is finished after this.
    pub fn destroy(&mut self) {
        for lane in FrameLane::ALL {
            self.scheduler.cancel(lane, &mut self.frames);
        }
        self.particles.clear();
        self.instances.clear();
        self.connections.clear();
        self.bursts.clear();
        self.capacity = 0;
        log::info!("particle field: destroyed");
    }

    // -- Accessors --

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn instances(&self) -> &InstanceBuffer<ParticleInstance> {
        &self.instances
    }

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    pub fn bursts(&self) -> &BurstSet {
        &self.bursts
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Swarm frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Whether a swarm frame is pending (not paused or destroyed).
    pub fn is_running(&self) -> bool {
        self.scheduler.is_pending(FrameLane::Swarm)
    }

    pub fn is_pending(&self, lane: FrameLane) -> bool {
        self.scheduler.is_pending(lane)
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    // -- Internals --

    fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            pointer: self.pointer,
            bounds: self.viewport,
        }
    }

    fn target_capacity(&self) -> usize {
        let band = self.config.capacity.capacity_for(self.viewport.width);
        // Scale factors like 0.7 are not exact in f32; nudge before flooring.
        (band as f32 * self.capacity_scale + 1e-3).floor() as usize
    }

    fn sample_connections(&mut self) -> bool {
        match self.config.connection_cadence {
            ConnectionCadence::Probability { chance } => self.rng.chance(chance),
            ConnectionCadence::Interval { frames } => self.frame % u64::from(frames.max(1)) == 0,
        }
    }

    fn grow_to(&mut self, target: usize) {
        while self.particles.len() < target {
            let particle = Particle::spawn(self.viewport, self.palette, &mut self.rng);
            self.instances.push(particle.instance());
            self.particles.push(particle);
        }
        self.capacity = target;
    }
}
