pub mod api;
pub mod core;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::backdrop::Backdrop;
pub use api::config::{
    CapacityBand, CapacityBands, ConfigError, ConnectionCadence, ConstellationConfig,
    FieldConfig, PerformanceConfig,
};
pub use api::field::ParticleField;
pub use api::types::{FrameSnapshot, Palette, Theme, Viewport};
pub use core::rng::Rng;
pub use core::schedule::{FrameId, FrameLane, FrameScheduler, FrameSource, ManualFrames};
pub use core::time::FpsMonitor;
pub use input::event::HostEvent;
pub use renderer::color::Rgb;
pub use renderer::instance::{InstanceBuffer, LineVertex, ParticleInstance, StarInstance};
pub use systems::burst::{BurstParticle, BurstSet};
pub use systems::connection::{Connection, ConnectionSet};
pub use systems::constellation::{Constellation, ConstellationLine, Star};
pub use systems::particle::{Kinematics, Particle};
