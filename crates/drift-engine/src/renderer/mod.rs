pub mod color;
pub mod geometry;
pub mod instance;

pub use color::Rgb;
pub use instance::{InstanceBuffer, LineVertex, ParticleInstance, StarInstance};
