use bytemuck::{Pod, Zeroable};

use super::color::Rgb;

/// Per-particle render data read by the JavaScript renderer straight out of wasm memory.
/// Must match the page-side layout: 8 floats = 32 bytes stride.
///
/// One slot per swarm particle, at the particle's index. Burst particles use
/// the same layout in their own buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// X position in surface pixels.
    pub x: f32,
    /// Y position in surface pixels.
    pub y: f32,
    /// Rendered diameter in pixels.
    pub size: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Glow (box-shadow) radius in pixels.
    pub glow: f32,
}

impl ParticleInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn new(x: f32, y: f32, size: f32, color: Rgb, alpha: f32) -> Self {
        Self {
            x,
            y,
            size,
            r: color.r,
            g: color.g,
            b: color.b,
            alpha,
            glow: size * 2.0,
        }
    }
}

/// Constellation star: 4 floats = 16 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Seconds before the star's twinkle cycle starts.
    pub twinkle_delay: f32,
}

impl StarInstance {
    pub const FLOATS: usize = 4;
}

/// Line vertex for links and constellation lines (triangle list).
/// 7 floats per vertex (x, y, r, g, b, a, twinkle_delay).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    /// Seconds before the line's twinkle starts; 0 for swarm links.
    pub twinkle_delay: f32,
}

impl LineVertex {
    pub const FLOATS: usize = 7;
}

/// Flat instance buffer plus the raw accessors the wasm bridge hands to JavaScript.
#[derive(Debug, Clone)]
pub struct InstanceBuffer<T: Pod> {
    items: Vec<T>,
}

impl<T: Pod> InstanceBuffer<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn extend_from_slice(&mut self, items: &[T]) {
        self.items.extend_from_slice(items);
    }

    /// Drop every slot at or past `len`.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.items.get_mut(idx)
    }

    /// Flat float view of the buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.items)
    }

    /// Raw pointer to the instance data for direct reads from JavaScript.
    pub fn as_ptr(&self) -> *const f32 {
        self.items.as_ptr() as *const f32
    }
}

impl<T: Pod> Default for InstanceBuffer<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
