//! Line quads for links and constellation lines.

use super::color::Rgb;
use super::instance::LineVertex;

/// Vertices per line quad (two triangles).
pub const LINE_VERTICES: usize = 6;

/// Endpoint style for a line: color and alpha at that end.
#[derive(Debug, Clone, Copy)]
pub struct LineEnd {
    pub pos: [f32; 2],
    pub color: Rgb,
    pub alpha: f32,
}

/// Build a `width`-pixel quad from `a` to `b` as a triangle list, colors
/// interpolated along the line. Always [`LINE_VERTICES`] long; a zero-length
/// line collapses to a point.
pub fn line_quad(a: LineEnd, b: LineEnd, width: f32, twinkle_delay: f32) -> Vec<LineVertex> {
    let dx = b.pos[0] - a.pos[0];
    let dy = b.pos[1] - a.pos[1];
    let len = (dx * dx + dy * dy).sqrt().max(0.001);
    let half = width * 0.5;
    let perp = [-dy / len * half, dx / len * half];

    let vertex = |end: &LineEnd, sign: f32| LineVertex {
        x: end.pos[0] + perp[0] * sign,
        y: end.pos[1] + perp[1] * sign,
        r: end.color.r,
        g: end.color.g,
        b: end.color.b,
        a: end.alpha,
        twinkle_delay,
    };

    strip_to_triangles(&[vertex(&a, 1.0), vertex(&a, -1.0), vertex(&b, 1.0), vertex(&b, -1.0)])
}

/// Convert triangle strip vertices to a triangle list.
pub fn strip_to_triangles<T: Copy>(strip: &[T]) -> Vec<T> {
    if strip.len() < 3 {
        return Vec::new();
    }
    let num_tris = strip.len() - 2;
    let mut out = Vec::with_capacity(num_tris * 3);
    for i in 0..num_tris {
        let (a, b, c) = if i % 2 == 0 {
            (i, i + 1, i + 2)
        } else {
            (i + 1, i, i + 2)
        };
        out.extend_from_slice(&[strip[a], strip[b], strip[c]]);
    }
    out
}
