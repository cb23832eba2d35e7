//! Proximity links between swarm particles.
//!
//! The link set is throwaway: every sampling pass discards the previous set
//! (and its vertices) and rebuilds it from scratch.

use crate::renderer::geometry::{line_quad, LineEnd, LINE_VERTICES};
use crate::renderer::instance::{InstanceBuffer, LineVertex};
use crate::systems::particle::Particle;

/// Link thickness in pixels.
pub const LINK_WIDTH: f32 = 1.0;

/// A link between particles `a` and `b` (indices into the swarm, `a < b`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub opacity: f32,
}

/// Current link set plus its rendered vertices.
#[derive(Debug, Default)]
pub struct ConnectionSet {
    links: Vec<Connection>,
    vertices: InstanceBuffer<LineVertex>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all links and link every unordered pair closer than `max_distance`.
    /// Link opacity is `(max_distance - d) / max_distance * opacity_scale`.
    pub fn rebuild(&mut self, particles: &[Particle], max_distance: f32, opacity_scale: f32) {
        self.clear();
        for (i, p1) in particles.iter().enumerate() {
            for (j, p2) in particles.iter().enumerate().skip(i + 1) {
                let distance = p1.position.distance(p2.position);
                if distance < max_distance {
                    let opacity = (max_distance - distance) / max_distance * opacity_scale;
                    self.links.push(Connection { a: i, b: j, distance, opacity });
                    self.vertices.extend_from_slice(&link_vertices(p1, p2, opacity));
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.links.clear();
        self.vertices.clear();
    }

    /// Drop links touching particles at or past `len` (after a shrink).
    /// Surviving quads keep the geometry from their sampling pass.
    pub fn forget_from(&mut self, len: usize) {
        if self.links.iter().all(|c| c.b < len) {
            return;
        }
        let kept: Vec<LineVertex> = self
            .links
            .iter()
            .zip(self.vertices.as_slice().chunks(LINE_VERTICES))
            .filter(|(c, _)| c.b < len)
            .flat_map(|(_, quad)| quad.iter().copied())
            .collect();
        self.links.retain(|c| c.b < len);
        self.vertices.clear();
        self.vertices.extend_from_slice(&kept);
    }

    pub fn links(&self) -> &[Connection] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn vertices(&self) -> &InstanceBuffer<LineVertex> {
        &self.vertices
    }
}

fn link_vertices(p1: &Particle, p2: &Particle, opacity: f32) -> Vec<LineVertex> {
    let end = |p: &Particle| LineEnd {
        pos: p.position.to_array(),
        color: p.color(),
        alpha: opacity,
    };
    line_quad(end(p1), end(p2), LINK_WIDTH, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn at(x: f32, y: f32, hue: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size: 3.0,
            hue,
            opacity: 0.5,
            life: 10,
            max_life: 10,
        }
    }

    #[test]
    fn links_pairs_strictly_inside_threshold() {
        let particles = vec![
            at(0.0, 0.0, 200.0),
            at(60.0, 0.0, 210.0),   // 60 from #0
            at(120.0, 0.0, 220.0),  // exactly 120 from #0, 60 from #1
            at(1000.0, 0.0, 230.0), // isolated
        ];
        let mut set = ConnectionSet::new();
        set.rebuild(&particles, 120.0, 0.3);
        let pairs: Vec<(usize, usize)> = set.links().iter().map(|c| (c.a, c.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2)]);
        assert_eq!(set.vertices().len(), 2 * LINE_VERTICES);
    }

    #[test]
    fn opacity_fades_with_distance() {
        let particles = vec![at(0.0, 0.0, 200.0), at(60.0, 0.0, 250.0)];
        let mut set = ConnectionSet::new();
        set.rebuild(&particles, 120.0, 0.3);
        assert!((set.links()[0].opacity - 0.15).abs() < 1e-6);
        let verts = set.vertices().as_slice();
        assert!((verts[0].a - 0.15).abs() < 1e-6);
        assert_eq!(verts[0].r, particles[0].color().r);
        assert_eq!(verts[2].r, particles[1].color().r);
    }

    #[test]
    fn rebuild_discards_previous_pass() {
        let mut particles = vec![at(0.0, 0.0, 200.0), at(10.0, 0.0, 200.0)];
        let mut set = ConnectionSet::new();
        set.rebuild(&particles, 120.0, 0.3);
        assert_eq!(set.len(), 1);
        particles[1].position.x = 500.0;
        set.rebuild(&particles, 120.0, 0.3);
        assert!(set.is_empty());
        assert!(set.vertices().is_empty());
    }

    #[test]
    fn count_matches_brute_force() {
        let mut rng = crate::core::rng::Rng::new(17);
        let bounds = crate::api::types::Viewport::new(400.0, 300.0);
        let particles: Vec<Particle> = (0..60)
            .map(|_| Particle::spawn(bounds, crate::api::types::Palette::OCEAN, &mut rng))
            .collect();
        let mut expected = 0;
        for i in 0..particles.len() {
            for j in i + 1..particles.len() {
                if particles[i].position.distance(particles[j].position) < 120.0 {
                    expected += 1;
                }
            }
        }
        let mut set = ConnectionSet::new();
        set.rebuild(&particles, 120.0, 0.3);
        assert_eq!(set.len(), expected);
    }

    #[test]
    fn forget_from_drops_tail_links() {
        let particles = vec![at(0.0, 0.0, 200.0), at(10.0, 0.0, 200.0), at(20.0, 0.0, 200.0)];
        let mut set = ConnectionSet::new();
        set.rebuild(&particles, 120.0, 0.3);
        assert_eq!(set.len(), 3);
        set.forget_from(2);
        assert_eq!(set.len(), 1);
        assert_eq!(set.vertices().len(), LINE_VERTICES);
    }

    #[test]
    fn forget_from_leaves_surviving_quads_in_place() {
        let mut particles = vec![
            at(0.0, 0.0, 200.0),
            at(10.0, 0.0, 210.0),
            at(20.0, 0.0, 220.0),
            at(30.0, 0.0, 230.0),
        ];
        let mut set = ConnectionSet::new();
        set.rebuild(&particles, 120.0, 0.3);
        let before: Vec<LineVertex> = set
            .links()
            .iter()
            .zip(set.vertices().as_slice().chunks(LINE_VERTICES))
            .filter(|(c, _)| c.b < 3)
            .flat_map(|(_, quad)| quad.iter().copied())
            .collect();

        // Particles drift between sampling passes.
        particles[0].position.x = 5.0;
        particles[1].hue = 250.0;
        set.forget_from(3);

        assert_eq!(set.len(), 3);
        assert_eq!(set.vertices().as_slice(), &before[..]);
    }
}
