//! Force-directed spring layout in two and three dimensions.
//!
//! One call is one relaxation step.  Every link pulls (or pushes) its ends
//! toward `spring_length` like a Hookean spring, and every pair of movable
//! nodes repels with an inverse-square force.  Both forces are divided by
//! the mean degree of the pair so hubs do not jitter.
//!
//! # Step order and random draws
//!
//! 1. Spring forces, in edge order (no draws).
//! 2. Pairwise repulsion over `i < j`.  Coincident pairs, and pairs so close
//!    that the inverse-square force overflows, are pushed apart in a random
//!    direction: one `next_double` in 2D, two in 3D.
//! 3. When more than one node moves, node 0 gets a tiny random nudge (one
//!    `next_double` per axis) so perfectly collinear layouts can escape
//!    their line.
//! 4. Each axis of the net force is capped at a world-size-relative limit,
//!    and the new position is clamped to the patch-centre range of the
//!    world.
//!
//! Distances are plain Euclidean, never wrapped.

use tracing::trace;
use tw_core::WorldRng;
use tw_topology::{Bounds, Bounds3d};

use crate::graph::LayoutGraph;

/// Spring layout tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringParams {
    /// Stiffness of each link.
    pub spring_constant: f64,
    /// Rest length of each link.
    pub spring_length:   f64,
    /// Strength of the pairwise repulsion.
    pub repulsion:       f64,
}

impl SpringParams {
    pub fn new(spring_constant: f64, spring_length: f64, repulsion: f64) -> Self {
        SpringParams { spring_constant, spring_length, repulsion }
    }
}

// ── Space ─────────────────────────────────────────────────────────────────────

/// What the relaxation step needs to know about the world it runs in.
trait SpringSpace<const D: usize> {
    /// World width plus height; scales the perturbation nudge.
    fn planar_extent(&self) -> f64;

    /// Per-axis cap on a single step's displacement.
    fn step_limit(&self) -> f64;

    fn clamp(&self, p: [f64; D]) -> [f64; D];

    /// Repulsion vector for a coincident pair.
    fn push_off(&self, repulsion: f64, div: f64, rng: &mut WorldRng) -> [f64; D];
}

impl SpringSpace<2> for Bounds {
    fn planar_extent(&self) -> f64 {
        (self.width() + self.height()) as f64
    }

    fn step_limit(&self) -> f64 {
        (self.width() + self.height()) as f64 / 50.0
    }

    fn clamp(&self, p: [f64; 2]) -> [f64; 2] {
        [
            p[0].clamp(self.min_pxcor as f64, self.max_pxcor as f64),
            p[1].clamp(self.min_pycor as f64, self.max_pycor as f64),
        ]
    }

    fn push_off(&self, repulsion: f64, div: f64, rng: &mut WorldRng) -> [f64; 2] {
        let (sin, cos) = (360.0 * rng.next_double()).to_radians().sin_cos();
        [-(repulsion / div * sin), -(repulsion / div * cos)]
    }
}

impl SpringSpace<3> for Bounds3d {
    fn planar_extent(&self) -> f64 {
        (self.width() + self.height()) as f64
    }

    fn step_limit(&self) -> f64 {
        (self.width() + self.height() + self.depth()) as f64 / 75.0
    }

    fn clamp(&self, p: [f64; 3]) -> [f64; 3] {
        [
            p[0].clamp(self.min_pxcor as f64, self.max_pxcor as f64),
            p[1].clamp(self.min_pycor as f64, self.max_pycor as f64),
            p[2].clamp(self.min_pzcor as f64, self.max_pzcor as f64),
        ]
    }

    // Uniform on the sphere of radius `repulsion`; not divided by degree.
    fn push_off(&self, repulsion: f64, _div: f64, rng: &mut WorldRng) -> [f64; 3] {
        let angle = 360.0 * rng.next_double();
        let z = repulsion * (2.0 * rng.next_double() - 1.0);
        let flat = (repulsion * repulsion - z * z).sqrt();
        let (sin, cos) = angle.to_radians().sin_cos();
        [-(flat * sin), -(flat * cos), -z]
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// One spring step over a 2D world.
///
/// `positions` holds every node the graph mentions; only `0..movable` are
/// written.
pub fn spring_2d(
    positions: &mut [[f64; 2]],
    graph:     &LayoutGraph,
    params:    &SpringParams,
    bounds:    &Bounds,
    rng:       &mut WorldRng,
) {
    relax(positions, graph, params, bounds, rng);
}

/// One spring step over a 3D world.
pub fn spring_3d(
    positions: &mut [[f64; 3]],
    graph:     &LayoutGraph,
    params:    &SpringParams,
    bounds:    &Bounds3d,
    rng:       &mut WorldRng,
) {
    relax(positions, graph, params, bounds, rng);
}

// ── Relaxation ────────────────────────────────────────────────────────────────

fn distance<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter().zip(b).map(|(p, q)| (q - p) * (q - p)).sum::<f64>().sqrt()
}

fn mean_degree(deg: &[usize], a: usize, b: usize) -> f64 {
    let da = deg.get(a).copied().unwrap_or(0);
    let db = deg.get(b).copied().unwrap_or(0);
    ((da + db) as f64 / 2.0).max(1.0)
}

fn relax<const D: usize, S: SpringSpace<D>>(
    positions: &mut [[f64; D]],
    graph:     &LayoutGraph,
    params:    &SpringParams,
    space:     &S,
    rng:       &mut WorldRng,
) {
    let n = graph.movable.min(positions.len());
    if n == 0 {
        return;
    }
    let deg = graph.degrees();
    let mut force = vec![[0.0f64; D]; n];

    for (a, b) in graph.edges_within(positions.len()) {
        let div = mean_degree(&deg, a, b);
        let (p1, p2) = (positions[a], positions[b]);
        let dist = distance(&p1, &p2);
        let mut d = [0.0f64; D];
        if dist == 0.0 {
            // Arbitrary push along x.
            d[0] = params.spring_constant * params.spring_length / div;
        } else {
            let f = params.spring_constant * (dist - params.spring_length) / div;
            for k in 0..D {
                d[k] = f * (p2[k] - p1[k]) / dist;
            }
        }
        if a < n {
            for k in 0..D {
                force[a][k] += d[k];
            }
        }
        if b < n {
            for k in 0..D {
                force[b][k] -= d[k];
            }
        }
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let div = mean_degree(&deg, i, j);
            let (p1, p2) = (positions[i], positions[j]);
            let dist = distance(&p1, &p2);
            let f = params.repulsion / (dist * dist) / div;
            let d = if p1 == p2 || !f.is_finite() {
                space.push_off(params.repulsion, div, rng)
            } else {
                let mut d = [0.0f64; D];
                for k in 0..D {
                    d[k] = -(f * ((p2[k] - p1[k]) / dist));
                }
                d
            };
            for k in 0..D {
                force[i][k] += d[k];
                force[j][k] -= d[k];
            }
        }
    }

    if n > 1 {
        let amount = space.planar_extent() / 1.0e10;
        for k in 0..D {
            force[0][k] += rng.next_double() * amount - amount / 2.0;
        }
    }

    let limit = space.step_limit();
    let mut max_step = 0.0f64;
    for (pos, f) in positions.iter_mut().zip(&force) {
        let mut next = *pos;
        for k in 0..D {
            let step = f[k].clamp(-limit, limit);
            max_step = max_step.max(step.abs());
            next[k] += step;
        }
        *pos = space.clamp(next);
    }
    trace!(nodes = n, edges = graph.edges.len(), max_step, dims = D, "spring step");
}
