//! Circle and Tutte (barycentric) layouts.
//!
//! Tutte pins the anchors, the nodes outside the layout set that links
//! lead to, on a circle with [`circle`], then repeatedly moves each movable
//! node to the mean position of its linked neighbours.  All moves within
//! one step read the positions from before the step.

use tracing::debug;
use tw_core::geom::heading_sin_cos;
use tw_topology::Bounds;

use crate::graph::{LayoutGraph, Placement};

/// Largest per-axis move a single Tutte step may make.
pub const TUTTE_STEP_LIMIT: f64 = 100.0;

// ── Circle ────────────────────────────────────────────────────────────────────

/// `count` placements evenly spaced around the patch at the middle of the
/// world, `radius` away from it.
///
/// Headings are whole degrees (`i * 360 / count`, rounded down), so the
/// spacing is only even when `count` divides 360.  Positions are not
/// wrapped: a radius reaching past the world's edge yields coordinates
/// outside the bounds, and the caller decides whether to wrap or reject
/// them.
pub fn circle(count: usize, radius: f64, bounds: &Bounds) -> Vec<Placement> {
    let mid_x = (bounds.min_pxcor + bounds.width() / 2) as f64;
    let mid_y = (bounds.min_pycor + bounds.height() / 2) as f64;
    (0..count)
        .map(|i| {
            let heading = ((i * 360) / count) as f64;
            let (sin, cos) = heading_sin_cos(heading);
            Placement { x: mid_x + radius * sin, y: mid_y + radius * cos, heading }
        })
        .collect()
}

// ── Tutte ─────────────────────────────────────────────────────────────────────

/// Outcome of [`tutte`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TutteReport {
    /// Steps actually run.
    pub iterations: usize,
    /// Largest per-axis move made in the last step.
    pub last_step:  f64,
    /// `true` if the last step moved no node further than `epsilon`.
    pub converged:  bool,
}

/// One Tutte step.  Returns the largest per-axis displacement made.
///
/// A movable node with no links stays where it is.
pub fn tutte_step(positions: &mut [[f64; 2]], graph: &LayoutGraph, bounds: &Bounds) -> f64 {
    let n = graph.movable.min(positions.len());
    let mut sum = vec![[0.0f64; 2]; n];
    let mut degree = vec![0usize; n];
    for (a, b) in graph.edges_within(positions.len()) {
        if a < n {
            sum[a][0] += positions[b][0];
            sum[a][1] += positions[b][1];
            degree[a] += 1;
        }
        if b < n {
            sum[b][0] += positions[a][0];
            sum[b][1] += positions[a][1];
            degree[b] += 1;
        }
    }

    let mut moved = 0.0f64;
    let next: Vec<Option<[f64; 2]>> = (0..n)
        .map(|i| {
            if degree[i] == 0 {
                return None;
            }
            let [x, y] = positions[i];
            let k = degree[i] as f64;
            let fx = (sum[i][0] / k - x).clamp(-TUTTE_STEP_LIMIT, TUTTE_STEP_LIMIT);
            let fy = (sum[i][1] / k - y).clamp(-TUTTE_STEP_LIMIT, TUTTE_STEP_LIMIT);
            let nx = (x + fx).clamp(bounds.min_pxcor as f64, bounds.max_pxcor as f64);
            let ny = (y + fy).clamp(bounds.min_pycor as f64, bounds.max_pycor as f64);
            moved = moved.max((nx - x).abs()).max((ny - y).abs());
            Some([nx, ny])
        })
        .collect();

    for (pos, p) in positions.iter_mut().zip(next) {
        if let Some(p) = p {
            *pos = p;
        }
    }
    moved
}

/// Run [`tutte_step`] until a step moves no node further than `epsilon`
/// on either axis, or `max_iterations` steps have run.
///
/// Anchors must already be in place (see [`LayoutGraph::anchors`] and
/// [`circle`]).
pub fn tutte(
    positions:      &mut [[f64; 2]],
    graph:          &LayoutGraph,
    bounds:         &Bounds,
    max_iterations: usize,
    epsilon:        f64,
) -> TutteReport {
    let mut report = TutteReport { iterations: 0, last_step: 0.0, converged: false };
    while report.iterations < max_iterations {
        report.last_step = tutte_step(positions, graph, bounds);
        report.iterations += 1;
        if report.last_step <= epsilon {
            report.converged = true;
            break;
        }
    }
    debug!(
        nodes      = graph.movable,
        iterations = report.iterations,
        last_step  = report.last_step,
        converged  = report.converged,
        "tutte layout"
    );
    report
}
