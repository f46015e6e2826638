//! Radial tree layout.
//!
//! A breadth-first walk from the root builds a spanning tree; each node is
//! then given an angular sector of its parent's sector in proportion to a
//! subtree weight, and placed on the ring for its depth.  The root sits at
//! the centre of the world.

use std::collections::VecDeque;

use tracing::debug;
use tw_topology::Bounds;

use crate::graph::Placement;

struct TreeNode {
    children: Vec<usize>,
    depth:    usize,
    weight:   f64,
    angle:    f64,
}

/// Radial placement of the nodes `0..count` reachable from `root`.
///
/// `neighbors(i)` lists the nodes linked to `i`; indices at or above
/// `count` are outside the layout and ignored.  Children are ordered as
/// `neighbors` lists them.  Unreachable nodes get `None` and stay where
/// they are.  Returns all `None` if `root` is not below `count`.
pub fn radial(
    count:         usize,
    root:          usize,
    mut neighbors: impl FnMut(usize) -> Vec<usize>,
    bounds:        &Bounds,
) -> Vec<Option<Placement>> {
    let mut out = vec![None; count];
    if root >= count {
        return out;
    }

    // ── Spanning tree, in BFS order ──────────────────────────────────────
    let mut slot: Vec<Option<usize>> = vec![None; count];
    let mut tree: Vec<(usize, TreeNode)> = Vec::new();
    let mut queue = VecDeque::new();
    slot[root] = Some(0);
    tree.push((root, TreeNode { children: Vec::new(), depth: 0, weight: 0.0, angle: 0.0 }));
    queue.push_back(0usize);

    while let Some(at) = queue.pop_front() {
        let node = tree[at].0;
        let depth = tree[at].1.depth;
        for next in neighbors(node) {
            if next >= count || slot[next].is_some() {
                continue;
            }
            let child = tree.len();
            slot[next] = Some(child);
            tree.push((next, TreeNode {
                children: Vec::new(),
                depth:    depth + 1,
                weight:   0.0,
                angle:    0.0,
            }));
            tree[at].1.children.push(child);
            queue.push_back(child);
        }
    }

    // ── Weights, children before parents ─────────────────────────────────
    for at in (0..tree.len()).rev() {
        let own = (tree[at].1.children.len() + 1) as f64;
        let heaviest = tree[at].1.children.iter().map(|&c| tree[c].1.weight).fold(0.0, f64::max);
        tree[at].1.weight = own.max(heaviest * 0.8);
    }

    // ── Sectors, parents before children ─────────────────────────────────
    let mut arcs = vec![(0.0f64, 360.0f64); tree.len()];
    for at in 0..tree.len() {
        let (start, end) = arcs[at];
        tree[at].1.angle = (start + end) / 2.0;
        let total: f64 = tree[at].1.children.iter().map(|&c| tree[c].1.weight).sum();
        let mut from = start;
        for &c in &tree[at].1.children {
            let to = from + (end - start) * tree[c].1.weight / total;
            arcs[c] = (from, to);
            from = to;
        }
    }

    // ── Rings ────────────────────────────────────────────────────────────
    let root_x = (bounds.min_pxcor + bounds.max_pxcor) as f64 / 2.0;
    let root_y = (bounds.min_pycor + bounds.max_pycor) as f64 / 2.0;
    let deepest = tree.last().map_or(0, |(_, n)| n.depth);
    let max_depth = (deepest as f64 + 0.2).max(1.0);
    let to_edge_x = (bounds.max_pxcor as f64 - root_x).min(root_x - bounds.min_pxcor as f64);
    let to_edge_y = (bounds.max_pycor as f64 - root_y).min(root_y - bounds.min_pycor as f64);
    let gap = to_edge_x.min(to_edge_y) / max_depth;

    for (node, t) in &tree {
        let (sin, cos) = tw_core::geom::heading_sin_cos(t.angle);
        let r = t.depth as f64 * gap;
        out[*node] = Some(Placement { x: root_x + r * sin, y: root_y + r * cos, heading: t.angle });
    }
    debug!(placed = tree.len(), depth = deepest, gap, "radial layout");
    out
}
