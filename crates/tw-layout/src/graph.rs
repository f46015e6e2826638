//! The index-based graph view every layout consumes.

use rustc_hash::FxHashSet;

/// Nodes and edges handed to a layout.
///
/// Node indices `0..movable` are the turtles being laid out, in the order
/// the caller wants them processed (normally shufflerator order).  Indices
/// at or above `movable` are endpoints of links that leave the node set:
/// their positions are read but never written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutGraph {
    pub movable: usize,
    pub edges:   Vec<(usize, usize)>,
}

impl LayoutGraph {
    pub fn new(movable: usize, edges: Vec<(usize, usize)>) -> Self {
        LayoutGraph { movable, edges }
    }

    /// Per movable node, the number of edge endpoints that land on it.
    pub fn degrees(&self) -> Vec<usize> {
        let mut deg = vec![0usize; self.movable];
        for &(a, b) in &self.edges {
            if let Some(d) = deg.get_mut(a) {
                *d += 1;
            }
            if let Some(d) = deg.get_mut(b) {
                *d += 1;
            }
        }
        deg
    }

    /// Fixed endpoints in first-seen edge order (`end1` before `end2`),
    /// without repeats.  Tutte pins these on a circle.
    pub fn anchors(&self) -> Vec<usize> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for &(a, b) in &self.edges {
            for end in [a, b] {
                if end >= self.movable && seen.insert(end) {
                    out.push(end);
                }
            }
        }
        out
    }

    /// Edges whose both endpoints index into a position slice of length
    /// `len`.
    pub(crate) fn edges_within(&self, len: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied().filter(move |&(a, b)| a < len && b < len)
    }
}

/// Where a layout wants a turtle: a position plus the heading it should
/// face.  Circle and radial layouts set both.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    pub x:       f64,
    pub y:       f64,
    pub heading: f64,
}
