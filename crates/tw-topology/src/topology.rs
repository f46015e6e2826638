//! 2D wrap-around geometry.
//!
//! # Conventions
//!
//! - Turtle x coordinates live in `[min_pxcor - 0.5, max_pxcor + 0.5)`,
//!   and likewise for y.  On a wrapping axis any real value is folded into
//!   that range; on a non-wrapping axis leaving it is a domain error.
//! - Distances and headings between points take the shortest route on the
//!   wrapped manifold: on each wrapping axis the delta is replaced by the
//!   one obtained by adding or subtracting one world width, whichever is
//!   smaller in magnitude.
//! - Neighborhoods are listed in the order N, E, S, W, NE, SE, SW, NW
//!   (first four only for the 4-neighborhood).  They never contain the
//!   patch itself or duplicates, so tiny wrapping worlds (width or height
//!   1 or 2) get fewer neighbors.

use tw_core::geom::{self, heading_from_delta};
use tw_core::{EngineError, EngineResult, PatchId, WorldConfig};

use crate::Bounds;

/// Which axes wrap.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TopologyKind {
    /// Both axes wrap.
    Torus,
    /// Only x wraps (the world is a cylinder standing upright).
    VertCylinder,
    /// Only y wraps.
    HorizCylinder,
    /// Nothing wraps.
    Box,
}

impl TopologyKind {
    pub fn from_wrap(wrap_x: bool, wrap_y: bool) -> Self {
        match (wrap_x, wrap_y) {
            (true, true)   => TopologyKind::Torus,
            (true, false)  => TopologyKind::VertCylinder,
            (false, true)  => TopologyKind::HorizCylinder,
            (false, false) => TopologyKind::Box,
        }
    }

    #[inline]
    pub fn wraps_x(self) -> bool {
        matches!(self, TopologyKind::Torus | TopologyKind::VertCylinder)
    }

    #[inline]
    pub fn wraps_y(self) -> bool {
        matches!(self, TopologyKind::Torus | TopologyKind::HorizCylinder)
    }
}

/// 8-neighborhood offsets in enumeration order: N, E, S, W, NE, SE, SW, NW.
pub const MOORE: [(i32, i32); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// 4-neighborhood offsets: N, E, S, W.
pub const VON_NEUMANN: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// A world's grid geometry.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topology {
    kind:   TopologyKind,
    bounds: Bounds,
}

impl Topology {
    pub fn new(kind: TopologyKind, bounds: Bounds) -> Self {
        Topology { kind, bounds }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Topology::new(
            TopologyKind::from_wrap(config.wrap_x, config.wrap_y),
            Bounds::from_config(config),
        )
    }

    #[inline]
    pub fn kind(&self) -> TopologyKind {
        self.kind
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    fn width_f(&self) -> f64 {
        self.bounds.width() as f64
    }

    #[inline]
    fn height_f(&self) -> f64 {
        self.bounds.height() as f64
    }

    // ── Wrapping ──────────────────────────────────────────────────────────

    /// Fold `x` into the world on a wrapping axis.  Beyond a non-wrapping
    /// edge it fails with [`EngineError::BeyondEdge`]; a non-finite `x` is
    /// a domain error on every topology.
    pub fn wrap_x(&self, x: f64) -> EngineResult<f64> {
        let x = geom::finite(x, "xcor")?;
        let (min, max) = (self.bounds.min_x(), self.bounds.max_x());
        if self.kind.wraps_x() {
            Ok(geom::wrap(x, min, max))
        } else if x >= max || x < min {
            Err(EngineError::BeyondEdge)
        } else {
            Ok(x)
        }
    }

    pub fn wrap_y(&self, y: f64) -> EngineResult<f64> {
        let y = geom::finite(y, "ycor")?;
        let (min, max) = (self.bounds.min_y(), self.bounds.max_y());
        if self.kind.wraps_y() {
            Ok(geom::wrap(y, min, max))
        } else if y >= max || y < min {
            Err(EngineError::BeyondEdge)
        } else {
            Ok(y)
        }
    }

    /// Fold an integer patch x coordinate, `None` off a non-wrapping edge.
    #[inline]
    pub fn wrap_pxcor(&self, pxcor: i32) -> Option<i32> {
        let b = &self.bounds;
        if (b.min_pxcor..=b.max_pxcor).contains(&pxcor) {
            Some(pxcor)
        } else if self.kind.wraps_x() {
            Some(b.min_pxcor + (pxcor - b.min_pxcor).rem_euclid(b.width()))
        } else {
            None
        }
    }

    #[inline]
    pub fn wrap_pycor(&self, pycor: i32) -> Option<i32> {
        let b = &self.bounds;
        if (b.min_pycor..=b.max_pycor).contains(&pycor) {
            Some(pycor)
        } else if self.kind.wraps_y() {
            Some(b.min_pycor + (pycor - b.min_pycor).rem_euclid(b.height()))
        } else {
            None
        }
    }

    // ── Shortest paths ────────────────────────────────────────────────────

    /// The copy of `x2` nearest to `x1` (itself when x does not wrap).
    pub fn shortest_path_x(&self, x1: f64, x2: f64) -> f64 {
        if !self.kind.wraps_x() {
            return x2;
        }
        let prime = if x1 > x2 { x2 + self.width_f() } else { x2 - self.width_f() };
        if (x2 - x1).abs() > (prime - x1).abs() { prime } else { x2 }
    }

    pub fn shortest_path_y(&self, y1: f64, y2: f64) -> f64 {
        if !self.kind.wraps_y() {
            return y2;
        }
        let prime = if y1 > y2 { y2 + self.height_f() } else { y2 - self.height_f() };
        if (y2 - y1).abs() > (prime - y1).abs() { prime } else { y2 }
    }

    /// Distance from `(x1, y1)` to `(x2, y2)` along the shortest wrapped
    /// route.  Never more than the plain Euclidean distance.
    pub fn distance_wrap(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
        let mut dx = x2 - x1;
        let mut dy = y2 - y1;
        if self.kind.wraps_x() {
            let dx2 = if x1 > x2 { (x2 + self.width_f()) - x1 } else { (x2 - self.width_f()) - x1 };
            if dx2.abs() < dx.abs() {
                dx = dx2;
            }
        }
        if self.kind.wraps_y() {
            let dy2 = if y1 > y2 { (y2 + self.height_f()) - y1 } else { (y2 - self.height_f()) - y1 };
            if dy2.abs() < dy.abs() {
                dy = dy2;
            }
        }
        (dx * dx + dy * dy).sqrt()
    }

    /// Heading from `(x1, y1)` towards `(x2, y2)` along the shortest
    /// wrapped route.  Errors when the points coincide.
    pub fn towards_wrap(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> EngineResult<f64> {
        let mut dx = x2 - x1;
        let mut dy = y2 - y1;
        if self.kind.wraps_x() {
            let half = self.width_f() / 2.0;
            dx = geom::wrap(dx, -half, half);
        }
        if self.kind.wraps_y() {
            let half = self.height_f() / 2.0;
            dy = geom::wrap(dy, -half, half);
        }
        heading_from_delta(dx, dy, x1, y1)
    }

    // ── Patch lookup ──────────────────────────────────────────────────────

    /// Patch containing the point, `None` beyond a non-wrapping edge.
    pub fn patch_at(&self, x: f64, y: f64) -> Option<PatchId> {
        let x = self.wrap_x(x).ok()?;
        let y = self.wrap_y(y).ok()?;
        self.bounds.patch_id(round_coord(x), round_coord(y))
    }

    /// Patch at integer coordinates after wrapping.
    #[inline]
    pub fn patch_at_coords(&self, pxcor: i32, pycor: i32) -> Option<PatchId> {
        self.bounds.patch_id(self.wrap_pxcor(pxcor)?, self.wrap_pycor(pycor)?)
    }

    // ── Neighborhoods ─────────────────────────────────────────────────────

    /// Distinct patches other than `p` at the given offsets, in offset
    /// order.
    pub fn neighbors_at(&self, p: PatchId, offsets: &[(i32, i32)]) -> Vec<PatchId> {
        let (px, py) = self.bounds.coords(p);
        let mut out = Vec::with_capacity(offsets.len());
        for (dx, dy) in offsets {
            if let Some(n) = self.patch_at_coords(px + dx, py + dy) {
                if n != p && !out.contains(&n) {
                    out.push(n);
                }
            }
        }
        out
    }

    /// The 8-neighborhood of `p`: N, E, S, W, NE, SE, SW, NW.
    #[inline]
    pub fn neighbors8(&self, p: PatchId) -> Vec<PatchId> {
        self.neighbors_at(p, &MOORE)
    }

    /// The 4-neighborhood of `p`: N, E, S, W.
    #[inline]
    pub fn neighbors4(&self, p: PatchId) -> Vec<PatchId> {
        self.neighbors_at(p, &VON_NEUMANN)
    }
}

/// Round a turtle coordinate to the nearest patch centre (halves go up).
#[inline]
pub fn round_coord(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}
