//! 3D grid geometry.
//!
//! The 3D grid stacks 2D layers along z.  Storage order is layer by layer
//! from `max_pzcor` down, each layer laid out like a 2D world:
//! `index = (max_pzcor - pzcor) * width * height + (max_pycor - pycor) * width
//! + (pxcor - min_pxcor)`.
//!
//! Each axis wraps independently.  Neighborhood enumeration order is the
//! 2D order for the same layer, then up, down, then the 2D order one layer
//! up, then one layer down.

use tw_core::geom;
use tw_core::{EngineError, EngineResult, PatchId};

use crate::topology::MOORE;

/// Face neighbors: N, E, S, W, up, down.
pub const OFFSETS6: [(i32, i32, i32); 6] = [
    (0, 1, 0),
    (1, 0, 0),
    (0, -1, 0),
    (-1, 0, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// All 26 surrounding cells.
pub const OFFSETS26: [(i32, i32, i32); 26] = build26();

const fn build26() -> [(i32, i32, i32); 26] {
    let mut out = [(0, 0, 0); 26];
    let mut i = 0;
    while i < 8 {
        out[i] = (MOORE[i].0, MOORE[i].1, 0);
        out[10 + i] = (MOORE[i].0, MOORE[i].1, 1);
        out[18 + i] = (MOORE[i].0, MOORE[i].1, -1);
        i += 1;
    }
    out[8] = (0, 0, 1);
    out[9] = (0, 0, -1);
    out
}

// ── Bounds3d ──────────────────────────────────────────────────────────────────

/// Inclusive patch-coordinate ranges of a 3D world.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds3d {
    pub min_pxcor: i32,
    pub max_pxcor: i32,
    pub min_pycor: i32,
    pub max_pycor: i32,
    pub min_pzcor: i32,
    pub max_pzcor: i32,
}

impl Bounds3d {
    pub fn centered(max_pxcor: i32, max_pycor: i32, max_pzcor: i32) -> Self {
        Bounds3d {
            min_pxcor: -max_pxcor,
            max_pxcor,
            min_pycor: -max_pycor,
            max_pycor,
            min_pzcor: -max_pzcor,
            max_pzcor,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.max_pxcor - self.min_pxcor + 1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max_pycor - self.min_pycor + 1
    }

    #[inline]
    pub fn depth(&self) -> i32 {
        self.max_pzcor - self.min_pzcor + 1
    }

    #[inline]
    pub fn patch_count(&self) -> usize {
        self.width() as usize * self.height() as usize * self.depth() as usize
    }

    pub fn patch_id(&self, pxcor: i32, pycor: i32, pzcor: i32) -> Option<PatchId> {
        if !(self.min_pxcor..=self.max_pxcor).contains(&pxcor)
            || !(self.min_pycor..=self.max_pycor).contains(&pycor)
            || !(self.min_pzcor..=self.max_pzcor).contains(&pzcor)
        {
            return None;
        }
        let (w, h) = (self.width() as u32, self.height() as u32);
        let layer = (self.max_pzcor - pzcor) as u32;
        let row = (self.max_pycor - pycor) as u32;
        let col = (pxcor - self.min_pxcor) as u32;
        Some(PatchId(layer * w * h + row * w + col))
    }

    pub fn coords(&self, id: PatchId) -> (i32, i32, i32) {
        let (w, h) = (self.width() as u32, self.height() as u32);
        let layer = id.0 / (w * h);
        let rest = id.0 % (w * h);
        (
            self.min_pxcor + (rest % w) as i32,
            self.max_pycor - (rest / w) as i32,
            self.max_pzcor - layer as i32,
        )
    }
}

// ── Topology3d ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topology3d {
    bounds: Bounds3d,
    wrap:   [bool; 3],
}

impl Topology3d {
    pub fn new(bounds: Bounds3d, wrap_x: bool, wrap_y: bool, wrap_z: bool) -> Self {
        Topology3d { bounds, wrap: [wrap_x, wrap_y, wrap_z] }
    }

    /// Every axis wraps.
    pub fn torus(bounds: Bounds3d) -> Self {
        Topology3d::new(bounds, true, true, true)
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds3d {
        &self.bounds
    }

    fn wrap_axis(&self, axis: usize, v: f64, lo: i32, hi: i32) -> EngineResult<f64> {
        let v = geom::finite(v, ["xcor", "ycor", "zcor"][axis])?;
        let (min, max) = (lo as f64 - 0.5, hi as f64 + 0.5);
        if self.wrap[axis] {
            Ok(geom::wrap(v, min, max))
        } else if v >= max || v < min {
            Err(EngineError::BeyondEdge)
        } else {
            Ok(v)
        }
    }

    pub fn wrap_x(&self, x: f64) -> EngineResult<f64> {
        self.wrap_axis(0, x, self.bounds.min_pxcor, self.bounds.max_pxcor)
    }

    pub fn wrap_y(&self, y: f64) -> EngineResult<f64> {
        self.wrap_axis(1, y, self.bounds.min_pycor, self.bounds.max_pycor)
    }

    pub fn wrap_z(&self, z: f64) -> EngineResult<f64> {
        self.wrap_axis(2, z, self.bounds.min_pzcor, self.bounds.max_pzcor)
    }

    fn shortest_delta(&self, axis: usize, a: f64, b: f64, size: i32) -> f64 {
        let d = b - a;
        if !self.wrap[axis] {
            return d;
        }
        let size = size as f64;
        let d2 = if a > b { (b + size) - a } else { (b - size) - a };
        if d2.abs() < d.abs() { d2 } else { d }
    }

    /// Shortest wrapped distance between two points.
    pub fn distance_wrap(&self, from: [f64; 3], to: [f64; 3]) -> f64 {
        let b = &self.bounds;
        let dx = self.shortest_delta(0, from[0], to[0], b.width());
        let dy = self.shortest_delta(1, from[1], to[1], b.height());
        let dz = self.shortest_delta(2, from[2], to[2], b.depth());
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Pitch (degrees above the xy plane, in `[0, 360)`) from `from`
    /// towards `to` along the shortest wrapped route.
    pub fn towards_pitch_wrap(&self, from: [f64; 3], to: [f64; 3]) -> f64 {
        let b = &self.bounds;
        let mut d = [to[0] - from[0], to[1] - from[1], to[2] - from[2]];
        for (axis, size) in [b.width(), b.height(), b.depth()].into_iter().enumerate() {
            if self.wrap[axis] {
                let half = size as f64 / 2.0;
                d[axis] = geom::wrap(d[axis], -half, half);
            }
        }
        let flat = (d[0] * d[0] + d[1] * d[1]).sqrt();
        (360.0 + (d[2] / flat).atan().to_degrees()) % 360.0
    }

    /// Patch at integer coordinates after wrapping.
    pub fn patch_at_coords(&self, pxcor: i32, pycor: i32, pzcor: i32) -> Option<PatchId> {
        let b = &self.bounds;
        let x = wrap_int(self.wrap[0], pxcor, b.min_pxcor, b.width())?;
        let y = wrap_int(self.wrap[1], pycor, b.min_pycor, b.height())?;
        let z = wrap_int(self.wrap[2], pzcor, b.min_pzcor, b.depth())?;
        b.patch_id(x, y, z)
    }

    /// Call `visit` with the storage index of every on-grid stencil
    /// position around `cell`, duplicates included.
    pub fn visit_stencil(
        &self,
        cell:    usize,
        offsets: &[(i32, i32, i32)],
        visit:   &mut dyn FnMut(usize),
    ) {
        let (px, py, pz) = self.bounds.coords(PatchId(cell as u32));
        for (dx, dy, dz) in offsets {
            if let Some(q) = self.patch_at_coords(px + dx, py + dy, pz + dz) {
                visit(q.index());
            }
        }
    }

    fn neighbors_at(&self, p: PatchId, offsets: &[(i32, i32, i32)]) -> Vec<PatchId> {
        let mut out = Vec::with_capacity(offsets.len());
        self.visit_stencil(p.index(), offsets, &mut |q| {
            let q = PatchId(q as u32);
            if q != p && !out.contains(&q) {
                out.push(q);
            }
        });
        out
    }

    pub fn neighbors6(&self, p: PatchId) -> Vec<PatchId> {
        self.neighbors_at(p, &OFFSETS6)
    }

    pub fn neighbors26(&self, p: PatchId) -> Vec<PatchId> {
        self.neighbors_at(p, &OFFSETS26)
    }
}

#[inline]
fn wrap_int(wraps: bool, v: i32, min: i32, size: i32) -> Option<i32> {
    if (min..min + size).contains(&v) {
        Some(v)
    } else if wraps {
        Some(min + (v - min).rem_euclid(size))
    } else {
        None
    }
}
