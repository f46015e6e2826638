//! Synchronous diffusion over a patch value grid.
//!
//! # Model
//!
//! Every cell hands `value * amount / N` to each position of a symmetric
//! stencil of `N` offsets (8 or 4 in 2D, 26 or 6 in 3D) and keeps the
//! rest.  Positions that fall off a non-wrapping edge receive nothing, so
//! edge cells keep more.  On a wrapping axis of width 1 or 2 a stencil
//! position may land on the same cell twice (or on the sender itself); it
//! then receives once per position.
//!
//! Because the stencil is symmetric, the scatter above equals a gather in
//! which each cell reads only the old values of its own stencil:
//!
//! ```text
//! new = old - k * old * share + share * Σ old[q]     share = amount / N
//! ```
//!
//! where `k` counts the on-grid positions.  All reads come from the input
//! slice, so the update is simultaneous and the grid total is conserved.

use tw_core::PatchId;

use crate::space3d::{Topology3d, OFFSETS26, OFFSETS6};
use crate::topology::{MOORE, VON_NEUMANN};
use crate::Topology;

/// Diffuse to the 8-neighborhood.  `values` holds one entry per patch in
/// storage order; the result has the same layout.
pub fn diffuse8(topology: &Topology, values: &[f64], amount: f64) -> Vec<f64> {
    gather(values, amount, MOORE.len(), |cell, visit| {
        stencil_2d(topology, cell, &MOORE, visit)
    })
}

/// Diffuse to the 4-neighborhood.
pub fn diffuse4(topology: &Topology, values: &[f64], amount: f64) -> Vec<f64> {
    gather(values, amount, VON_NEUMANN.len(), |cell, visit| {
        stencil_2d(topology, cell, &VON_NEUMANN, visit)
    })
}

/// Diffuse to the 26-neighborhood of a 3D grid.
pub fn diffuse26(topology: &Topology3d, values: &[f64], amount: f64) -> Vec<f64> {
    gather(values, amount, OFFSETS26.len(), |cell, visit| {
        topology.visit_stencil(cell, &OFFSETS26, visit)
    })
}

/// Diffuse to the 6 face neighbors of a 3D grid.
pub fn diffuse6(topology: &Topology3d, values: &[f64], amount: f64) -> Vec<f64> {
    gather(values, amount, OFFSETS6.len(), |cell, visit| {
        topology.visit_stencil(cell, &OFFSETS6, visit)
    })
}

fn stencil_2d(
    topology: &Topology,
    cell:     usize,
    offsets:  &[(i32, i32)],
    visit:    &mut dyn FnMut(usize),
) {
    let (px, py) = topology.bounds().coords(PatchId(cell as u32));
    for (dx, dy) in offsets {
        if let Some(q) = topology.patch_at_coords(px + dx, py + dy) {
            visit(q.index());
        }
    }
}

/// One gather step.  `stencil(cell, visit)` calls `visit` once per
/// on-grid stencil position of `cell`.
fn gather<S>(values: &[f64], amount: f64, divisor: usize, stencil: S) -> Vec<f64>
where
    S: Fn(usize, &mut dyn FnMut(usize)) + Sync,
{
    let share = amount / divisor as f64;
    let cell = |i: usize| -> f64 {
        let old = values[i];
        let mut k = 0usize;
        let mut sum = 0.0;
        stencil(i, &mut |q| {
            k += 1;
            sum += values[q];
        });
        old - k as f64 * (old * share) + sum * share
    };

    #[cfg(not(feature = "parallel"))]
    {
        (0..values.len()).map(cell).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        (0..values.len()).into_par_iter().map(cell).collect()
    }
}
