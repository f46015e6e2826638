//! Patch grid extents and indexing.

use tw_core::{PatchId, WorldConfig};

/// Inclusive patch-coordinate ranges of a 2D world.
///
/// Patches are stored row-major starting from the top-left corner:
/// `index = (max_pycor - pycor) * width + (pxcor - min_pxcor)`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_pxcor: i32,
    pub max_pxcor: i32,
    pub min_pycor: i32,
    pub max_pycor: i32,
}

impl Bounds {
    pub fn new(min_pxcor: i32, max_pxcor: i32, min_pycor: i32, max_pycor: i32) -> Self {
        Bounds { min_pxcor, max_pxcor, min_pycor, max_pycor }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Bounds::new(config.min_pxcor, config.max_pxcor, config.min_pycor, config.max_pycor)
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
    pub fn patch_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Left edge of the world in turtle coordinates.
    #[inline]
    pub fn min_x(&self) -> f64 {
        self.min_pxcor as f64 - 0.5
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.max_pxcor as f64 + 0.5
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.min_pycor as f64 - 0.5
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.max_pycor as f64 + 0.5
    }

    #[inline]
    pub fn contains_patch(&self, pxcor: i32, pycor: i32) -> bool {
        (self.min_pxcor..=self.max_pxcor).contains(&pxcor)
            && (self.min_pycor..=self.max_pycor).contains(&pycor)
    }

    /// Id of the patch at integer coordinates, `None` outside the grid.
    #[inline]
    pub fn patch_id(&self, pxcor: i32, pycor: i32) -> Option<PatchId> {
        if !self.contains_patch(pxcor, pycor) {
            return None;
        }
        let row = (self.max_pycor - pycor) as u32;
        let col = (pxcor - self.min_pxcor) as u32;
        Some(PatchId(row * self.width() as u32 + col))
    }

    /// Integer coordinates of a patch id.
    #[inline]
    pub fn coords(&self, id: PatchId) -> (i32, i32) {
        let w = self.width() as u32;
        let row = id.0 / w;
        let col = id.0 % w;
        (self.min_pxcor + col as i32, self.max_pycor - row as i32)
    }

    /// All patch ids in storage order.
    pub fn patch_ids(&self) -> impl Iterator<Item = PatchId> + use<> {
        (0..self.patch_count() as u32).map(PatchId)
    }
}
