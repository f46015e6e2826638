//! World dimensions, wrapping and seeds.

use crate::{EngineError, EngineResult};

/// Static world configuration.
///
/// Patch coordinates run from `min_*cor` to `max_*cor` inclusive, so the
/// world is `max_pxcor - min_pxcor + 1` patches wide.  The origin patch
/// `(0, 0)` must lie inside the world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    pub min_pxcor: i32,
    pub max_pxcor: i32,
    pub min_pycor: i32,
    pub max_pycor: i32,

    /// Whether the x axis wraps around.
    pub wrap_x: bool,
    /// Whether the y axis wraps around.
    pub wrap_y: bool,

    /// Seed of the `main` random stream.
    pub seed: u64,
    /// Seed of the `aux` random stream.  `None` derives one from `seed`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub aux_seed: Option<u64>,
}

impl WorldConfig {
    /// A world spanning `-max_pxcor..=max_pxcor` by `-max_pycor..=max_pycor`
    /// with both axes wrapping (a torus).
    pub fn centered(max_pxcor: i32, max_pycor: i32) -> Self {
        WorldConfig {
            min_pxcor: -max_pxcor,
            max_pxcor,
            min_pycor: -max_pycor,
            max_pycor,
            wrap_x: true,
            wrap_y: true,
            seed: 0,
            aux_seed: None,
        }
    }

    pub fn with_wrap(mut self, wrap_x: bool, wrap_y: bool) -> Self {
        self.wrap_x = wrap_x;
        self.wrap_y = wrap_y;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.max_pxcor - self.min_pxcor + 1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.max_pycor - self.min_pycor + 1
    }

    /// Number of patches in the grid.
    #[inline]
    pub fn patch_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.min_pxcor > 0 || self.max_pxcor < 0 {
            return Err(EngineError::Config(format!(
                "x range {}..={} must contain the origin",
                self.min_pxcor, self.max_pxcor
            )));
        }
        if self.min_pycor > 0 || self.max_pycor < 0 {
            return Err(EngineError::Config(format!(
                "y range {}..={} must contain the origin",
                self.min_pycor, self.max_pycor
            )));
        }
        if (self.width() as u64) * (self.height() as u64) > u32::MAX as u64 {
            return Err(EngineError::Config("world has too many patches".into()));
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    /// The classic 33 x 33 torus.
    fn default() -> Self {
        WorldConfig::centered(16, 16)
    }
}
