//! The world tick counter.
//!
//! Ticks are real-valued (`tick_advance` accepts fractions) and start out
//! *cleared*: reading them before `reset` is a domain error.

use crate::{EngineError, EngineResult};

#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickCounter {
    ticks: Option<f64>,
}

impl TickCounter {
    pub const fn new() -> Self {
        TickCounter { ticks: None }
    }

    /// Current tick count.
    pub fn ticks(&self) -> EngineResult<f64> {
        self.ticks.ok_or(EngineError::TicksNotStarted)
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.ticks.is_some()
    }

    /// Start (or restart) the counter at zero.
    pub fn reset(&mut self) {
        self.ticks = Some(0.0);
    }

    /// Return to the cleared state.
    pub fn clear(&mut self) {
        self.ticks = None;
    }

    /// Advance by one tick.
    pub fn tick(&mut self) -> EngineResult<f64> {
        self.advance(1.0)
    }

    /// Advance by `amount`, which must be non-negative.
    pub fn advance(&mut self, amount: f64) -> EngineResult<f64> {
        if amount < 0.0 || amount.is_nan() {
            return Err(EngineError::domain(format!(
                "cannot advance the tick counter by a negative amount: {amount}"
            )));
        }
        let t = self.ticks()? + amount;
        self.ticks = Some(t);
        Ok(t)
    }
}
