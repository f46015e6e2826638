//! Tie bookkeeping.
//!
//! Only the count of tied links lives here; the adjacency walk that finds
//! the turtles tied to a root is [`LinkManager::tied_turtles`], and the
//! world applies the resulting moves and turns.  While the count is zero
//! the world skips tie propagation entirely.
//!
//! [`LinkManager::tied_turtles`]: crate::LinkManager::tied_turtles

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TieManager {
    tie_count: usize,
}

impl TieManager {
    /// Number of links whose tie mode is not `none`.
    #[inline]
    pub fn tie_count(&self) -> usize {
        self.tie_count
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.tie_count > 0
    }

    pub(crate) fn tied(&mut self) {
        self.tie_count += 1;
    }

    pub(crate) fn untied(&mut self) {
        self.tie_count = self.tie_count.saturating_sub(1);
    }

    pub(crate) fn reset(&mut self) {
        self.tie_count = 0;
    }
}
