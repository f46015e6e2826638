//! Global and breed agent sets, and random picks from any set.
//!
//! Random picks draw from the `main` stream.  Counts are taken once per
//! pick, then handed to the set's sampling routines.

use std::hash::Hash;

use tw_agent::{AgentSet, AlwaysAlive, Liveness};
use tw_core::{BreedId, EngineError, EngineResult, LinkId, PatchId, TurtleId, WorldRng};

use crate::World;

fn pick_one<I: Copy + Eq + Hash>(set: &AgentSet<I>, rng: &mut WorldRng, live: &impl Liveness<I>) -> Option<I> {
    let count = set.count(live);
    if count == 0 {
        return None;
    }
    let r = rng.next_int(count);
    set.random_one(count, r, live)
}

impl World {
    // ── Global sets ───────────────────────────────────────────────────────

    /// Every live turtle, ordered by who number.
    #[inline]
    pub fn turtles(&self) -> &AgentSet<TurtleId> {
        &self.all_turtles
    }

    /// Every live link, ordered by `(end1, end2, breed)`.
    #[inline]
    pub fn links(&self) -> &AgentSet<LinkId> {
        &self.all_links
    }

    /// Every patch, row by row from the top left.
    #[inline]
    pub fn patches(&self) -> &AgentSet<PatchId> {
        &self.all_patches
    }

    /// Members of a turtle breed.  [`BreedId::TURTLES`] is every turtle.
    pub fn turtle_breed_set(&self, breed: BreedId) -> EngineResult<&AgentSet<TurtleId>> {
        self.schema.turtle_breed(breed)?;
        if breed == BreedId::TURTLES {
            return Ok(&self.all_turtles);
        }
        self.turtle_breeds
            .get(&breed)
            .ok_or_else(|| EngineError::invariant(format!("turtle breed {breed} has no agent set")))
    }

    /// Members of a link breed.  [`BreedId::LINKS`] is every link.
    pub fn link_breed_set(&self, breed: BreedId) -> EngineResult<&AgentSet<LinkId>> {
        self.schema.link_breed(breed)?;
        if breed == BreedId::LINKS {
            return Ok(&self.all_links);
        }
        self.link_breeds
            .get(&breed)
            .ok_or_else(|| EngineError::invariant(format!("link breed {breed} has no agent set")))
    }

    /// Live turtles in `set`.  Scans array-backed sets.
    pub fn count_turtles(&self, set: &AgentSet<TurtleId>) -> usize {
        set.count(&self.turtles)
    }

    pub fn count_links(&self, set: &AgentSet<LinkId>) -> usize {
        set.count(&self.links)
    }

    /// Live members of `set` for which `pred` holds, in set order.
    pub fn turtles_with(
        &self,
        set:  &AgentSet<TurtleId>,
        mut pred: impl FnMut(&World, TurtleId) -> bool,
    ) -> AgentSet<TurtleId> {
        let hits = set.iter(&self.turtles).filter(|t| pred(self, *t)).collect();
        AgentSet::from_vec(set.kind(), hits)
    }

    // ── Random picks ──────────────────────────────────────────────────────

    pub fn one_of_turtles(&mut self, set: &AgentSet<TurtleId>) -> Option<TurtleId> {
        pick_one(set, &mut self.rng.main, &self.turtles)
    }

    pub fn one_of_links(&mut self, set: &AgentSet<LinkId>) -> Option<LinkId> {
        pick_one(set, &mut self.rng.main, &self.links)
    }

    pub fn one_of_patches(&mut self, set: &AgentSet<PatchId>) -> Option<PatchId> {
        pick_one(set, &mut self.rng.main, &AlwaysAlive)
    }

    /// `k` distinct turtles of `set`, in set order.
    ///
    /// # Errors
    ///
    /// A domain error if `set` has fewer than `k` live members.
    pub fn n_of_turtles(&mut self, k: usize, set: &AgentSet<TurtleId>) -> EngineResult<AgentSet<TurtleId>> {
        let count = set.count(&self.turtles);
        set.random_subset(k, count, &mut self.rng.main, &self.turtles)
    }

    pub fn n_of_links(&mut self, k: usize, set: &AgentSet<LinkId>) -> EngineResult<AgentSet<LinkId>> {
        let count = set.count(&self.links);
        set.random_subset(k, count, &mut self.rng.main, &self.links)
    }

    pub fn n_of_patches(&mut self, k: usize, set: &AgentSet<PatchId>) -> EngineResult<AgentSet<PatchId>> {
        let count = set.count(&AlwaysAlive);
        set.random_subset(k, count, &mut self.rng.main, &AlwaysAlive)
    }

    /// Live members of `set` in a fresh random order.
    pub fn shuffled_turtles(&mut self, set: &AgentSet<TurtleId>) -> Vec<TurtleId> {
        set.shuffled(&mut self.rng.main, &self.turtles)
    }
}
