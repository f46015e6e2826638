//! Agent sets.
//!
//! # Backings
//!
//! - **Array**: an append-only `Vec` of handles in insertion order.  Used
//!   for ad-hoc sets (query results, `turtles-here`, sampled subsets).  It
//!   may keep handles of agents that died after the set was built; every
//!   read skips them through a [`Liveness`] oracle.
//! - **Ordered**: a `BTreeMap` keyed by [`AgentKey`] with a reverse index
//!   for O(1) membership.  Used for the global turtle/link sets and breed
//!   sets, which the world keeps exact (dead agents are removed), so
//!   enumeration order depends only on who numbers and never on creation
//!   order.
//!
//! # Random sampling
//!
//! All sampling is written against [`WorldRng::next_int`] and consumes
//! draws in a fixed order: identical seed and identical set contents give
//! bit-identical picks.  Callers pass a precomputed `count`; computing it
//! for an array set is a full scan, so cache it when sampling repeatedly.

use std::collections::BTreeMap;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tw_core::{AgentKey, AgentKind, EngineError, EngineResult, WorldRng};

use crate::shuffle::Shufflerator;

// ── Liveness ──────────────────────────────────────────────────────────────────

/// Answers "is this handle still a live agent?".
pub trait Liveness<I> {
    fn is_alive(&self, id: I) -> bool;
}

/// Liveness for agents that never die (patches), or for sets already known
/// to be exact.
#[derive(Copy, Clone, Debug, Default)]
pub struct AlwaysAlive;

impl<I> Liveness<I> for AlwaysAlive {
    #[inline]
    fn is_alive(&self, _id: I) -> bool {
        true
    }
}

// ── AgentSet ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum Backing<I> {
    Array(Vec<I>),
    Ordered {
        by_key: BTreeMap<AgentKey, I>,
        keys:   FxHashMap<I, AgentKey>,
    },
}

/// A set of agents of one kind.
#[derive(Clone, Debug)]
pub struct AgentSet<I> {
    kind:    AgentKind,
    backing: Backing<I>,
}

enum RawIter<'a, I> {
    Array(std::slice::Iter<'a, I>),
    Ordered(std::collections::btree_map::Values<'a, AgentKey, I>),
}

impl<I: Copy> Iterator for RawIter<'_, I> {
    type Item = I;

    #[inline]
    fn next(&mut self) -> Option<I> {
        match self {
            RawIter::Array(it)   => it.next().copied(),
            RawIter::Ordered(it) => it.next().copied(),
        }
    }
}

impl<I: Copy + Eq + Hash> AgentSet<I> {
    /// An empty array-backed set.
    pub fn array(kind: AgentKind) -> Self {
        AgentSet { kind, backing: Backing::Array(Vec::new()) }
    }

    /// An array-backed set holding `items` in the given order.
    pub fn from_vec(kind: AgentKind, items: Vec<I>) -> Self {
        AgentSet { kind, backing: Backing::Array(items) }
    }

    /// An empty key-ordered set.
    pub fn ordered(kind: AgentKind) -> Self {
        AgentSet {
            kind,
            backing: Backing::Ordered { by_key: BTreeMap::new(), keys: FxHashMap::default() },
        }
    }

    #[inline]
    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    #[inline]
    pub fn is_ordered(&self) -> bool {
        matches!(self.backing, Backing::Ordered { .. })
    }

    fn raw(&self) -> RawIter<'_, I> {
        match &self.backing {
            Backing::Array(v) => RawIter::Array(v.iter()),
            Backing::Ordered { by_key, .. } => RawIter::Ordered(by_key.values()),
        }
    }

    /// Stored entries including dead ones.  Equal to [`count`](Self::count)
    /// for ordered sets.
    #[inline]
    pub fn capacity(&self) -> usize {
        match &self.backing {
            Backing::Array(v) => v.len(),
            Backing::Ordered { by_key, .. } => by_key.len(),
        }
    }

    /// Number of live agents.
    ///
    /// O(1) for ordered sets.  Array sets of turtles or links are scanned,
    /// skipping dead entries.
    pub fn count(&self, live: &impl Liveness<I>) -> usize {
        match &self.backing {
            Backing::Ordered { by_key, .. } => by_key.len(),
            Backing::Array(v) if self.kind == AgentKind::Patch => v.len(),
            Backing::Array(v) => v.iter().filter(|id| live.is_alive(**id)).count(),
        }
    }

    pub fn is_empty(&self, live: &impl Liveness<I>) -> bool {
        self.iter(live).next().is_none()
    }

    /// Live agents in set order.
    pub fn iter<'a, L: Liveness<I>>(&'a self, live: &'a L) -> impl Iterator<Item = I> + 'a {
        self.raw().filter(move |id| live.is_alive(*id))
    }

    /// Live agents collected in set order.
    pub fn to_vec(&self, live: &impl Liveness<I>) -> Vec<I> {
        self.iter(live).collect()
    }

    pub fn contains(&self, id: I, live: &impl Liveness<I>) -> bool {
        if !live.is_alive(id) {
            return false;
        }
        match &self.backing {
            Backing::Array(v) => v.contains(&id),
            Backing::Ordered { keys, .. } => keys.contains_key(&id),
        }
    }

    /// Add `id` (sorted under `key` for ordered sets; appended for array
    /// sets).  Returns `false` if an ordered set already held it.
    pub fn add(&mut self, key: AgentKey, id: I) -> bool {
        match &mut self.backing {
            Backing::Array(v) => {
                v.push(id);
                true
            }
            Backing::Ordered { by_key, keys } => {
                if keys.contains_key(&id) {
                    return false;
                }
                keys.insert(id, key);
                by_key.insert(key, id);
                true
            }
        }
    }

    /// Remove `id`.  Returns `true` if it was present.
    pub fn remove(&mut self, id: I) -> bool {
        match &mut self.backing {
            Backing::Array(v) => match v.iter().position(|x| *x == id) {
                Some(pos) => {
                    v.remove(pos);
                    true
                }
                None => false,
            },
            Backing::Ordered { by_key, keys } => match keys.remove(&id) {
                Some(key) => {
                    by_key.remove(&key);
                    true
                }
                None => false,
            },
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        match &mut self.backing {
            Backing::Array(v) => v.clear(),
            Backing::Ordered { by_key, keys } => {
                by_key.clear();
                keys.clear();
            }
        }
    }

    /// Equal membership: same kind, same live count, and every live member
    /// of `self` is in `other`.  Order is ignored.
    pub fn same_members(&self, other: &AgentSet<I>, live: &impl Liveness<I>) -> bool {
        self.kind == other.kind
            && self.count(live) == other.count(live)
            && self.iter(live).all(|id| other.contains(id, live))
    }

    // ── Randomness ────────────────────────────────────────────────────────

    /// The `random_index`-th live agent, given `count` live agents.
    pub fn random_one(
        &self,
        count: usize,
        random_index: usize,
        live: &impl Liveness<I>,
    ) -> Option<I> {
        if random_index >= count {
            return None;
        }
        self.iter(live).nth(random_index)
    }

    /// Two distinct live agents, in set order.  Draws exactly twice:
    /// `next_int(count)` then `next_int(count - 1)`.
    pub fn random_two(
        &self,
        count: usize,
        rng: &mut WorldRng,
        live: &impl Liveness<I>,
    ) -> Option<[I; 2]> {
        if count < 2 {
            return None;
        }
        let r1 = rng.next_int(count);
        let r2 = rng.next_int(count - 1);
        let (small, big) = if r2 >= r1 { (r1, r2 + 1) } else { (r2, r1) };
        let mut it = self.iter(live);
        let first = it.nth(small)?;
        let second = it.nth(big - small - 1)?;
        Some([first, second])
    }

    /// `k` distinct live agents, in set order.
    ///
    /// `k = 1` and `k = 2` use [`random_one`](Self::random_one) and
    /// [`random_two`](Self::random_two).  Larger `k` makes one pass over the
    /// live agents; candidate `i` is taken iff
    /// `next_int(count - i) < k - taken`, one draw per candidate visited.
    pub fn random_subset(
        &self,
        k: usize,
        count: usize,
        rng: &mut WorldRng,
        live: &impl Liveness<I>,
    ) -> EngineResult<AgentSet<I>> {
        if k > count {
            return Err(EngineError::domain(format!(
                "requested {k} random agents from a set of only {count} agents"
            )));
        }
        let picked = match k {
            0 => Vec::new(),
            1 => {
                let r = rng.next_int(count);
                self.random_one(count, r, live).into_iter().collect()
            }
            2 => self.random_two(count, rng, live).map(Vec::from).unwrap_or_default(),
            _ => {
                let mut out = Vec::with_capacity(k);
                for (i, id) in self.iter(live).enumerate() {
                    if out.len() == k {
                        break;
                    }
                    if rng.next_int(count - i) < k - out.len() {
                        out.push(id);
                    }
                }
                out
            }
        };
        Ok(AgentSet::from_vec(self.kind, picked))
    }

    /// A one-shot randomized traversal over a private copy of this set.
    ///
    /// The set may be mutated freely while the shufflerator is being
    /// consumed; agents that die before their turn are skipped.
    pub fn shufflerator(&self, rng: &mut WorldRng, live: &impl Liveness<I>) -> Shufflerator<I> {
        Shufflerator::new(self.raw().collect(), rng, live)
    }

    /// Live agents in shufflerator order, collected eagerly.  Use when
    /// nothing is mutated during the traversal.
    pub fn shuffled(&self, rng: &mut WorldRng, live: &impl Liveness<I>) -> Vec<I> {
        let mut sh = self.shufflerator(rng, live);
        let mut out = Vec::with_capacity(self.capacity());
        while let Some(id) = sh.next(rng, live) {
            out.push(id);
        }
        out
    }
}
