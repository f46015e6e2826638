//! The shufflerator: a randomized, mutation-safe, one-shot traversal.
//!
//! The shufflerator owns a private copy of the set's storage and runs a
//! lazy front-to-back Fisher–Yates shuffle over it, one element per step:
//! at position `i` (except the last) it draws `r = i + next_int(len - i)`,
//! yields `copy[r]` and moves `copy[i]` into the hole.  Dead entries still
//! consume their draw and are then skipped, so the draw sequence depends
//! only on the stored length, never on which agents happen to be alive.
//!
//! One element is always prefetched.  Because the copy is private, the
//! caller may kill or create agents between steps; newborns are never
//! visited and agents killed before their turn are skipped.
//!
//! The RNG and liveness oracle are passed to every step rather than
//! borrowed for the traversal's lifetime, so the caller can hand the same
//! world (which owns both) to the per-agent work in between.

use tw_core::WorldRng;

use crate::set::Liveness;

#[derive(Clone, Debug)]
pub struct Shufflerator<I> {
    copy: Vec<I>,
    i:    usize,
    next: Option<I>,
}

impl<I: Copy> Shufflerator<I> {
    /// Start a traversal over `items`, prefetching the first live one.
    pub fn new(items: Vec<I>, rng: &mut WorldRng, live: &impl Liveness<I>) -> Self {
        let mut sh = Shufflerator { copy: items, i: 0, next: None };
        sh.fetch(rng, live);
        sh
    }

    /// `true` while a prefetched agent is waiting.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// The next live agent, or `None` when the traversal is done.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self, rng: &mut WorldRng, live: &impl Liveness<I>) -> Option<I> {
        loop {
            let result = self.next.take()?;
            self.fetch(rng, live);
            // killed since it was prefetched
            if live.is_alive(result) {
                return Some(result);
            }
        }
    }

    fn fetch(&mut self, rng: &mut WorldRng, live: &impl Liveness<I>) {
        let len = self.copy.len();
        while self.i < len {
            let candidate = if self.i < len - 1 {
                let r = self.i + rng.next_int(len - self.i);
                let picked = self.copy[r];
                self.copy[r] = self.copy[self.i];
                picked
            } else {
                self.copy[self.i]
            };
            self.i += 1;
            if live.is_alive(candidate) {
                self.next = Some(candidate);
                return;
            }
        }
        self.next = None;
    }
}
