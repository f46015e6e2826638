//! Generational arena for turtles and links.
//!
//! # Design
//!
//! Agents live in a dense `Vec` of slots.  A dead agent's slot goes on a
//! free list and its generation is bumped, so any handle still pointing at
//! it reads as dead in O(1) (no sentinel scan), and a newborn reusing the
//! slot gets a handle that can never be confused with the old one.
//!
//! A liveness bitset mirrors slot occupancy so that sets holding many
//! handles can test membership without touching the (large) agent structs.

use tw_core::{LinkId, TurtleId};

use crate::set::Liveness;

/// A generational handle type an [`Arena`] can hand out.
pub trait Handle: Copy + Eq {
    fn from_parts(index: u32, generation: u32) -> Self;
    fn index(self) -> u32;
    fn generation(self) -> u32;
}

impl Handle for TurtleId {
    #[inline]
    fn from_parts(index: u32, generation: u32) -> Self {
        TurtleId::new(index, generation)
    }
    #[inline]
    fn index(self) -> u32 {
        self.index
    }
    #[inline]
    fn generation(self) -> u32 {
        self.generation
    }
}

impl Handle for LinkId {
    #[inline]
    fn from_parts(index: u32, generation: u32) -> Self {
        LinkId::new(index, generation)
    }
    #[inline]
    fn index(self) -> u32 {
        self.index
    }
    #[inline]
    fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value:      Option<T>,
}

/// Dense slot storage with a free list.
#[derive(Clone, Debug)]
pub struct Arena<H, T> {
    slots: Vec<Slot<T>>,
    free:  Vec<u32>,
    live:  Vec<u64>,
    len:   usize,
    _h:    std::marker::PhantomData<H>,
}

impl<H: Handle, T> Default for Arena<H, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Handle, T> Arena<H, T> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free:  Vec::new(),
            live:  Vec::new(),
            len:   0,
            _h:    std::marker::PhantomData,
        }
    }

    /// Number of live agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `value`, reusing a free slot if there is one.
    pub fn insert(&mut self, value: T) -> H {
        let index = match self.free.pop() {
            Some(i) => {
                self.slots[i as usize].value = Some(value);
                i
            }
            None => {
                let i = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, value: Some(value) });
                if self.live.len() * 64 < self.slots.len() {
                    self.live.push(0);
                }
                i
            }
        };
        self.set_bit(index, true);
        self.len += 1;
        H::from_parts(index, self.slots[index as usize].generation)
    }

    /// Remove the agent behind `h`.  Returns `None` if it was already dead.
    pub fn remove(&mut self, h: H) -> Option<T> {
        if !self.contains(h) {
            return None;
        }
        let slot = &mut self.slots[h.index() as usize];
        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.set_bit(h.index(), false);
        self.free.push(h.index());
        self.len -= 1;
        value
    }

    /// `true` if `h` refers to a live agent.
    #[inline]
    pub fn contains(&self, h: H) -> bool {
        let i = h.index() as usize;
        self.bit(h.index())
            && self.slots.get(i).is_some_and(|s| s.generation == h.generation())
    }

    #[inline]
    pub fn get(&self, h: H) -> Option<&T> {
        self.slots
            .get(h.index() as usize)
            .filter(|s| s.generation == h.generation())
            .and_then(|s| s.value.as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, h: H) -> Option<&mut T> {
        self.slots
            .get_mut(h.index() as usize)
            .filter(|s| s.generation == h.generation())
            .and_then(|s| s.value.as_mut())
    }

    /// Live agents in slot order (not who order).
    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.value.as_ref().map(|v| (H::from_parts(i as u32, s.generation), v))
        })
    }

    /// Kill every agent.  Every occupied slot is freed with its generation
    /// bumped, so no handle from before the clear aliases a later agent.
    pub fn clear(&mut self) {
        for (i, s) in self.slots.iter_mut().enumerate() {
            if s.value.take().is_some() {
                s.generation = s.generation.wrapping_add(1);
                self.free.push(i as u32);
            }
        }
        self.live.iter_mut().for_each(|w| *w = 0);
        self.len = 0;
    }

    #[inline]
    fn bit(&self, index: u32) -> bool {
        let (w, b) = (index as usize / 64, index % 64);
        self.live.get(w).is_some_and(|word| word & (1u64 << b) != 0)
    }

    #[inline]
    fn set_bit(&mut self, index: u32, on: bool) {
        let (w, b) = (index as usize / 64, index % 64);
        if let Some(word) = self.live.get_mut(w) {
            if on {
                *word |= 1u64 << b;
            } else {
                *word &= !(1u64 << b);
            }
        }
    }
}

impl<H: Handle, T> Liveness<H> for Arena<H, T> {
    #[inline]
    fn is_alive(&self, id: H) -> bool {
        self.contains(id)
    }
}
