//! Strongly typed, zero-cost identifier wrappers.
//!
//! Two flavours exist:
//!
//! - **Dense ids** (`PatchId`, `BreedId`) index directly into a `Vec` that
//!   never shrinks.  Patches live for the lifetime of a world size, and
//!   breeds are fixed when the schema is built.
//! - **Generational handles** (`TurtleId`, `LinkId`) address a slot in an
//!   arena whose slots are recycled through a free list.  The generation
//!   counter makes a handle to a dead agent read as dead in O(1), even after
//!   its slot has been reused by a newborn.
//!
//! The user-visible "who" number of a turtle is *not* its handle: who numbers
//! are monotonic and never reused, and they decide enumeration order in the
//! ordered agent sets (see [`AgentKey`]).

use std::fmt;

/// Generate a dense typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

/// Generate a generational arena handle.
macro_rules! handle_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name {
            /// Slot in the owning arena.
            pub index: u32,
            /// Generation of the slot at the time the agent was born.
            pub generation: u32,
        }

        impl $name {
            #[inline(always)]
            pub const fn new(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            /// Cast the slot to `usize` for indexing side tables.
            #[inline(always)]
            pub fn slot(self) -> usize {
                self.index as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}v{})", stringify!($name), self.index, self.generation)
            }
        }
    };
}

typed_id! {
    /// Index of a patch in the world's patch array (row-major from the
    /// top-left corner, i.e. `max_pycor` first).
    pub struct PatchId(u32);
}

typed_id! {
    /// Index of a breed in the schema's breed table.  Turtle and link breeds
    /// share one numbering space; index 0 and 1 are the unbreeded
    /// `turtles` and `links` pseudo-breeds.
    pub struct BreedId(u16);
}

impl BreedId {
    /// The unbreeded turtle set.
    pub const TURTLES: BreedId = BreedId(0);
    /// The unbreeded link set.
    pub const LINKS: BreedId = BreedId(1);
}

handle_id! {
    /// Generational handle of a live (or formerly live) turtle.
    pub struct TurtleId;
}

handle_id! {
    /// Generational handle of a live (or formerly live) link.
    pub struct LinkId;
}

// ── AgentKind ─────────────────────────────────────────────────────────────────

/// The four kinds of agent in a world.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentKind {
    Observer,
    Turtle,
    Patch,
    Link,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentKind::Observer => "observer",
            AgentKind::Turtle   => "turtle",
            AgentKind::Patch    => "patch",
            AgentKind::Link     => "link",
        };
        f.write_str(s)
    }
}

// ── AgentKey ──────────────────────────────────────────────────────────────────

/// Sort key of an agent inside an ordered agent set.
///
/// Turtles sort by who number.  Links sort by `(end1 who, end2 who, breed)`
/// so the global link set enumerates identically no matter the order links
/// were created in.  Patches sort by their array index.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentKey(pub u64, pub u64, pub u16);

impl AgentKey {
    #[inline]
    pub fn turtle(who: u64) -> Self {
        AgentKey(who, 0, 0)
    }

    #[inline]
    pub fn link(end1_who: u64, end2_who: u64, breed: BreedId) -> Self {
        AgentKey(end1_who, end2_who, breed.0)
    }

    #[inline]
    pub fn patch(id: PatchId) -> Self {
        AgentKey(id.0 as u64, 0, 0)
    }
}

// ── AgentRef ──────────────────────────────────────────────────────────────────

/// A reference to any non-observer agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentRef {
    Turtle(TurtleId),
    Patch(PatchId),
    Link(LinkId),
}

impl AgentRef {
    pub fn kind(self) -> AgentKind {
        match self {
            AgentRef::Turtle(_) => AgentKind::Turtle,
            AgentRef::Patch(_)  => AgentKind::Patch,
            AgentRef::Link(_)   => AgentKind::Link,
        }
    }
}

impl From<TurtleId> for AgentRef {
    fn from(id: TurtleId) -> Self {
        AgentRef::Turtle(id)
    }
}

impl From<PatchId> for AgentRef {
    fn from(id: PatchId) -> Self {
        AgentRef::Patch(id)
    }
}

impl From<LinkId> for AgentRef {
    fn from(id: LinkId) -> Self {
        AgentRef::Link(id)
    }
}
