//! World events and the sinks that receive them.
//!
//! The world reports structural changes (births, deaths, clears, resizes,
//! ticks, halts) as [`WorldEvent`] values pushed into a single
//! [`WorldObserver`].  Renderers and listeners subscribe by installing a
//! sink through [`WorldBuilder::observer`](crate::WorldBuilder::observer);
//! [`ChannelObserver`] forwards events to another thread.

use std::sync::mpsc::{self, Receiver, Sender};

use tw_core::{LinkId, TurtleId};

/// Something that happened to the world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldEvent {
    /// The patch grid was (re)built with these dimensions.
    GridBuilt { width: i32, height: i32 },
    TurtleBorn(TurtleId),
    TurtleDied(TurtleId),
    LinkBorn(LinkId),
    LinkDied(LinkId),
    /// Every turtle (and therefore every link) was removed at once.
    TurtlesCleared,
    LinksCleared,
    PatchesCleared,
    TicksReset,
    /// The tick counter advanced to this value.
    Ticked(f64),
    /// An `ask` stopped because a halt was requested.
    Halted,
}

/// Receives [`WorldEvent`]s.
///
/// The default implementation ignores everything, so implementors only
/// override what they need.
///
/// # Example
///
/// ```rust,ignore
/// struct DeathCounter(usize);
///
/// impl WorldObserver for DeathCounter {
///     fn on_event(&mut self, event: &WorldEvent) {
///         if matches!(event, WorldEvent::TurtleDied(_)) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait WorldObserver: Send + Sync {
    fn on_event(&mut self, _event: &WorldEvent) {}
}

/// A [`WorldObserver`] that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}

/// Forwards every event over an `mpsc` channel.  Events sent after the
/// receiver is dropped are discarded.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: Sender<WorldEvent>,
}

impl ChannelObserver {
    /// A sink plus the receiving end of its channel.
    pub fn new() -> (Self, Receiver<WorldEvent>) {
        let (tx, rx) = mpsc::channel();
        (ChannelObserver { tx }, rx)
    }
}

impl WorldObserver for ChannelObserver {
    fn on_event(&mut self, event: &WorldEvent) {
        let _ = self.tx.send(event.clone());
    }
}
