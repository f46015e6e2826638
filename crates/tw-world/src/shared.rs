//! `SharedWorld`: one world read by a renderer while a model thread writes.

use std::sync::{Arc, RwLock};

use tw_core::{EngineError, EngineResult};

use crate::World;

/// A cloneable handle to a [`World`] behind a reader-writer lock.
///
/// Readers ([`paint`](Self::paint)) see a consistent snapshot: a writer
/// holds the lock for the whole closure, so no reader observes a
/// half-applied operation.
#[derive(Clone, Debug)]
pub struct SharedWorld(Arc<RwLock<World>>);

impl SharedWorld {
    pub fn new(world: World) -> Self {
        SharedWorld(Arc::new(RwLock::new(world)))
    }

    /// Run `f` with read access.
    ///
    /// # Errors
    ///
    /// An invariant error if a writer panicked while holding the lock.
    pub fn paint<R>(&self, f: impl FnOnce(&World) -> R) -> EngineResult<R> {
        let world = self
            .0
            .read()
            .map_err(|e| EngineError::invariant(format!("world lock poisoned: {e}")))?;
        Ok(f(&world))
    }

    /// Run `f` with exclusive access and pass its result through.
    pub fn write<R>(&self, f: impl FnOnce(&mut World) -> EngineResult<R>) -> EngineResult<R> {
        let mut world = self
            .0
            .write()
            .map_err(|e| EngineError::invariant(format!("world lock poisoned: {e}")))?;
        f(&mut world)
    }

    /// The world back out, if this is the last handle.
    pub fn into_inner(self) -> Option<World> {
        Arc::into_inner(self.0).and_then(|lock| lock.into_inner().ok())
    }
}
