//! Per-patch neighborhood cache.

use tw_core::PatchId;

use crate::Topology;

/// Lazily computed 4- and 8-neighborhoods for every patch of one topology.
///
/// Entries are filled on first request.  Replacing the topology (a resize
/// or a wrap change) drops every entry.
#[derive(Clone, Debug)]
pub struct NeighborCache {
    topology: Topology,
    n8:       Vec<Option<Box<[PatchId]>>>,
    n4:       Vec<Option<Box<[PatchId]>>>,
}

impl NeighborCache {
    pub fn new(topology: Topology) -> Self {
        let n = topology.bounds().patch_count();
        NeighborCache {
            topology,
            n8: vec![None; n],
            n4: vec![None; n],
        }
    }

    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Switch to `topology`, forgetting every cached neighborhood.
    pub fn invalidate(&mut self, topology: Topology) {
        *self = NeighborCache::new(topology);
    }

    /// Number of patches with at least one cached neighborhood.
    pub fn cached(&self) -> usize {
        self.n8
            .iter()
            .zip(&self.n4)
            .filter(|(a, b)| a.is_some() || b.is_some())
            .count()
    }

    pub fn neighbors8(&mut self, p: PatchId) -> &[PatchId] {
        let topology = self.topology;
        lookup(&mut self.n8, p, |p| topology.neighbors8(p))
    }

    pub fn neighbors4(&mut self, p: PatchId) -> &[PatchId] {
        let topology = self.topology;
        lookup(&mut self.n4, p, |p| topology.neighbors4(p))
    }
}

fn lookup(
    slots:   &mut [Option<Box<[PatchId]>>],
    p:       PatchId,
    compute: impl FnOnce(PatchId) -> Vec<PatchId>,
) -> &[PatchId] {
    match slots.get_mut(p.index()) {
        Some(slot) => &**slot.get_or_insert_with(|| compute(p).into_boxed_slice()),
        None => &[],
    }
}
