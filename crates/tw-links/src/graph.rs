//! Link adjacency.
//!
//! # Layout
//!
//! [`LinkManager`] keeps every live link as an [`Edge`] record plus two
//! multimaps keyed by turtle: `out` lists the links a turtle is `end1` of,
//! `inc` the links it is `end2` of.  Each list keeps link creation order,
//! and all neighbor queries walk those lists, so query results are
//! reproducible for a given creation history.  A third map indexes links by
//! `(end1, end2, breed)` for O(1) lookup.
//!
//! # Directedness
//!
//! Named link breeds have fixed directedness, registered with
//! [`LinkManager::declare_breed`].  The unbreeded `links` set takes the
//! directedness of its first link and keeps it until its last unbreeded
//! link dies.  Blessing a link of the other kind in between fails with
//! [`EngineError::MixedDirectedness`].
//!
//! Undirected links are stored with the lower who number as `end1`; the
//! caller normalizes before blessing.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};
use tw_agent::TieMode;
use tw_core::{BreedId, EngineError, EngineResult, LinkId, TurtleId};

use crate::tie::TieManager;

/// Adjacency record of one link.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub end1:     TurtleId,
    pub end2:     TurtleId,
    pub breed:    BreedId,
    pub directed: bool,
    pub tie_mode: TieMode,
}

impl Edge {
    pub fn new(end1: TurtleId, end2: TurtleId, breed: BreedId, directed: bool) -> Self {
        Edge { end1, end2, breed, directed, tie_mode: TieMode::None }
    }

    /// The endpoint opposite `t`, or `None` if `t` is not an endpoint.
    #[inline]
    pub fn other_end(&self, t: TurtleId) -> Option<TurtleId> {
        if t == self.end1 {
            Some(self.end2)
        } else if t == self.end2 {
            Some(self.end1)
        } else {
            None
        }
    }
}

/// Which links a neighbor query follows.
#[derive(Copy, Clone, Debug)]
pub enum LinkFilter<'a> {
    /// Every link.  While any breeded link exists, `from`/`to` queries only
    /// follow directed links and `with` queries only undirected ones.
    All,
    /// Links of one breed.  [`BreedId::LINKS`] selects unbreeded links.
    Breed(BreedId),
    /// An explicit set of links.
    Only(&'a FxHashSet<LinkId>),
}

#[derive(Clone, Debug, Default)]
pub struct LinkManager {
    edges:              FxHashMap<LinkId, Edge>,
    by_ends:            FxHashMap<(TurtleId, TurtleId, BreedId), LinkId>,
    out:                FxHashMap<TurtleId, Vec<LinkId>>,
    inc:                FxHashMap<TurtleId, Vec<LinkId>>,
    /// Named link breeds in declaration order, with fixed directedness.
    breeds:             Vec<(BreedId, bool)>,
    unbreeded_count:    usize,
    unbreeded_directed: Option<bool>,
    ties:               TieManager,
}

impl LinkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named link breed.  Re-declaring updates its directedness.
    pub fn declare_breed(&mut self, breed: BreedId, directed: bool) {
        match self.breeds.iter_mut().find(|(b, _)| *b == breed) {
            Some(entry) => entry.1 = directed,
            None => self.breeds.push((breed, directed)),
        }
    }

    /// Number of live links.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[inline]
    pub fn edge(&self, id: LinkId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    #[inline]
    pub fn ties(&self) -> &TieManager {
        &self.ties
    }

    /// Directedness of `breed`: fixed for named breeds, dynamic for the
    /// unbreeded set (`None` while it has no links).
    pub fn is_directed(&self, breed: BreedId) -> Option<bool> {
        if breed == BreedId::LINKS {
            self.unbreeded_directed
        } else {
            self.breeds.iter().find(|(b, _)| *b == breed).map(|(_, d)| *d)
        }
    }

    /// `true` while no breeded link exists.
    #[inline]
    fn only_unbreeded(&self) -> bool {
        self.unbreeded_count == self.edges.len()
    }

    /// Fail if a link of `breed` with the given directedness would mix
    /// directed and undirected links within the breed.
    pub fn check_directedness(&self, breed: BreedId, directed: bool) -> EngineResult<()> {
        match self.is_directed(breed) {
            Some(d) if d != directed => Err(EngineError::MixedDirectedness {
                breed: if breed == BreedId::LINKS { "links".into() } else { breed.to_string() },
            }),
            _ => Ok(()),
        }
    }

    // ── Creation and removal ──────────────────────────────────────────────

    /// Record a newly created link.
    pub fn bless(&mut self, id: LinkId, edge: Edge) -> EngineResult<()> {
        self.check_directedness(edge.breed, edge.directed)?;
        let key = (edge.end1, edge.end2, edge.breed);
        if self.by_ends.contains_key(&key) {
            return Err(EngineError::invariant(format!(
                "a {} link from {} to {} already exists",
                edge.breed, edge.end1, edge.end2
            )));
        }
        if edge.breed == BreedId::LINKS {
            if self.unbreeded_count == 0 {
                debug!(directed = edge.directed, "unbreeded links take directedness of first link");
                self.unbreeded_directed = Some(edge.directed);
            }
            self.unbreeded_count += 1;
        }
        if edge.tie_mode.is_tied() {
            self.ties.tied();
        }
        self.by_ends.insert(key, id);
        self.out.entry(edge.end1).or_default().push(id);
        self.inc.entry(edge.end2).or_default().push(id);
        self.edges.insert(id, edge);
        Ok(())
    }

    /// Forget a dying link: untie it and drop it from both adjacency maps.
    /// Returns its record, or `None` if it was not known.
    pub fn cleanup_link(&mut self, id: LinkId) -> Option<Edge> {
        let edge = self.edges.remove(&id)?;
        if edge.tie_mode.is_tied() {
            self.ties.untied();
        }
        self.by_ends.remove(&(edge.end1, edge.end2, edge.breed));
        remove_from(&mut self.out, edge.end1, id);
        remove_from(&mut self.inc, edge.end2, id);
        if edge.breed == BreedId::LINKS {
            self.unbreeded_count -= 1;
            if self.unbreeded_count == 0 {
                debug!("last unbreeded link died; directedness reset");
                self.unbreeded_directed = None;
            }
        }
        trace!(link = %id, "link cleaned up");
        Some(edge)
    }

    /// Detach a dying turtle: drop its adjacency entries first, then hand
    /// back every incident link (outgoing first) for the caller to kill.
    /// A link killed that way no longer finds the turtle in the maps, so
    /// the cascade cannot loop back.
    pub fn detach_turtle(&mut self, t: TurtleId) -> Vec<LinkId> {
        let mut links = self.out.remove(&t).unwrap_or_default();
        links.extend(self.inc.remove(&t).unwrap_or_default());
        links
    }

    /// Set a link's tie mode, keeping the tie count current.
    pub fn set_tie_mode(&mut self, id: LinkId, mode: TieMode) -> EngineResult<()> {
        let edge = self
            .edges
            .get_mut(&id)
            .ok_or_else(|| EngineError::invariant(format!("unknown {id}")))?;
        match (edge.tie_mode.is_tied(), mode.is_tied()) {
            (true, false) => self.ties.untied(),
            (false, true) => self.ties.tied(),
            _ => {}
        }
        edge.tie_mode = mode;
        Ok(())
    }

    /// Forget everything (all links died at once).
    pub fn reset(&mut self) {
        self.edges.clear();
        self.by_ends.clear();
        self.out.clear();
        self.inc.clear();
        self.unbreeded_count = 0;
        self.unbreeded_directed = None;
        self.ties.reset();
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// The link between `src` and `dest` in `breed`.  Directed breeds only
    /// match `src → dest`; undirected ones match either order.  With
    /// `include_all_breeds`, an unbreeded query that misses goes on to try
    /// every named breed in declaration order.
    pub fn find_link(
        &self,
        src:                TurtleId,
        dest:               TurtleId,
        breed:              BreedId,
        include_all_breeds: bool,
    ) -> Option<LinkId> {
        if self.is_directed(breed) == Some(true) {
            self.find_link_from(src, dest, breed, include_all_breeds)
        } else {
            self.find_link_from(src, dest, breed, include_all_breeds)
                .or_else(|| self.find_link_from(dest, src, breed, include_all_breeds))
        }
    }

    /// The link with exactly `end1 = src` and `end2 = dest`.
    pub fn find_link_from(
        &self,
        src:                TurtleId,
        dest:               TurtleId,
        breed:              BreedId,
        include_all_breeds: bool,
    ) -> Option<LinkId> {
        let found = self.by_ends.get(&(src, dest, breed)).copied();
        if found.is_some() || !include_all_breeds || breed != BreedId::LINKS {
            return found;
        }
        self.breeds
            .iter()
            .find_map(|(b, _)| self.by_ends.get(&(src, dest, *b)).copied())
    }

    fn passes(&self, id: LinkId, edge: &Edge, filter: LinkFilter<'_>, directed_query: bool) -> bool {
        match filter {
            LinkFilter::All => self.only_unbreeded() || edge.directed == directed_query,
            LinkFilter::Breed(b) => edge.breed == b,
            LinkFilter::Only(set) => set.contains(&id),
        }
    }

    fn list<'a>(&'a self, map: &'a FxHashMap<TurtleId, Vec<LinkId>>, t: TurtleId) -> impl Iterator<Item = (LinkId, &'a Edge)> + 'a {
        map.get(&t)
            .into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id).map(|e| (*id, e)))
    }

    /// Turtles at the far end of links leaving `src`, without duplicates.
    pub fn linked_from(&self, src: TurtleId, filter: LinkFilter<'_>) -> Vec<TurtleId> {
        let mut seen = FxHashSet::default();
        self.list(&self.out, src)
            .filter(|(id, e)| self.passes(*id, e, filter, true))
            .map(|(_, e)| e.end2)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Turtles at the near end of links arriving at `dest`.
    pub fn linked_to(&self, dest: TurtleId, filter: LinkFilter<'_>) -> Vec<TurtleId> {
        let mut seen = FxHashSet::default();
        self.list(&self.inc, dest)
            .filter(|(id, e)| self.passes(*id, e, filter, true))
            .map(|(_, e)| e.end1)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Turtles linked to `t` in either direction: incoming links first,
    /// then outgoing.
    pub fn linked_with(&self, t: TurtleId, filter: LinkFilter<'_>) -> Vec<TurtleId> {
        let mut seen = FxHashSet::default();
        let incoming = self.list(&self.inc, t).map(|(id, e)| (id, e, e.end1));
        let outgoing = self.list(&self.out, t).map(|(id, e)| (id, e, e.end2));
        incoming
            .chain(outgoing)
            .filter(|(id, e, _)| self.passes(*id, e, filter, false))
            .map(|(_, _, other)| other)
            .filter(|other| seen.insert(*other))
            .collect()
    }

    /// A link joining `a` to `b` that the filter accepts.  Directed walks
    /// only accept `a → b`.
    pub fn link_between(
        &self,
        a:        TurtleId,
        b:        TurtleId,
        filter:   LinkFilter<'_>,
        directed: bool,
    ) -> Option<LinkId> {
        let forward = self
            .list(&self.out, a)
            .find(|(id, e)| e.end2 == b && self.passes(*id, e, filter, directed));
        let found = match forward {
            Some(hit) => Some(hit),
            None if directed => None,
            None => self
                .list(&self.inc, a)
                .find(|(id, e)| e.end1 == b && self.passes(*id, e, filter, false)),
        };
        found.map(|(id, _)| id)
    }

    /// Links leaving `src` in `breed` (`BreedId::LINKS` for every breed).
    pub fn links_from(&self, src: TurtleId, breed: BreedId) -> Vec<LinkId> {
        self.list(&self.out, src)
            .filter(|(_, e)| breed == BreedId::LINKS || e.breed == breed)
            .map(|(id, _)| id)
            .collect()
    }

    /// Links arriving at `dest`.
    pub fn links_to(&self, dest: TurtleId, breed: BreedId) -> Vec<LinkId> {
        self.list(&self.inc, dest)
            .filter(|(_, e)| breed == BreedId::LINKS || e.breed == breed)
            .map(|(id, _)| id)
            .collect()
    }

    /// Links touching `t`: incoming first, then outgoing.
    pub fn links_with(&self, t: TurtleId, breed: BreedId) -> Vec<LinkId> {
        self.list(&self.inc, t)
            .chain(self.list(&self.out, t))
            .filter(|(_, e)| breed == BreedId::LINKS || e.breed == breed)
            .map(|(id, _)| id)
            .collect()
    }

    /// Turtles tied to `root` with the mode of the tying link: `end2` of
    /// tied links leaving it, then `end1` of tied undirected links arriving
    /// at it.
    pub fn tied_turtles(&self, root: TurtleId) -> Vec<(TurtleId, TieMode)> {
        if !self.ties.any() {
            return Vec::new();
        }
        let leaving = self
            .list(&self.out, root)
            .filter(|(_, e)| e.tie_mode.is_tied())
            .map(|(_, e)| (e.end2, e.tie_mode));
        let arriving = self
            .list(&self.inc, root)
            .filter(|(_, e)| !e.directed && e.tie_mode.is_tied())
            .map(|(_, e)| (e.end1, e.tie_mode));
        leaving.chain(arriving).collect()
    }
}

fn remove_from(map: &mut FxHashMap<TurtleId, Vec<LinkId>>, t: TurtleId, id: LinkId) {
    if let Some(list) = map.get_mut(&t) {
        list.retain(|l| *l != id);
        if list.is_empty() {
            map.remove(&t);
        }
    }
}
