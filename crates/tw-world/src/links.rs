//! Link lifecycle, variables, ties and link-neighbor queries.

use tracing::trace;
use tw_agent::link::{VAR_LBREED, VAR_TIE_MODE};
use tw_agent::{AgentSet, Link, TieMode};
use tw_core::{AgentKind, BreedId, EngineError, EngineResult, LinkId, TurtleId, Value};
use tw_links::{Edge, LinkFilter};

use crate::observer::WorldEvent;
use crate::World;

/// `links` selects every breed; a named breed selects only itself.
pub(crate) fn breed_filter<'a>(breed: BreedId) -> LinkFilter<'a> {
    if breed == BreedId::LINKS {
        LinkFilter::All
    } else {
        LinkFilter::Breed(breed)
    }
}

impl World {
    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn link(&self, l: LinkId) -> EngineResult<&Link> {
        self.links.get(l).ok_or(EngineError::DeadAgent(AgentKind::Link))
    }

    fn link_mut(&mut self, l: LinkId) -> EngineResult<&mut Link> {
        self.links.get_mut(l).ok_or(EngineError::DeadAgent(AgentKind::Link))
    }

    #[inline]
    pub fn is_link_alive(&self, l: LinkId) -> bool {
        self.links.contains(l)
    }

    #[inline]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// The link joining `a` and `b` in `breed`.  Directed breeds only
    /// match `a → b`.  Asking the unbreeded set searches every breed.
    pub fn find_link(&self, a: TurtleId, b: TurtleId, breed: BreedId) -> Option<LinkId> {
        self.graph.find_link(a, b, breed, breed == BreedId::LINKS)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Create an undirected link between `a` and `b`.  `end1` is whichever
    /// has the lower who number.  An existing link of the breed between the
    /// two is returned instead of creating another.
    pub fn create_link_with(&mut self, a: TurtleId, b: TurtleId, breed: BreedId) -> EngineResult<LinkId> {
        let (wa, wb) = (self.turtle(a)?.who, self.turtle(b)?.who);
        let (e1, e2) = if wa <= wb { (a, b) } else { (b, a) };
        self.create_link(e1, e2, breed, false)
    }

    /// Create a directed link from `src` to `dest`.
    pub fn create_link_to(&mut self, src: TurtleId, dest: TurtleId, breed: BreedId) -> EngineResult<LinkId> {
        self.create_link(src, dest, breed, true)
    }

    /// Create a directed link from `src` to `dest`, seen from `dest`.
    #[inline]
    pub fn create_link_from(&mut self, dest: TurtleId, src: TurtleId, breed: BreedId) -> EngineResult<LinkId> {
        self.create_link_to(src, dest, breed)
    }

    fn create_link(&mut self, e1: TurtleId, e2: TurtleId, breed: BreedId, directed: bool) -> EngineResult<LinkId> {
        self.schema.link_breed(breed)?;
        if e1 == e2 {
            return Err(EngineError::domain("a turtle cannot link to itself"));
        }
        let who1 = self.turtle(e1)?.who;
        let who2 = self.turtle(e2)?.who;
        self.graph.check_directedness(breed, directed)?;
        if let Some(existing) = self.graph.find_link(e1, e2, breed, false) {
            return Ok(existing);
        }

        let vars = self.schema.link_user_vars(breed)?;
        let link = Link::new((e1, who1), (e2, who2), breed, directed, vars);
        let key = link.key();
        let id = self.links.insert(link);
        if let Err(e) = self.graph.bless(id, Edge::new(e1, e2, breed, directed)) {
            self.links.remove(id);
            return Err(e);
        }
        self.all_links.add(key, id);
        if let Some(set) = self.link_breeds.get_mut(&breed) {
            set.add(key, id);
        }
        self.emit(WorldEvent::LinkBorn(id));
        Ok(id)
    }

    /// Kill `l`.  Returns `false` if it was already dead.
    pub fn link_die(&mut self, l: LinkId) -> bool {
        self.graph.cleanup_link(l);
        let Some(link) = self.links.remove(l) else {
            return false;
        };
        self.all_links.remove(l);
        if let Some(set) = self.link_breeds.get_mut(&link.breed) {
            set.remove(l);
        }
        trace!(link = %l, end1 = link.end1_who, end2 = link.end2_who, "link died");
        self.emit(WorldEvent::LinkDied(l));
        true
    }

    /// Move `l` into another link breed of the same directedness.
    pub fn set_link_breed(&mut self, l: LinkId, breed: BreedId) -> EngineResult<()> {
        self.schema.link_breed(breed)?;
        let link = self.link(l)?;
        let (old, e1, e2, directed, tie_mode) = (link.breed, link.end1, link.end2, link.directed, link.tie_mode);
        if old == breed {
            return Ok(());
        }
        self.graph.check_directedness(breed, directed)?;
        if self.graph.find_link_from(e1, e2, breed, false).is_some() {
            return Err(EngineError::domain(format!(
                "there is already a {} link between these turtles",
                self.schema.breed(breed)?.singular
            )));
        }
        let plan = self.schema.link_remap_plan(old, breed)?;

        self.graph.cleanup_link(l);
        let mut edge = Edge::new(e1, e2, breed, directed);
        edge.tie_mode = tie_mode;
        self.graph.bless(l, edge)?;

        let link = self.link_mut(l)?;
        let vars = std::mem::take(&mut link.vars);
        link.vars = plan.apply(vars);
        link.breed = breed;
        let key = link.key();

        self.all_links.remove(l);
        self.all_links.add(key, l);
        if let Some(set) = self.link_breeds.get_mut(&old) {
            set.remove(l);
        }
        if let Some(set) = self.link_breeds.get_mut(&breed) {
            set.add(key, l);
        }
        Ok(())
    }

    // ── Variables ─────────────────────────────────────────────────────────

    pub fn link_variable(&self, l: LinkId, vn: usize) -> EngineResult<Value> {
        self.link(l)?.get_variable(vn)
    }

    /// Set variable `vn` of `l`.  `breed` and `tie-mode` update the link
    /// graph as well.
    pub fn set_link_variable(&mut self, l: LinkId, vn: usize, value: Value) -> EngineResult<()> {
        match vn {
            VAR_LBREED => match value {
                Value::Breed(b) => self.set_link_breed(l, b),
                other => Err(EngineError::WrongType {
                    kind:     AgentKind::Link,
                    name:     "breed".into(),
                    expected: "link breed",
                    found:    other.to_string(),
                }),
            },
            VAR_TIE_MODE => {
                let mode = Link::parse_tie_mode(&value)?;
                self.set_tie_mode(l, mode)
            }
            _ => self.link_mut(l)?.set_variable(vn, value),
        }
    }

    // ── Ties ──────────────────────────────────────────────────────────────

    pub fn set_tie_mode(&mut self, l: LinkId, mode: TieMode) -> EngineResult<()> {
        self.link(l)?;
        self.graph.set_tie_mode(l, mode)?;
        self.link_mut(l)?.tie_mode = mode;
        Ok(())
    }

    /// Tie `l` rigidly: the far end follows moves and turns of the near end.
    pub fn tie(&mut self, l: LinkId) -> EngineResult<()> {
        self.set_tie_mode(l, TieMode::Fixed)
    }

    pub fn untie(&mut self, l: LinkId) -> EngineResult<()> {
        self.set_tie_mode(l, TieMode::None)
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    pub fn link_ends(&self, l: LinkId) -> EngineResult<(TurtleId, TurtleId)> {
        let link = self.link(l)?;
        Ok((link.end1, link.end2))
    }

    /// The endpoint of `l` that is not `t`.
    pub fn other_end(&self, l: LinkId, t: TurtleId) -> EngineResult<TurtleId> {
        self.link(l)?
            .other_end(t)
            .ok_or_else(|| EngineError::domain(format!("{t} is not an endpoint of {l}")))
    }

    /// Wrapped distance between the endpoints.
    pub fn link_length(&self, l: LinkId) -> EngineResult<f64> {
        let (e1, e2) = self.link_ends(l)?;
        let (x1, y1) = self.turtle_xy(e1)?;
        let (x2, y2) = self.turtle_xy(e2)?;
        Ok(self.topology.distance_wrap(x1, y1, x2, y2))
    }

    /// Wrapped heading from `end1` to `end2`.
    pub fn link_heading(&self, l: LinkId) -> EngineResult<f64> {
        let (e1, e2) = self.link_ends(l)?;
        let (x1, y1) = self.turtle_xy(e1)?;
        let (x2, y2) = self.turtle_xy(e2)?;
        self.topology.towards_wrap(x1, y1, x2, y2)
    }

    // ── Link sets ─────────────────────────────────────────────────────────

    /// Every link of `breed` touching `t`: incoming first, then outgoing.
    pub fn my_links(&self, t: TurtleId, breed: BreedId) -> EngineResult<AgentSet<LinkId>> {
        self.turtle(t)?;
        Ok(AgentSet::from_vec(AgentKind::Link, self.graph.links_with(t, breed)))
    }

    /// Links `t` can travel out along: directed links leaving it and
    /// undirected links in either direction.
    pub fn my_out_links(&self, t: TurtleId, breed: BreedId) -> EngineResult<AgentSet<LinkId>> {
        self.turtle(t)?;
        let mut out = self.graph.links_from(t, breed);
        out.extend(self.undirected(self.graph.links_to(t, breed)));
        Ok(AgentSet::from_vec(AgentKind::Link, out))
    }

    /// Links `t` can be reached along: directed links arriving at it and
    /// undirected links in either direction.
    pub fn my_in_links(&self, t: TurtleId, breed: BreedId) -> EngineResult<AgentSet<LinkId>> {
        self.turtle(t)?;
        let mut inc = self.graph.links_to(t, breed);
        inc.extend(self.undirected(self.graph.links_from(t, breed)));
        Ok(AgentSet::from_vec(AgentKind::Link, inc))
    }

    fn undirected(&self, links: Vec<LinkId>) -> impl Iterator<Item = LinkId> + '_ {
        links
            .into_iter()
            .filter(|l| self.graph.edge(*l).is_some_and(|e| !e.directed))
    }

    // ── Link neighbors ────────────────────────────────────────────────────

    /// Turtles joined to `t` by a link of `breed` in either direction.
    pub fn link_neighbors(&self, t: TurtleId, breed: BreedId) -> EngineResult<AgentSet<TurtleId>> {
        self.turtle(t)?;
        Ok(AgentSet::from_vec(AgentKind::Turtle, self.graph.linked_with(t, breed_filter(breed))))
    }

    /// Turtles at the far end of links of `breed` leaving `t`.
    pub fn out_link_neighbors(&self, t: TurtleId, breed: BreedId) -> EngineResult<AgentSet<TurtleId>> {
        self.turtle(t)?;
        Ok(AgentSet::from_vec(AgentKind::Turtle, self.graph.linked_from(t, breed_filter(breed))))
    }

    /// Turtles at the near end of links of `breed` arriving at `t`.
    pub fn in_link_neighbors(&self, t: TurtleId, breed: BreedId) -> EngineResult<AgentSet<TurtleId>> {
        self.turtle(t)?;
        Ok(AgentSet::from_vec(AgentKind::Turtle, self.graph.linked_to(t, breed_filter(breed))))
    }

    /// Whether a link of `breed` joins `a` and `b` in either direction.
    pub fn is_link_neighbor(&self, a: TurtleId, b: TurtleId, breed: BreedId) -> bool {
        self.graph.link_between(a, b, breed_filter(breed), false).is_some()
    }
}
