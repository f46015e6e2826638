//! Network layouts applied to live turtles.
//!
//! The world gathers positions into index space (movable turtles first, in
//! shufflerator order, then any outside endpoints of the given links), runs
//! a `tw-layout` function and moves the turtles through the normal move
//! path, so wrapping, turtles-here and ties all apply.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use tw_agent::AgentSet;
use tw_core::{EngineError, EngineResult, LinkId, TurtleId};
use tw_layout::{circle, radial, spring_2d, tutte, LayoutGraph, Placement, SpringParams, TutteReport};
use tw_links::LinkFilter;

use crate::World;

/// Turtles in layout index order plus their positions and edges.
struct Gathered {
    turtles:   Vec<TurtleId>,
    positions: Vec<[f64; 2]>,
    graph:     LayoutGraph,
}

impl World {
    fn gather(&self, movable: Vec<TurtleId>, links: &AgentSet<LinkId>) -> EngineResult<Gathered> {
        let mut index: FxHashMap<TurtleId, usize> = FxHashMap::default();
        let mut positions = Vec::with_capacity(movable.len());
        for (i, &t) in movable.iter().enumerate() {
            let (x, y) = self.turtle_xy(t)?;
            positions.push([x, y]);
            index.insert(t, i);
        }
        let count = movable.len();
        let mut turtles = movable;

        let mut edges = Vec::new();
        for l in links.iter(&self.links) {
            let (e1, e2) = self.link_ends(l)?;
            let mut slot = |t: TurtleId| -> EngineResult<usize> {
                if let Some(&i) = index.get(&t) {
                    return Ok(i);
                }
                let (x, y) = self.turtle_xy(t)?;
                let i = turtles.len();
                turtles.push(t);
                positions.push([x, y]);
                index.insert(t, i);
                Ok(i)
            };
            let a = slot(e1)?;
            let b = slot(e2)?;
            edges.push((a, b));
        }
        Ok(Gathered { turtles, positions, graph: LayoutGraph::new(count, edges) })
    }

    /// Move the movable turtles to their new positions, in index order.
    fn scatter(&mut self, gathered: &Gathered) -> EngineResult<()> {
        let movable = gathered.graph.movable;
        for (&t, p) in gathered.turtles.iter().zip(&gathered.positions).take(movable) {
            self.move_turtle(t, p[0], p[1])?;
        }
        Ok(())
    }

    /// Face each placement's heading, then move onto it.  Every placement
    /// is checked against the world's edges before anything moves.
    fn place_all(&mut self, placed: &[(TurtleId, Placement)]) -> EngineResult<()> {
        if placed.iter().any(|(_, p)| self.topology.patch_at(p.x, p.y).is_none()) {
            return Err(EngineError::BeyondEdge);
        }
        for &(t, p) in placed {
            self.set_heading(t, p.heading)?;
            self.move_turtle(t, p.x, p.y)?;
        }
        Ok(())
    }

    // ── Spring ────────────────────────────────────────────────────────────

    /// One spring relaxation step over `nodes` joined by `links`.
    /// Endpoints outside `nodes` pull on their neighbors but do not move.
    pub fn layout_spring(
        &mut self,
        nodes:  &AgentSet<TurtleId>,
        links:  &AgentSet<LinkId>,
        params: &SpringParams,
    ) -> EngineResult<()> {
        let order = nodes.shuffled(&mut self.rng.main, &self.turtles);
        if order.is_empty() {
            return Ok(());
        }
        let mut gathered = self.gather(order, links)?;
        let bounds = *self.bounds();
        spring_2d(&mut gathered.positions, &gathered.graph, params, &bounds, &mut self.rng.main);
        self.scatter(&gathered)
    }

    // ── Circle ────────────────────────────────────────────────────────────

    /// Spread `nodes`, in shufflerator order, evenly around a circle of
    /// `radius` centred on the middle patch, each facing outward.
    ///
    /// # Errors
    ///
    /// [`EngineError::BeyondEdge`] if the circle leaves a non-wrapping
    /// world; no turtle moves.
    pub fn layout_circle(&mut self, nodes: &AgentSet<TurtleId>, radius: f64) -> EngineResult<()> {
        let order = nodes.shuffled(&mut self.rng.main, &self.turtles);
        self.layout_circle_ordered(&order, radius)
    }

    /// [`World::layout_circle`] in the given order.
    pub fn layout_circle_ordered(&mut self, turtles: &[TurtleId], radius: f64) -> EngineResult<()> {
        let placements = circle(turtles.len(), radius, self.bounds());
        let placed: Vec<(TurtleId, Placement)> = turtles.iter().copied().zip(placements).collect();
        self.place_all(&placed)
    }

    // ── Radial ────────────────────────────────────────────────────────────

    /// Lay the tree spanned breadth-first from `root` over `links` out in
    /// rings around the world centre.  Only members of `nodes` (plus
    /// `root`) join the tree; unreachable members stay where they are.
    pub fn layout_radial(
        &mut self,
        nodes: &AgentSet<TurtleId>,
        links: &AgentSet<LinkId>,
        root:  TurtleId,
    ) -> EngineResult<()> {
        self.turtle(root)?;
        let mut order = nodes.to_vec(&self.turtles);
        let root_index = match order.iter().position(|t| *t == root) {
            Some(i) => i,
            None => {
                order.push(root);
                order.len() - 1
            }
        };
        let index: FxHashMap<TurtleId, usize> = order.iter().enumerate().map(|(i, t)| (*t, i)).collect();
        let link_set: FxHashSet<LinkId> = links.iter(&self.links).collect();
        let count = order.len();

        let placements = radial(
            count,
            root_index,
            |i| {
                self.graph
                    .linked_with(order[i], LinkFilter::Only(&link_set))
                    .into_iter()
                    .map(|t| index.get(&t).copied().unwrap_or(count))
                    .collect()
            },
            self.bounds(),
        );
        let placed: Vec<(TurtleId, Placement)> = order
            .iter()
            .zip(placements)
            .filter_map(|(t, p)| p.map(|p| (*t, p)))
            .collect();
        self.place_all(&placed)
    }

    // ── Tutte ─────────────────────────────────────────────────────────────

    /// Pin the outside endpoints of `links` on a circle of `radius`, then
    /// move every member of `nodes` towards the mean of its neighbors until
    /// no step moves a turtle further than `epsilon`, or `max_iterations`
    /// steps have run.
    pub fn layout_tutte(
        &mut self,
        nodes:          &AgentSet<TurtleId>,
        links:          &AgentSet<LinkId>,
        radius:         f64,
        max_iterations: usize,
        epsilon:        f64,
    ) -> EngineResult<TutteReport> {
        let order = nodes.shuffled(&mut self.rng.main, &self.turtles);
        let mut gathered = self.gather(order, links)?;

        let anchors: Vec<TurtleId> = gathered.graph.anchors().into_iter().map(|i| gathered.turtles[i]).collect();
        self.layout_circle_ordered(&anchors, radius)?;
        debug!(movable = gathered.graph.movable, anchors = anchors.len(), "tutte anchors placed");
        for i in gathered.graph.anchors() {
            let (x, y) = self.turtle_xy(gathered.turtles[i])?;
            gathered.positions[i] = [x, y];
        }

        let bounds = *self.bounds();
        let report = tutte(&mut gathered.positions, &gathered.graph, &bounds, max_iterations, epsilon);
        self.scatter(&gathered)?;
        Ok(report)
    }
}
