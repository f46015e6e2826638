//! The `World` struct: ownership, lifecycle, ticks and `ask`.
//!
//! Agent-specific operations live in sibling modules as further `impl
//! World` blocks:
//!
//! | Module        | Operations                                              |
//! |---------------|---------------------------------------------------------|
//! | `turtles`     | create, hatch, die, breed change, motion, ties          |
//! | `links`       | create, die, breed / tie-mode, link neighbor queries    |
//! | `patches`     | patch lookup, neighbors, diffusion, in-radius           |
//! | `geometry`    | distance / towards between agents and points            |
//! | `network`     | BFS metrics over a link breed                           |
//! | `layout`      | spring, circle, radial and Tutte layouts                |
//! | `sets`        | global and breed sets, random picks                     |

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use tw_agent::{AgentSet, Arena, Link, Observer, Patch, Schema, Turtle};
use tw_core::{
    AgentKind, AirFlag, BreedId, EngineError, EngineResult, LinkId, PatchId, RngStreams,
    TickCounter, TurtleId, WorldConfig, WorldRng,
};
use tw_links::LinkManager;
use tw_topology::{Bounds, NeighborCache, Topology};

use crate::observer::{WorldEvent, WorldObserver};

/// The whole simulation state.
///
/// Every operation takes the agents it works on by id; nothing is reached
/// through globals.  Turtle and link ids are generational handles, so an id
/// kept past its agent's death reads as dead instead of aliasing a
/// newborn.
pub struct World {
    pub(crate) config:    WorldConfig,
    pub(crate) schema:    Schema,
    pub(crate) topology:  Topology,
    pub(crate) neighbors: NeighborCache,

    pub(crate) patches:     Vec<Patch>,
    pub(crate) all_patches: AgentSet<PatchId>,

    pub(crate) turtles:       Arena<TurtleId, Turtle>,
    pub(crate) all_turtles:   AgentSet<TurtleId>,
    pub(crate) turtle_breeds: FxHashMap<BreedId, AgentSet<TurtleId>>,
    pub(crate) next_who:      u64,

    pub(crate) links:       Arena<LinkId, Link>,
    pub(crate) all_links:   AgentSet<LinkId>,
    pub(crate) link_breeds: FxHashMap<BreedId, AgentSet<LinkId>>,
    pub(crate) graph:       LinkManager,

    pub(crate) globals: Observer,
    pub(crate) rng:     RngStreams,
    pub(crate) ticks:   TickCounter,
    pub(crate) air:     AirFlag,
    pub(crate) events:  Box<dyn WorldObserver>,
}

impl World {
    /// Assemble a world.  Use [`WorldBuilder`](crate::WorldBuilder).
    pub(crate) fn from_parts(
        config: WorldConfig,
        schema: Schema,
        air:    AirFlag,
        events: Box<dyn WorldObserver>,
    ) -> EngineResult<World> {
        config.validate()?;
        let topology = Topology::from_config(&config);

        let mut graph = LinkManager::new();
        let mut turtle_breeds = FxHashMap::default();
        let mut link_breeds = FxHashMap::default();
        for breed in schema.breeds() {
            if breed.id == BreedId::TURTLES || breed.id == BreedId::LINKS {
                continue;
            }
            if breed.is_turtle_breed() {
                turtle_breeds.insert(breed.id, AgentSet::ordered(AgentKind::Turtle));
            } else {
                if let Some(directed) = breed.fixed_directedness() {
                    graph.declare_breed(breed.id, directed);
                }
                link_breeds.insert(breed.id, AgentSet::ordered(AgentKind::Link));
            }
            debug!(breed = %breed.name, turtle = breed.is_turtle_breed(), "breed declared");
        }

        let mut world = World {
            rng:         RngStreams::new(config.seed, config.aux_seed),
            globals:     Observer::new(schema.globals()),
            neighbors:   NeighborCache::new(topology),
            topology,
            patches:     Vec::new(),
            all_patches: AgentSet::array(AgentKind::Patch),
            turtles:     Arena::new(),
            all_turtles: AgentSet::ordered(AgentKind::Turtle),
            turtle_breeds,
            next_who:    0,
            links:       Arena::new(),
            all_links:   AgentSet::ordered(AgentKind::Link),
            link_breeds,
            graph,
            ticks:       TickCounter::new(),
            air,
            events,
            schema,
            config,
        };
        world.build_patches();
        Ok(world)
    }

    pub(crate) fn emit(&mut self, event: WorldEvent) {
        self.events.on_event(&event);
    }

    fn build_patches(&mut self) {
        let bounds = *self.topology.bounds();
        let vars = self.schema.patches_own().zeroed();
        self.patches = bounds
            .patch_ids()
            .map(|id| {
                let (px, py) = bounds.coords(id);
                Patch::new(id, px, py, vars.clone())
            })
            .collect();
        self.all_patches = AgentSet::from_vec(AgentKind::Patch, bounds.patch_ids().collect());
        debug!(width = bounds.width(), height = bounds.height(), "patch grid built");
        self.emit(WorldEvent::GridBuilt { width: bounds.width(), height: bounds.height() });
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        self.topology.bounds()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds().width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds().height()
    }

    /// The link adjacency maps.
    #[inline]
    pub fn link_graph(&self) -> &LinkManager {
        &self.graph
    }

    /// The `main` stream: everything that affects model results.
    #[inline]
    pub fn main_rng(&mut self) -> &mut WorldRng {
        &mut self.rng.main
    }

    /// The `aux` stream: UI-facing and diagnostic draws only.
    #[inline]
    pub fn aux_rng(&mut self) -> &mut WorldRng {
        &mut self.rng.aux
    }

    /// Reseed the `main` stream.
    pub fn seed(&mut self, seed: u64) {
        self.rng.main.reseed(seed);
    }

    /// The cooperative yield / halt token polled by [`World::ask_turtles`]
    /// and friends.  Clone it to request a halt from another thread.
    #[inline]
    pub fn air(&self) -> &AirFlag {
        &self.air
    }

    // ── Globals ───────────────────────────────────────────────────────────

    pub fn global(&self, vn: usize) -> EngineResult<tw_core::Value> {
        self.globals.get_variable(vn)
    }

    pub fn set_global(&mut self, vn: usize, value: tw_core::Value) -> EngineResult<()> {
        self.globals.set_variable(vn, value)
    }

    /// Index of a global by name.
    pub fn global_index(&self, name: &str) -> Option<usize> {
        self.schema.globals().index_of(name)
    }

    // ── Ticks ─────────────────────────────────────────────────────────────

    pub fn ticks(&self) -> EngineResult<f64> {
        self.ticks.ticks()
    }

    pub fn reset_ticks(&mut self) {
        self.ticks.reset();
        self.emit(WorldEvent::TicksReset);
    }

    pub fn clear_ticks(&mut self) {
        self.ticks.clear();
    }

    pub fn tick(&mut self) -> EngineResult<f64> {
        let t = self.ticks.tick()?;
        self.emit(WorldEvent::Ticked(t));
        Ok(t)
    }

    pub fn tick_advance(&mut self, amount: f64) -> EngineResult<f64> {
        let t = self.ticks.advance(amount)?;
        self.emit(WorldEvent::Ticked(t));
        Ok(t)
    }

    // ── Clearing ──────────────────────────────────────────────────────────

    /// Kill every turtle and link at once and restart who numbering.
    pub fn clear_turtles(&mut self) {
        let count = self.turtles.len();
        self.clear_links();
        self.turtles.clear();
        self.all_turtles.clear();
        self.turtle_breeds.values_mut().for_each(AgentSet::clear);
        self.patches.iter_mut().for_each(|p| p.turtles_here.clear());
        self.next_who = 0;
        debug!(count, "turtles cleared");
        self.emit(WorldEvent::TurtlesCleared);
    }

    /// Kill every link at once.
    pub fn clear_links(&mut self) {
        if self.links.is_empty() {
            return;
        }
        self.links.clear();
        self.all_links.clear();
        self.link_breeds.values_mut().for_each(AgentSet::clear);
        self.graph.reset();
        self.emit(WorldEvent::LinksCleared);
    }

    /// Reset every patch's color, label and `patches-own` variables.
    pub fn clear_patches(&mut self) {
        self.patches.iter_mut().for_each(Patch::clear);
        self.emit(WorldEvent::PatchesCleared);
    }

    pub fn clear_globals(&mut self) {
        self.globals.clear();
    }

    /// Globals, ticks, turtles, links and patches.
    pub fn clear_all(&mut self) {
        self.clear_globals();
        self.clear_ticks();
        self.clear_turtles();
        self.clear_patches();
    }

    /// Change the world's extent.  Every turtle and link dies and the patch
    /// grid is rebuilt; cached neighborhoods are dropped.
    pub fn resize(&mut self, min_pxcor: i32, max_pxcor: i32, min_pycor: i32, max_pycor: i32) -> EngineResult<()> {
        let mut config = self.config.clone();
        config.min_pxcor = min_pxcor;
        config.max_pxcor = max_pxcor;
        config.min_pycor = min_pycor;
        config.max_pycor = max_pycor;
        config.validate()?;
        self.clear_turtles();
        self.config = config;
        self.topology = Topology::from_config(&self.config);
        self.neighbors.invalidate(self.topology);
        self.build_patches();
        Ok(())
    }

    /// Switch which axes wrap.  Patches and agents are kept.
    pub fn set_wrapping(&mut self, wrap_x: bool, wrap_y: bool) {
        self.config.wrap_x = wrap_x;
        self.config.wrap_y = wrap_y;
        self.topology = Topology::from_config(&self.config);
        self.neighbors.invalidate(self.topology);
        debug!(wrap_x, wrap_y, "topology changed");
    }

    // ── Ask ───────────────────────────────────────────────────────────────

    /// Poll the cooperative flag between agents.
    pub(crate) fn come_up_for_air(&mut self) -> EngineResult<()> {
        if self.air.take_air() {
            trace!("came up for air");
        }
        if self.air.halt_requested() {
            debug!("halt requested; stopping ask");
            self.emit(WorldEvent::Halted);
            return Err(EngineError::Halted);
        }
        Ok(())
    }

    /// Run `f` once for every live turtle of `set`, in shufflerator order.
    ///
    /// `f` may create or kill agents, including the one it was called for;
    /// turtles that die before their turn are skipped and newborns are not
    /// visited.  The first error stops the traversal and is returned.  A
    /// halt request surfaces as [`EngineError::Halted`].
    pub fn ask_turtles(
        &mut self,
        set:   &AgentSet<TurtleId>,
        mut f: impl FnMut(&mut World, TurtleId) -> EngineResult<()>,
    ) -> EngineResult<()> {
        let mut order = set.shufflerator(&mut self.rng.main, &self.turtles);
        while let Some(t) = order.next(&mut self.rng.main, &self.turtles) {
            self.come_up_for_air()?;
            f(self, t)?;
        }
        Ok(())
    }

    /// Run `f` once for every live link of `set`, in shufflerator order.
    pub fn ask_links(
        &mut self,
        set:   &AgentSet<LinkId>,
        mut f: impl FnMut(&mut World, LinkId) -> EngineResult<()>,
    ) -> EngineResult<()> {
        let mut order = set.shufflerator(&mut self.rng.main, &self.links);
        while let Some(l) = order.next(&mut self.rng.main, &self.links) {
            self.come_up_for_air()?;
            f(self, l)?;
        }
        Ok(())
    }

    /// Run `f` once for every patch of `set`, in shufflerator order.
    pub fn ask_patches(
        &mut self,
        set:   &AgentSet<PatchId>,
        mut f: impl FnMut(&mut World, PatchId) -> EngineResult<()>,
    ) -> EngineResult<()> {
        let live = tw_agent::AlwaysAlive;
        let mut order = set.shufflerator(&mut self.rng.main, &live);
        while let Some(p) = order.next(&mut self.rng.main, &live) {
            self.come_up_for_air()?;
            f(self, p)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("bounds", self.bounds())
            .field("topology", &self.topology.kind())
            .field("turtles", &self.turtles.len())
            .field("links", &self.links.len())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}
