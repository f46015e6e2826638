//! Network metrics over one link breed.
//!
//! `breed` chooses the network: a named link breed, or
//! [`BreedId::LINKS`] for every link.  Directed breeds are walked forward
//! only by the distance and path queries.  "No path" is `None`, never an
//! error.

use tw_agent::AgentSet;
use tw_core::{AgentKind, BreedId, EngineResult, LinkId, TurtleId};
use tw_links::metrics;

use crate::links::breed_filter;
use crate::World;

impl World {
    fn walks_forward(&self, breed: BreedId) -> bool {
        self.graph.is_directed(breed).unwrap_or(false)
    }

    /// Members of `set` within `radius` hops of `source`, in breadth-first
    /// order.
    pub fn in_link_radius(
        &self,
        source: TurtleId,
        set:    &AgentSet<TurtleId>,
        radius: f64,
        breed:  BreedId,
    ) -> EngineResult<AgentSet<TurtleId>> {
        self.turtle(source)?;
        self.schema.link_breed(breed)?;
        let hits = metrics::in_network_radius(&self.graph, source, radius, breed_filter(breed), |t| {
            set.contains(t, &self.turtles)
        });
        Ok(AgentSet::from_vec(AgentKind::Turtle, hits))
    }

    /// Hop count of a shortest path from `source` to `dest`.
    pub fn network_distance(&self, source: TurtleId, dest: TurtleId, breed: BreedId) -> EngineResult<Option<usize>> {
        self.turtle(source)?;
        self.turtle(dest)?;
        self.schema.link_breed(breed)?;
        Ok(metrics::network_distance(
            &self.graph,
            source,
            dest,
            breed_filter(breed),
            self.walks_forward(breed),
        ))
    }

    /// Turtles along one shortest path, `source` first and `dest` last.
    /// Ties between equally short paths are broken with the `main` stream.
    pub fn shortest_path_nodes(
        &mut self,
        source: TurtleId,
        dest:   TurtleId,
        breed:  BreedId,
    ) -> EngineResult<Option<Vec<TurtleId>>> {
        self.turtle(source)?;
        self.turtle(dest)?;
        self.schema.link_breed(breed)?;
        let directed = self.walks_forward(breed);
        Ok(metrics::shortest_path_nodes(
            &self.graph,
            &mut self.rng.main,
            source,
            dest,
            breed_filter(breed),
            directed,
        ))
    }

    /// Links along one shortest path, from `source` towards `dest`.
    pub fn shortest_path_links(
        &mut self,
        source: TurtleId,
        dest:   TurtleId,
        breed:  BreedId,
    ) -> EngineResult<Option<Vec<LinkId>>> {
        self.turtle(source)?;
        self.turtle(dest)?;
        self.schema.link_breed(breed)?;
        let directed = self.walks_forward(breed);
        Ok(metrics::shortest_path_links(
            &self.graph,
            &mut self.rng.main,
            source,
            dest,
            breed_filter(breed),
            directed,
        ))
    }

    /// Mean shortest-path length between the live members of `set`, or
    /// `None` if any two of them are disconnected or `set` has no live
    /// members.
    pub fn average_path_length(&self, set: &AgentSet<TurtleId>, breed: BreedId) -> EngineResult<Option<f64>> {
        self.schema.link_breed(breed)?;
        let nodes = set.to_vec(&self.turtles);
        Ok(metrics::average_path_length(&self.graph, &nodes, breed_filter(breed)))
    }
}
