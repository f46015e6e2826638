//! Distance and heading between agents and points.
//!
//! Every query takes a `wrap` flag.  With `wrap` the shortest route on the
//! world's manifold is used; without it, plain Euclidean geometry, as the
//! `-nowrap` primitives do.

use tw_core::geom::{euclidean, heading_from_delta};
use tw_core::{AgentRef, EngineError, EngineResult};

use crate::World;

impl World {
    /// Location of a turtle or patch centre.  Links have no single
    /// location.
    pub fn agent_xy(&self, agent: AgentRef) -> EngineResult<(f64, f64)> {
        match agent {
            AgentRef::Turtle(t) => self.turtle_xy(t),
            AgentRef::Patch(p) => {
                let (px, py) = self.patch_coords(p)?;
                Ok((px as f64, py as f64))
            }
            AgentRef::Link(_) => Err(EngineError::domain("expected a turtle or a patch but got a link")),
        }
    }

    pub fn distance_xy(&self, x1: f64, y1: f64, x2: f64, y2: f64, wrap: bool) -> f64 {
        if wrap {
            self.topology.distance_wrap(x1, y1, x2, y2)
        } else {
            euclidean(x1, y1, x2, y2)
        }
    }

    pub fn distance(&self, from: AgentRef, to: AgentRef, wrap: bool) -> EngineResult<f64> {
        let (x1, y1) = self.agent_xy(from)?;
        let (x2, y2) = self.agent_xy(to)?;
        Ok(self.distance_xy(x1, y1, x2, y2, wrap))
    }

    /// Heading from `(x1, y1)` to `(x2, y2)`.  Fails with
    /// [`EngineError::NoHeading`] when the points coincide.
    pub fn towards_xy(&self, x1: f64, y1: f64, x2: f64, y2: f64, wrap: bool) -> EngineResult<f64> {
        if wrap {
            self.topology.towards_wrap(x1, y1, x2, y2)
        } else {
            heading_from_delta(x2 - x1, y2 - y1, x1, y1)
        }
    }

    pub fn towards(&self, from: AgentRef, to: AgentRef, wrap: bool) -> EngineResult<f64> {
        let (x1, y1) = self.agent_xy(from)?;
        let (x2, y2) = self.agent_xy(to)?;
        self.towards_xy(x1, y1, x2, y2, wrap)
    }
}
