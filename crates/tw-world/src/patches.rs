//! Patch lookup, neighborhoods, diffusion and radius queries.

use tracing::debug;
use tw_agent::patch::{VAR_PXCOR, VAR_PYCOR};
use tw_agent::{AgentSet, AlwaysAlive, Patch, PATCH_BUILTINS};
use tw_core::geom::heading_sin_cos;
use tw_core::{AgentKind, AgentRef, EngineError, EngineResult, PatchId, TurtleId, Value};
use tw_topology::{diffuse4, diffuse8, Topology};

use crate::World;

impl World {
    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn patch(&self, p: PatchId) -> EngineResult<&Patch> {
        self.patches
            .get(p.index())
            .ok_or_else(|| EngineError::invariant(format!("no {p} in a {}x{} world", self.width(), self.height())))
    }

    fn patch_mut(&mut self, p: PatchId) -> EngineResult<&mut Patch> {
        let (w, h) = (self.width(), self.height());
        self.patches
            .get_mut(p.index())
            .ok_or_else(|| EngineError::invariant(format!("no {p} in a {w}x{h} world")))
    }

    #[inline]
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    pub fn patch_coords(&self, p: PatchId) -> EngineResult<(i32, i32)> {
        let patch = self.patch(p)?;
        Ok((patch.pxcor(), patch.pycor()))
    }

    /// The patch containing `(x, y)`, rounding to the nearest patch centre.
    /// `None` beyond a non-wrapping edge.
    #[inline]
    pub fn patch_at(&self, x: f64, y: f64) -> Option<PatchId> {
        self.topology.patch_at(x, y)
    }

    /// The patch at integer coordinates, after wrapping.
    #[inline]
    pub fn patch_at_coords(&self, pxcor: i32, pycor: i32) -> Option<PatchId> {
        self.topology.patch_at_coords(pxcor, pycor)
    }

    /// The patch `t` stands on.
    pub fn patch_here(&self, t: TurtleId) -> EngineResult<PatchId> {
        let (x, y) = self.turtle_xy(t)?;
        self.patch_under(x, y)
    }

    /// The patch `distance` away from `from` along `heading`.
    pub fn patch_at_heading_and_distance(
        &self,
        from:     AgentRef,
        heading:  f64,
        distance: f64,
    ) -> EngineResult<Option<PatchId>> {
        let (x, y) = self.agent_xy(from)?;
        let (sin, cos) = heading_sin_cos(tw_core::geom::normalize_heading(heading));
        Ok(self.patch_at(x + distance * sin, y + distance * cos))
    }

    // ── Variables ─────────────────────────────────────────────────────────

    pub fn patch_variable(&self, p: PatchId, vn: usize) -> EngineResult<Value> {
        self.patch(p)?.get_variable(vn)
    }

    pub fn set_patch_variable(&mut self, p: PatchId, vn: usize, value: Value) -> EngineResult<()> {
        self.patch_mut(p)?.set_variable(vn, value)
    }

    /// Index of a builtin or `patches-own` variable by name.
    pub fn patch_var_index(&self, name: &str) -> Option<usize> {
        self.schema.patch_var_index(name)
    }

    // ── Neighborhoods ─────────────────────────────────────────────────────

    /// The 8-neighborhood of `p` (N, E, S, W, NE, SE, SW, NW), cached.
    pub fn neighbors(&mut self, p: PatchId) -> &[PatchId] {
        self.neighbors.neighbors8(p)
    }

    /// The 4-neighborhood of `p` (N, E, S, W), cached.
    pub fn neighbors4(&mut self, p: PatchId) -> &[PatchId] {
        self.neighbors.neighbors4(p)
    }

    // ── Diffusion ─────────────────────────────────────────────────────────

    /// Share `amount` of every patch's `vn` value equally among its eight
    /// neighbors, all patches at once.
    ///
    /// # Errors
    ///
    /// - a domain error if `amount` is outside `[0, 1]`
    /// - [`EngineError::PatchNotNumeric`] naming the first patch (in
    ///   storage order) whose value is not a number; nothing is written
    pub fn diffuse(&mut self, vn: usize, amount: f64) -> EngineResult<()> {
        self.diffuse_with(vn, amount, diffuse8)
    }

    /// [`World::diffuse`] over the 4-neighborhood.
    pub fn diffuse4(&mut self, vn: usize, amount: f64) -> EngineResult<()> {
        self.diffuse_with(vn, amount, diffuse4)
    }

    fn diffuse_with(
        &mut self,
        vn:      usize,
        amount:  f64,
        stencil: fn(&Topology, &[f64], f64) -> Vec<f64>,
    ) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&amount) {
            return Err(EngineError::domain(format!(
                "diffusion amount must be between 0 and 1, not {amount}"
            )));
        }
        if vn == VAR_PXCOR || vn == VAR_PYCOR {
            return Err(EngineError::ReadOnlyVariable { kind: AgentKind::Patch, name: PATCH_BUILTINS[vn] });
        }

        let old = self.numeric_grid(vn)?;
        let new = stencil(&self.topology, &old, amount);
        let mut changed = 0usize;
        for ((patch, before), after) in self.patches.iter_mut().zip(&old).zip(new) {
            if after != *before {
                patch.set_variable(vn, Value::Number(after))?;
                changed += 1;
            }
        }
        debug!(var = vn, amount, changed, "diffused");
        Ok(())
    }

    /// Every patch's `vn` value as a number, in storage order.
    fn numeric_grid(&self, vn: usize) -> EngineResult<Vec<f64>> {
        self.patches
            .iter()
            .map(|patch| {
                let value = patch.get_variable(vn)?;
                value.as_number().ok_or_else(|| EngineError::PatchNotNumeric {
                    pxcor: patch.pxcor(),
                    pycor: patch.pycor(),
                    var:   self.patch_var_name(vn),
                    found: value.to_string(),
                })
            })
            .collect()
    }

    fn patch_var_name(&self, vn: usize) -> String {
        PATCH_BUILTINS
            .get(vn)
            .map(|s| s.to_string())
            .or_else(|| self.schema.patches_own().name(vn - PATCH_BUILTINS.len()).map(str::to_owned))
            .unwrap_or_else(|| format!("#{vn}"))
    }

    // ── Radius queries ────────────────────────────────────────────────────

    /// Members of `set` within `radius` of `center` (wrapped distance),
    /// in set order.
    pub fn turtles_in_radius(
        &self,
        center: AgentRef,
        set:    &AgentSet<TurtleId>,
        radius: f64,
    ) -> EngineResult<AgentSet<TurtleId>> {
        let (cx, cy) = self.radius_center(center, radius)?;
        let hits = set
            .iter(&self.turtles)
            .filter(|t| {
                self.turtles
                    .get(*t)
                    .is_some_and(|tt| self.topology.distance_wrap(cx, cy, tt.xcor, tt.ycor) <= radius)
            })
            .collect();
        Ok(AgentSet::from_vec(AgentKind::Turtle, hits))
    }

    /// Patches of `set` whose centres lie within `radius` of `center`.
    pub fn patches_in_radius(
        &self,
        center: AgentRef,
        set:    &AgentSet<PatchId>,
        radius: f64,
    ) -> EngineResult<AgentSet<PatchId>> {
        let (cx, cy) = self.radius_center(center, radius)?;
        let hits = set
            .iter(&AlwaysAlive)
            .filter(|p| {
                self.patches.get(p.index()).is_some_and(|patch| {
                    let (px, py) = (patch.pxcor() as f64, patch.pycor() as f64);
                    self.topology.distance_wrap(cx, cy, px, py) <= radius
                })
            })
            .collect();
        Ok(AgentSet::from_vec(AgentKind::Patch, hits))
    }

    fn radius_center(&self, center: AgentRef, radius: f64) -> EngineResult<(f64, f64)> {
        if radius < 0.0 {
            return Err(EngineError::domain(format!("radius cannot be negative: {radius}")));
        }
        self.agent_xy(center)
    }
}
