//! Turtle lifecycle, variables, motion and tie propagation.

use rustc_hash::FxHashSet;
use tracing::{trace, warn};
use tw_agent::turtle::{VAR_BREED, VAR_HEADING, VAR_XCOR, VAR_YCOR};
use tw_agent::{TieMode, Turtle, TURTLE_BUILTINS};
use tw_core::geom::{finite, heading_sin_cos, subtract_headings};
use tw_core::{AgentKind, AgentRef, BreedId, EngineError, EngineResult, PatchId, TurtleId, Value};

use crate::observer::WorldEvent;
use crate::World;

/// Turtles already moved or turned while propagating one root change.
type Seen = FxHashSet<TurtleId>;

/// Sines and cosines smaller than this are treated as zero when orbiting
/// tied turtles, so quarter turns land exactly on the axes.
const INFINITESIMAL: f64 = 3.2e-15;

/// Number of base colors a new turtle's color is drawn from.
const BASE_COLORS: usize = 14;

impl World {
    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn turtle(&self, t: TurtleId) -> EngineResult<&Turtle> {
        self.turtles.get(t).ok_or(EngineError::DeadAgent(AgentKind::Turtle))
    }

    pub(crate) fn turtle_mut(&mut self, t: TurtleId) -> EngineResult<&mut Turtle> {
        self.turtles.get_mut(t).ok_or(EngineError::DeadAgent(AgentKind::Turtle))
    }

    #[inline]
    pub fn is_turtle_alive(&self, t: TurtleId) -> bool {
        self.turtles.contains(t)
    }

    #[inline]
    pub fn turtle_count(&self) -> usize {
        self.turtles.len()
    }

    /// The live turtle with this who number.
    pub fn turtle_by_who(&self, who: u64) -> Option<TurtleId> {
        self.turtles.iter().find(|(_, t)| t.who == who).map(|(id, _)| id)
    }

    pub fn turtle_xy(&self, t: TurtleId) -> EngineResult<(f64, f64)> {
        let turtle = self.turtle(t)?;
        Ok((turtle.xcor, turtle.ycor))
    }

    /// Turtles standing on `p`, in arrival order.
    pub fn turtles_here(&self, p: PatchId) -> &[TurtleId] {
        self.patches.get(p.index()).map(|p| p.turtles_here.as_slice()).unwrap_or(&[])
    }

    /// The patch containing an in-world point.
    pub(crate) fn patch_under(&self, x: f64, y: f64) -> EngineResult<PatchId> {
        self.topology
            .patch_at(x, y)
            .ok_or_else(|| EngineError::invariant(format!("({x}, {y}) lies outside the patch grid")))
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Create `n` turtles of `breed` at the origin, each with a random base
    /// color and a random whole-degree heading drawn from the `main`
    /// stream (color first).
    pub fn create_turtles(&mut self, n: usize, breed: BreedId) -> EngineResult<Vec<TurtleId>> {
        self.schema.turtle_breed(breed)?;
        let vars = self.schema.turtle_user_vars(breed)?;
        let mut born = Vec::with_capacity(n);
        for _ in 0..n {
            let mut turtle = Turtle::new(self.next_who, breed, vars.clone());
            self.next_who += 1;
            turtle.color = Value::Number((5 + 10 * self.rng.main.next_int(BASE_COLORS)) as f64);
            turtle.heading = self.rng.main.next_int(360) as f64;
            born.push(self.spawn(turtle)?);
        }
        Ok(born)
    }

    /// Create `n` turtles of `breed` on the centre of patch `p`, as
    /// `create_turtles` does otherwise.
    pub fn sprout(&mut self, p: PatchId, n: usize, breed: BreedId) -> EngineResult<Vec<TurtleId>> {
        let (px, py) = self.patch_coords(p)?;
        let born = self.create_turtles(n, breed)?;
        for &t in &born {
            self.move_turtle(t, px as f64, py as f64)?;
        }
        Ok(born)
    }

    /// `n` copies of `parent`: same position, heading, breed and variables,
    /// fresh who numbers.  Links and ties are not copied.
    pub fn hatch(&mut self, parent: TurtleId, n: usize) -> EngineResult<Vec<TurtleId>> {
        let template = self.turtle(parent)?.clone();
        let mut born = Vec::with_capacity(n);
        for _ in 0..n {
            let child = template.hatch(self.next_who);
            self.next_who += 1;
            born.push(self.spawn(child)?);
        }
        Ok(born)
    }

    fn spawn(&mut self, turtle: Turtle) -> EngineResult<TurtleId> {
        let (key, breed) = (turtle.key(), turtle.breed);
        let here = self.patch_under(turtle.xcor, turtle.ycor)?;
        let id = self.turtles.insert(turtle);
        self.all_turtles.add(key, id);
        if let Some(set) = self.turtle_breeds.get_mut(&breed) {
            set.add(key, id);
        }
        self.patches[here.index()].turtle_arrived(id);
        self.emit(WorldEvent::TurtleBorn(id));
        Ok(id)
    }

    /// Kill `t`: its links die first, then it leaves its patch, its breed
    /// set and the turtle set.  Returns `false` if it was already dead.
    pub fn turtle_die(&mut self, t: TurtleId) -> bool {
        if !self.turtles.contains(t) {
            return false;
        }
        let links = self.graph.detach_turtle(t);
        trace!(turtle = %t, links = links.len(), "turtle dying");
        for l in links {
            self.link_die(l);
        }
        let Some(turtle) = self.turtles.remove(t) else {
            return false;
        };
        if let Some(p) = self.topology.patch_at(turtle.xcor, turtle.ycor) {
            self.patches[p.index()].turtle_left(t);
        }
        self.all_turtles.remove(t);
        if let Some(set) = self.turtle_breeds.get_mut(&turtle.breed) {
            set.remove(t);
        }
        self.emit(WorldEvent::TurtleDied(t));
        true
    }

    /// Move `t` into `breed`, carrying over variables both breeds share by
    /// name and zeroing the rest.
    pub fn set_turtle_breed(&mut self, t: TurtleId, breed: BreedId) -> EngineResult<()> {
        self.schema.turtle_breed(breed)?;
        let old = self.turtle(t)?.breed;
        if old == breed {
            return Ok(());
        }
        let plan = self.schema.turtle_remap_plan(old, breed)?;
        let turtle = self.turtle_mut(t)?;
        let vars = std::mem::take(&mut turtle.vars);
        turtle.vars = plan.apply(vars);
        turtle.breed = breed;
        let key = turtle.key();
        if let Some(set) = self.turtle_breeds.get_mut(&old) {
            set.remove(t);
        }
        if let Some(set) = self.turtle_breeds.get_mut(&breed) {
            set.add(key, t);
        }
        trace!(turtle = %t, from = %old, to = %breed, "breed changed");
        Ok(())
    }

    // ── Variables ─────────────────────────────────────────────────────────

    pub fn turtle_variable(&self, t: TurtleId, vn: usize) -> EngineResult<Value> {
        self.turtle(t)?.get_variable(vn)
    }

    /// Set variable `vn` of `t`.  Position, heading and breed go through
    /// wrapping, tie propagation and the breed remap respectively.
    pub fn set_turtle_variable(&mut self, t: TurtleId, vn: usize, value: Value) -> EngineResult<()> {
        match vn {
            VAR_XCOR => {
                let x = turtle_number(vn, &value)?;
                let y = self.turtle(t)?.ycor;
                self.move_turtle(t, x, y)
            }
            VAR_YCOR => {
                let y = turtle_number(vn, &value)?;
                let x = self.turtle(t)?.xcor;
                self.move_turtle(t, x, y)
            }
            VAR_HEADING => {
                let h = turtle_number(vn, &value)?;
                self.set_heading(t, h)
            }
            VAR_BREED => match value {
                Value::Breed(b) => self.set_turtle_breed(t, b),
                other => Err(EngineError::WrongType {
                    kind:     AgentKind::Turtle,
                    name:     "breed".into(),
                    expected: "breed",
                    found:    other.to_string(),
                }),
            },
            _ => self.turtle_mut(t)?.set_variable(vn, value),
        }
    }

    // ── Motion ────────────────────────────────────────────────────────────

    /// Put `t` at `(x, y)`, wrapping on wrapping axes.  Beyond a
    /// non-wrapping edge it fails with [`EngineError::BeyondEdge`] and
    /// stays put.  Turtles tied to `t` follow the translation.
    pub fn move_turtle(&mut self, t: TurtleId, x: f64, y: f64) -> EngineResult<()> {
        let mut seen = Seen::default();
        self.place(t, x, y, &mut seen)
    }

    /// Alias of [`World::move_turtle`] under the modeling-language name.
    #[inline]
    pub fn setxy(&mut self, t: TurtleId, x: f64, y: f64) -> EngineResult<()> {
        self.move_turtle(t, x, y)
    }

    /// Move `distance` along the current heading in one step.
    pub fn jump(&mut self, t: TurtleId, distance: f64) -> EngineResult<()> {
        let (x, y) = self.ahead(t, distance)?;
        self.move_turtle(t, x, y)
    }

    /// Walk `distance` along the heading in unit steps, then the
    /// fractional rest.  A step that would cross a non-wrapping edge stops
    /// the walk short, leaving `t` after its last whole step.  Returns
    /// whether the full distance was covered.
    pub fn forward(&mut self, t: TurtleId, distance: f64) -> EngineResult<bool> {
        let distance = finite(distance, "distance")?;
        let unit = distance.signum();
        let whole = distance.abs().trunc();
        let rest = distance.abs() - whole;
        let steps = std::iter::repeat_n(unit, whole as usize).chain((rest > 0.0).then_some(unit * rest));
        for step in steps {
            if !self.can_move(t, step)? {
                return Ok(false);
            }
            self.jump(t, step)?;
        }
        Ok(true)
    }

    /// Whether `t` could move `distance` ahead without leaving the world.
    pub fn can_move(&self, t: TurtleId, distance: f64) -> EngineResult<bool> {
        let (x, y) = self.ahead(t, distance)?;
        Ok(self.topology.wrap_x(x).is_ok() && self.topology.wrap_y(y).is_ok())
    }

    fn ahead(&self, t: TurtleId, distance: f64) -> EngineResult<(f64, f64)> {
        let distance = finite(distance, "distance")?;
        let turtle = self.turtle(t)?;
        let (sin, cos) = heading_sin_cos(turtle.heading);
        Ok((turtle.xcor + distance * sin, turtle.ycor + distance * cos))
    }

    /// Set the heading, normalized into `[0, 360)`.  Tied turtles orbit
    /// `t`, and those tied `fixed` turn with it.
    pub fn set_heading(&mut self, t: TurtleId, heading: f64) -> EngineResult<()> {
        let mut seen = Seen::default();
        self.turn(t, heading, &mut seen)
    }

    pub fn right(&mut self, t: TurtleId, degrees: f64) -> EngineResult<()> {
        let h = self.turtle(t)?.heading;
        self.set_heading(t, h + degrees)
    }

    pub fn left(&mut self, t: TurtleId, degrees: f64) -> EngineResult<()> {
        self.right(t, -degrees)
    }

    /// Turn `t` towards `(x, y)`.  Facing its own location leaves the
    /// heading unchanged.
    pub fn face_xy(&mut self, t: TurtleId, x: f64, y: f64, wrap: bool) -> EngineResult<()> {
        let (tx, ty) = self.turtle_xy(t)?;
        match self.towards_xy(tx, ty, x, y, wrap) {
            Ok(h) => self.set_heading(t, h),
            Err(EngineError::NoHeading { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Turn `t` towards another turtle or patch.
    pub fn face(&mut self, t: TurtleId, target: AgentRef, wrap: bool) -> EngineResult<()> {
        let (x, y) = self.agent_xy(target)?;
        self.face_xy(t, x, y, wrap)
    }

    /// Move `t` onto another turtle's position or a patch centre.
    pub fn move_to(&mut self, t: TurtleId, target: AgentRef) -> EngineResult<()> {
        let (x, y) = self.agent_xy(target)?;
        self.move_turtle(t, x, y)
    }

    /// Snap `t` to the centre of the patch it stands on.
    pub fn move_to_patch_center(&mut self, t: TurtleId) -> EngineResult<()> {
        let (x, y) = self.turtle_xy(t)?;
        let (px, py) = self.patch_coords(self.patch_under(x, y)?)?;
        self.move_turtle(t, px as f64, py as f64)
    }

    // ── Propagation ───────────────────────────────────────────────────────

    fn place(&mut self, t: TurtleId, x: f64, y: f64, seen: &mut Seen) -> EngineResult<()> {
        let nx = self.topology.wrap_x(x)?;
        let ny = self.topology.wrap_y(y)?;
        let (ox, oy) = self.turtle_xy(t)?;
        let from = self.patch_under(ox, oy)?;
        let to = self.patch_under(nx, ny)?;

        let turtle = self.turtle_mut(t)?;
        turtle.xcor = nx;
        turtle.ycor = ny;
        if from != to {
            self.patches[from.index()].turtle_left(t);
            self.patches[to.index()].turtle_arrived(t);
        }

        if self.graph.ties().any() {
            self.turtle_moved(t, x, y, ox, oy, seen);
        }
        Ok(())
    }

    fn turn(&mut self, t: TurtleId, heading: f64, seen: &mut Seen) -> EngineResult<()> {
        let heading = finite(heading, "heading")?;
        let turtle = self.turtle_mut(t)?;
        let old = turtle.heading;
        turtle.set_heading(heading);
        if self.graph.ties().any() {
            self.turtle_turned(t, heading, old, seen);
        }
        Ok(())
    }

    /// Tied turtles not yet seen, marking each as seen.
    fn unseen_ties(&self, root: TurtleId, seen: &mut Seen) -> Vec<(TurtleId, TieMode)> {
        if seen.is_empty() {
            seen.insert(root);
        }
        self.graph
            .tied_turtles(root)
            .into_iter()
            .filter(|(t, _)| self.turtles.contains(*t) && seen.insert(*t))
            .collect()
    }

    /// Translate every turtle tied to `root` by the root's (unwrapped)
    /// displacement.  A tied turtle that cannot move stays put while the
    /// rest still follow.
    fn turtle_moved(&mut self, root: TurtleId, nx: f64, ny: f64, ox: f64, oy: f64, seen: &mut Seen) {
        let (dx, dy) = (nx - ox, ny - oy);
        for (t, _) in self.unseen_ties(root, seen) {
            let moved = self
                .turtle_xy(t)
                .and_then(|(x, y)| self.place(t, x + dx, y + dy, seen));
            if let Err(e) = moved {
                warn!(root = %root, tied = %t, error = %e, "tied turtle could not follow");
            }
        }
    }

    /// Orbit every turtle tied to `root` by the root's turn.  `fixed` ties
    /// also turn the tied turtle's heading, unless its move failed.
    fn turtle_turned(&mut self, root: TurtleId, new: f64, old: f64, seen: &mut Seen) {
        let dh = subtract_headings(new, old);
        let ties = self.unseen_ties(root, seen);
        // A rigid tie restores the seen set after the tied turtle's move;
        // from then on this call works on the restored copy.
        let mut restored: Option<Seen> = None;
        for (t, mode) in ties {
            let rigid = mode == TieMode::Fixed;
            let result = self.orbit(root, t, dh, rigid, &mut restored, seen);
            if let Err(e) = result {
                warn!(root = %root, tied = %t, error = %e, "tied turtle could not follow");
            }
        }
    }

    fn orbit(
        &mut self,
        root:     TurtleId,
        t:        TurtleId,
        dh:       f64,
        rigid:    bool,
        restored: &mut Option<Seen>,
        seen:     &mut Seen,
    ) -> EngineResult<()> {
        let (rx, ry) = self.turtle_xy(root)?;
        let (tx, ty) = self.turtle_xy(t)?;
        let dist = self.topology.distance_wrap(rx, ry, tx, ty);

        if dist != 0.0 {
            let towards = self.topology.towards_wrap(rx, ry, tx, ty)?;
            let (osin, ocos) = trig(towards);
            let (nsin, ncos) = trig(towards + dh);
            let dx = (rx + dist * nsin) - (rx + dist * osin);
            let dy = (ry + dist * ncos) - (ry + dist * ocos);

            let active = restored.as_mut().unwrap_or(&mut *seen);
            if rigid {
                let snapshot = active.clone();
                self.place(t, tx + dx, ty + dy, active)?;
                *restored = Some(snapshot);
            } else {
                self.place(t, tx + dx, ty + dy, active)?;
            }
        }

        if rigid {
            let heading = self.turtle(t)?.heading;
            let active = restored.as_mut().unwrap_or(&mut *seen);
            self.turn(t, heading + dh, active)?;
        }
        Ok(())
    }
}

/// `(sin, cos)` of a heading with near-zero components flushed to zero.
fn trig(heading: f64) -> (f64, f64) {
    let (sin, cos) = heading.to_radians().sin_cos();
    let flush = |v: f64| if v.abs() < INFINITESIMAL { 0.0 } else { v };
    (flush(sin), flush(cos))
}

fn turtle_number(vn: usize, value: &Value) -> EngineResult<f64> {
    value.as_number().ok_or_else(|| EngineError::WrongType {
        kind:     AgentKind::Turtle,
        name:     TURTLE_BUILTINS[vn].into(),
        expected: "number",
        found:    value.to_string(),
    })
}
