//! The fixed grid-cell agent.

use tw_core::{AgentKey, AgentKind, EngineError, EngineResult, PatchId, TurtleId, Value};

use crate::check;

/// Builtin patch variables, in layout order.
pub const PATCH_BUILTINS: &[&str] = &["pxcor", "pycor", "pcolor", "plabel", "plabel-color"];

pub const VAR_PXCOR: usize = 0;
pub const VAR_PYCOR: usize = 1;
pub const VAR_PCOLOR: usize = 2;
pub const VAR_PLABEL: usize = 3;
pub const VAR_PLABEL_COLOR: usize = 4;

/// A patch.  Its coordinates are assigned at grid creation and never
/// change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patch {
    pub id:           PatchId,
    pxcor:            i32,
    pycor:            i32,
    pub pcolor:       Value,
    pub plabel:       Value,
    pub plabel_color: Value,
    /// `[patches-own]`.
    pub vars:         Vec<Value>,
    /// Turtles standing on this patch, in arrival order.
    pub turtles_here: Vec<TurtleId>,
}

impl Patch {
    pub fn new(id: PatchId, pxcor: i32, pycor: i32, vars: Vec<Value>) -> Self {
        Patch {
            id,
            pxcor,
            pycor,
            pcolor:       Value::Number(0.0),
            plabel:       Value::String(String::new()),
            plabel_color: Value::Number(9.9),
            vars,
            turtles_here: Vec::new(),
        }
    }

    #[inline]
    pub fn pxcor(&self) -> i32 {
        self.pxcor
    }

    #[inline]
    pub fn pycor(&self) -> i32 {
        self.pycor
    }

    #[inline]
    pub fn key(&self) -> AgentKey {
        AgentKey::patch(self.id)
    }

    #[inline]
    pub fn var_count(&self) -> usize {
        PATCH_BUILTINS.len() + self.vars.len()
    }

    pub fn get_variable(&self, vn: usize) -> EngineResult<Value> {
        Ok(match vn {
            VAR_PXCOR        => Value::Number(self.pxcor as f64),
            VAR_PYCOR        => Value::Number(self.pycor as f64),
            VAR_PCOLOR       => self.pcolor.clone(),
            VAR_PLABEL       => self.plabel.clone(),
            VAR_PLABEL_COLOR => self.plabel_color.clone(),
            _ => self
                .vars
                .get(vn - PATCH_BUILTINS.len())
                .cloned()
                .ok_or(EngineError::NoSuchVariable { kind: AgentKind::Patch, index: vn })?,
        })
    }

    pub fn set_variable(&mut self, vn: usize, value: Value) -> EngineResult<()> {
        const K: AgentKind = AgentKind::Patch;
        match vn {
            VAR_PXCOR | VAR_PYCOR => {
                return Err(EngineError::ReadOnlyVariable { kind: K, name: PATCH_BUILTINS[vn] });
            }
            VAR_PCOLOR       => self.pcolor = check::color(K, PATCH_BUILTINS[vn], value)?,
            VAR_PLABEL       => self.plabel = value,
            VAR_PLABEL_COLOR => self.plabel_color = check::color(K, PATCH_BUILTINS[vn], value)?,
            _ => {
                let slot = self
                    .vars
                    .get_mut(vn - PATCH_BUILTINS.len())
                    .ok_or(EngineError::NoSuchVariable { kind: K, index: vn })?;
                *slot = value;
            }
        }
        Ok(())
    }

    /// Reset colors, labels and `patches-own` to their initial values.
    pub fn clear(&mut self) {
        self.pcolor = Value::Number(0.0);
        self.plabel = Value::String(String::new());
        self.plabel_color = Value::Number(9.9);
        self.vars.iter_mut().for_each(|v| *v = Value::ZERO);
    }

    /// Record that `id` now stands here.
    #[inline]
    pub fn turtle_arrived(&mut self, id: TurtleId) {
        self.turtles_here.push(id);
    }

    /// Drop `id` from the turtles-here list, keeping arrival order.
    pub fn turtle_left(&mut self, id: TurtleId) {
        if let Some(pos) = self.turtles_here.iter().position(|t| *t == id) {
            self.turtles_here.remove(pos);
        }
    }
}
