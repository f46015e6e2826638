//! The relation agent between two turtles.

use std::fmt;

use tw_core::{AgentKey, AgentKind, BreedId, EngineError, EngineResult, TurtleId, Value};

use crate::check;

/// Builtin link variables, in layout order.
pub const LINK_BUILTINS: &[&str] = &[
    "end1",
    "end2",
    "color",
    "label",
    "label-color",
    "hidden?",
    "breed",
    "thickness",
    "shape",
    "tie-mode",
];

pub const VAR_END1: usize = 0;
pub const VAR_END2: usize = 1;
pub const VAR_LCOLOR: usize = 2;
pub const VAR_LLABEL: usize = 3;
pub const VAR_LLABEL_COLOR: usize = 4;
pub const VAR_LHIDDEN: usize = 5;
pub const VAR_LBREED: usize = 6;
pub const VAR_THICKNESS: usize = 7;
pub const VAR_LSHAPE: usize = 8;
pub const VAR_TIE_MODE: usize = 9;

/// How a link propagates its endpoints' motion.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieMode {
    #[default]
    None,
    /// The tied end follows translation and orbits with rotation.
    Free,
    /// Like `Free`, and the tied end's heading turns with the root.
    Fixed,
}

impl TieMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TieMode::None  => "none",
            TieMode::Free  => "free",
            TieMode::Fixed => "fixed",
        }
    }

    pub fn parse(s: &str) -> Option<TieMode> {
        match s {
            "none"  => Some(TieMode::None),
            "free"  => Some(TieMode::Free),
            "fixed" => Some(TieMode::Fixed),
            _ => None,
        }
    }

    #[inline]
    pub fn is_tied(self) -> bool {
        self != TieMode::None
    }
}

impl fmt::Display for TieMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link.
///
/// For undirected links `end1` is always the endpoint with the smaller who
/// number, so the link key is the same whichever way round it was created.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub end1:        TurtleId,
    pub end2:        TurtleId,
    pub end1_who:    u64,
    pub end2_who:    u64,
    pub breed:       BreedId,
    pub directed:    bool,
    pub color:       Value,
    pub label:       Value,
    pub label_color: Value,
    pub hidden:      bool,
    pub thickness:   f64,
    pub shape:       String,
    pub tie_mode:    TieMode,
    /// `[links-own][link-breed-own]`.
    pub vars:        Vec<Value>,
}

impl Link {
    pub fn new(
        end1: (TurtleId, u64),
        end2: (TurtleId, u64),
        breed: BreedId,
        directed: bool,
        vars: Vec<Value>,
    ) -> Self {
        Link {
            end1:        end1.0,
            end2:        end2.0,
            end1_who:    end1.1,
            end2_who:    end2.1,
            breed,
            directed,
            color:       Value::Number(5.0),
            label:       Value::String(String::new()),
            label_color: Value::Number(9.9),
            hidden:      false,
            thickness:   0.0,
            shape:       "default".into(),
            tie_mode:    TieMode::None,
            vars,
        }
    }

    #[inline]
    pub fn key(&self) -> AgentKey {
        AgentKey::link(self.end1_who, self.end2_who, self.breed)
    }

    /// The endpoint that is not `t`, or `None` if `t` is not an endpoint.
    pub fn other_end(&self, t: TurtleId) -> Option<TurtleId> {
        if t == self.end1 {
            Some(self.end2)
        } else if t == self.end2 {
            Some(self.end1)
        } else {
            None
        }
    }

    #[inline]
    pub fn var_count(&self) -> usize {
        LINK_BUILTINS.len() + self.vars.len()
    }

    pub fn get_variable(&self, vn: usize) -> EngineResult<Value> {
        Ok(match vn {
            VAR_END1         => Value::Turtle(self.end1),
            VAR_END2         => Value::Turtle(self.end2),
            VAR_LCOLOR       => self.color.clone(),
            VAR_LLABEL       => self.label.clone(),
            VAR_LLABEL_COLOR => self.label_color.clone(),
            VAR_LHIDDEN      => Value::Boolean(self.hidden),
            VAR_LBREED       => Value::Breed(self.breed),
            VAR_THICKNESS    => Value::Number(self.thickness),
            VAR_LSHAPE       => Value::String(self.shape.clone()),
            VAR_TIE_MODE     => Value::String(self.tie_mode.as_str().into()),
            _ => self
                .vars
                .get(vn - LINK_BUILTINS.len())
                .cloned()
                .ok_or(EngineError::NoSuchVariable { kind: AgentKind::Link, index: vn })?,
        })
    }

    /// Set any variable except the endpoints (read-only) and `breed` /
    /// `tie-mode` (world-managed, they touch the link graph).
    pub fn set_variable(&mut self, vn: usize, value: Value) -> EngineResult<()> {
        const K: AgentKind = AgentKind::Link;
        match vn {
            VAR_END1 | VAR_END2 => {
                return Err(EngineError::ReadOnlyVariable { kind: K, name: LINK_BUILTINS[vn] });
            }
            VAR_LBREED | VAR_TIE_MODE => {
                return Err(EngineError::invariant(format!(
                    "link variable {} must be set through the world",
                    LINK_BUILTINS[vn]
                )));
            }
            VAR_LCOLOR       => self.color = check::color(K, LINK_BUILTINS[vn], value)?,
            VAR_LLABEL       => self.label = value,
            VAR_LLABEL_COLOR => self.label_color = check::color(K, LINK_BUILTINS[vn], value)?,
            VAR_LHIDDEN      => self.hidden = check::boolean(K, LINK_BUILTINS[vn], &value)?,
            VAR_THICKNESS    => self.thickness = check::number(K, LINK_BUILTINS[vn], &value)?,
            VAR_LSHAPE => {
                self.shape = check::string(K, LINK_BUILTINS[vn], value)?.to_ascii_lowercase();
            }
            _ => {
                let slot = self
                    .vars
                    .get_mut(vn - LINK_BUILTINS.len())
                    .ok_or(EngineError::NoSuchVariable { kind: K, index: vn })?;
                *slot = value;
            }
        }
        Ok(())
    }

    /// Parse a `tie-mode` value.
    pub fn parse_tie_mode(value: &Value) -> EngineResult<TieMode> {
        value
            .as_str()
            .and_then(TieMode::parse)
            .ok_or_else(|| EngineError::WrongType {
                kind:     AgentKind::Link,
                name:     "tie-mode".into(),
                expected: "\"none\", \"free\" or \"fixed\"",
                found:    value.to_string(),
            })
    }
}
