//! The mobile agent.

use std::fmt;

use tw_core::geom::{finite, normalize_heading};
use tw_core::{AgentKey, AgentKind, BreedId, EngineError, EngineResult, Value};

use crate::check;

/// Builtin turtle variables, in layout order.
pub const TURTLE_BUILTINS: &[&str] = &[
    "who",
    "color",
    "heading",
    "xcor",
    "ycor",
    "shape",
    "label",
    "label-color",
    "breed",
    "hidden?",
    "size",
    "pen-size",
    "pen-mode",
];

pub const VAR_WHO: usize = 0;
pub const VAR_COLOR: usize = 1;
pub const VAR_HEADING: usize = 2;
pub const VAR_XCOR: usize = 3;
pub const VAR_YCOR: usize = 4;
pub const VAR_SHAPE: usize = 5;
pub const VAR_LABEL: usize = 6;
pub const VAR_LABEL_COLOR: usize = 7;
pub const VAR_BREED: usize = 8;
pub const VAR_HIDDEN: usize = 9;
pub const VAR_SIZE: usize = 10;
pub const VAR_PEN_SIZE: usize = 11;
pub const VAR_PEN_MODE: usize = 12;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PenMode {
    #[default]
    Up,
    Down,
    Erase,
}

impl PenMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PenMode::Up    => "up",
            PenMode::Down  => "down",
            PenMode::Erase => "erase",
        }
    }

    pub fn parse(s: &str) -> Option<PenMode> {
        match s {
            "up"    => Some(PenMode::Up),
            "down"  => Some(PenMode::Down),
            "erase" => Some(PenMode::Erase),
            _ => None,
        }
    }
}

impl fmt::Display for PenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A turtle.
///
/// Position, heading and breed are owned by the world: changing them has
/// to go through topology wrapping, the turtles-here index, tie
/// propagation or a breed remap, so [`Turtle::set_variable`] refuses those
/// slots.  Everything else is set here with type checks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Turtle {
    /// Monotonic, never reused.
    pub who:         u64,
    pub breed:       BreedId,
    pub xcor:        f64,
    pub ycor:        f64,
    /// Always in `[0, 360)`.
    pub heading:     f64,
    pub color:       Value,
    pub shape:       String,
    pub label:       Value,
    pub label_color: Value,
    pub hidden:      bool,
    pub size:        f64,
    pub pen_size:    f64,
    pub pen_mode:    PenMode,
    /// `[turtles-own][breed-own]`.
    pub vars:        Vec<Value>,
}

impl Turtle {
    pub fn new(who: u64, breed: BreedId, vars: Vec<Value>) -> Self {
        Turtle {
            who,
            breed,
            xcor:        0.0,
            ycor:        0.0,
            heading:     0.0,
            color:       Value::Number(0.0),
            shape:       "default".into(),
            label:       Value::String(String::new()),
            label_color: Value::Number(9.9),
            hidden:      false,
            size:        1.0,
            pen_size:    1.0,
            pen_mode:    PenMode::Up,
            vars,
        }
    }

    #[inline]
    pub fn key(&self) -> AgentKey {
        AgentKey::turtle(self.who)
    }

    /// Number of variables in the full layout.
    #[inline]
    pub fn var_count(&self) -> usize {
        TURTLE_BUILTINS.len() + self.vars.len()
    }

    /// Set the heading, normalizing into `[0, 360)`.
    #[inline]
    pub fn set_heading(&mut self, heading: f64) {
        self.heading = normalize_heading(heading);
    }

    pub fn get_variable(&self, vn: usize) -> EngineResult<Value> {
        Ok(match vn {
            VAR_WHO         => Value::Number(self.who as f64),
            VAR_COLOR       => self.color.clone(),
            VAR_HEADING     => Value::Number(self.heading),
            VAR_XCOR        => Value::Number(self.xcor),
            VAR_YCOR        => Value::Number(self.ycor),
            VAR_SHAPE       => Value::String(self.shape.clone()),
            VAR_LABEL       => self.label.clone(),
            VAR_LABEL_COLOR => self.label_color.clone(),
            VAR_BREED       => Value::Breed(self.breed),
            VAR_HIDDEN      => Value::Boolean(self.hidden),
            VAR_SIZE        => Value::Number(self.size),
            VAR_PEN_SIZE    => Value::Number(self.pen_size),
            VAR_PEN_MODE    => Value::String(self.pen_mode.as_str().into()),
            _ => self
                .vars
                .get(vn - TURTLE_BUILTINS.len())
                .cloned()
                .ok_or(EngineError::NoSuchVariable { kind: AgentKind::Turtle, index: vn })?,
        })
    }

    /// Set any variable except `who` (read-only) and `xcor` / `ycor` /
    /// `breed` (world-managed).
    pub fn set_variable(&mut self, vn: usize, value: Value) -> EngineResult<()> {
        const K: AgentKind = AgentKind::Turtle;
        match vn {
            VAR_WHO => return Err(EngineError::ReadOnlyVariable { kind: K, name: "who" }),
            VAR_XCOR | VAR_YCOR | VAR_BREED => {
                return Err(EngineError::invariant(format!(
                    "turtle variable {} must be set through the world",
                    TURTLE_BUILTINS[vn]
                )));
            }
            VAR_COLOR => self.color = check::color(K, TURTLE_BUILTINS[vn], value)?,
            VAR_HEADING => {
                let h = check::number(K, TURTLE_BUILTINS[vn], &value)?;
                self.set_heading(finite(h, "heading")?);
            }
            VAR_SHAPE => self.shape = check::string(K, TURTLE_BUILTINS[vn], value)?.to_ascii_lowercase(),
            VAR_LABEL => self.label = value,
            VAR_LABEL_COLOR => self.label_color = check::color(K, TURTLE_BUILTINS[vn], value)?,
            VAR_HIDDEN => self.hidden = check::boolean(K, TURTLE_BUILTINS[vn], &value)?,
            VAR_SIZE => self.size = check::number(K, TURTLE_BUILTINS[vn], &value)?,
            VAR_PEN_SIZE => self.pen_size = check::number(K, TURTLE_BUILTINS[vn], &value)?,
            VAR_PEN_MODE => {
                let s = check::string(K, TURTLE_BUILTINS[vn], value)?;
                self.pen_mode = PenMode::parse(&s).ok_or_else(|| EngineError::WrongType {
                    kind:     K,
                    name:     "pen-mode".into(),
                    expected: "\"up\", \"down\" or \"erase\"",
                    found:    format!("{s:?}"),
                })?;
            }
            _ => {
                let slot = self
                    .vars
                    .get_mut(vn - TURTLE_BUILTINS.len())
                    .ok_or(EngineError::NoSuchVariable { kind: K, index: vn })?;
                *slot = value;
            }
        }
        Ok(())
    }

    /// Copy every user-visible attribute of `self` onto a newborn with
    /// `who`, as `hatch` does.
    pub fn hatch(&self, who: u64) -> Turtle {
        Turtle { who, ..self.clone() }
    }
}
