//! The dynamically typed value stored in agent variable slots.
//!
//! Every slot of every agent holds a [`Value`].  Builtin slots (heading,
//! xcor, pcolor, …) are backed by typed struct fields on the agent and only
//! converted to a `Value` at the get/set boundary; user-declared `-own`
//! variables are stored as `Value`s directly.

use std::fmt;

use crate::{BreedId, LinkId, PatchId, TurtleId};

/// A single variable value.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Numbers are always `f64`, as in the modeling language.
    Number(f64),
    Boolean(bool),
    String(String),
    List(Vec<Value>),
    Turtle(TurtleId),
    Patch(PatchId),
    Link(LinkId),
    /// A breed's agent set, as read from a turtle's or link's `breed`.
    Breed(BreedId),
    /// The absent agent.
    #[default]
    Nobody,
}

impl Value {
    /// The initial value of a freshly allocated user variable slot.
    pub const ZERO: Value = Value::Number(0.0);

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// `true` for a plain number or an RGB(A) list of numbers.
    pub fn is_color(&self) -> bool {
        match self {
            Value::Number(_) => true,
            Value::List(items) => {
                (items.len() == 3 || items.len() == 4)
                    && items.iter().all(|v| matches!(v, Value::Number(_)))
            }
            _ => false,
        }
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_)  => "number",
            Value::Boolean(_) => "TRUE/FALSE",
            Value::String(_)  => "string",
            Value::List(_)    => "list",
            Value::Turtle(_)  => "turtle",
            Value::Patch(_)   => "patch",
            Value::Link(_)    => "link",
            Value::Breed(_)   => "agentset",
            Value::Nobody     => "nobody",
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::String(s)  => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Turtle(id) => write!(f, "({id})"),
            Value::Patch(id)  => write!(f, "({id})"),
            Value::Link(id)   => write!(f, "({id})"),
            Value::Breed(id)  => write!(f, "{id}"),
            Value::Nobody     => f.write_str("nobody"),
        }
    }
}
