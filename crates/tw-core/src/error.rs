//! Engine error type.
//!
//! All `tw-*` crates return [`EngineError`].  Errors fall into three classes
//! (see [`Severity`]): domain errors raised by modeler-visible operations,
//! topology type errors raised by diffusion, and fatal invariant violations.
//! The first two are expected to be caught at the instruction-execution
//! boundary and reported; the last one means the engine state is suspect.
//!
//! "No path" and "nobody" outcomes are not errors; they are `Option`s or
//! sentinel values at the call site.

use thiserror::Error;

use crate::AgentKind;

/// How the caller should treat an [`EngineError`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Severity {
    /// A modeler-facing error such as moving past a non-wrapping edge.
    Domain,
    /// A type error found while operating on the patch grid.
    Topology,
    /// A programmer error.  Do not attempt to recover.
    Fatal,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("cannot move turtle beyond the world's edge")]
    BeyondEdge,

    #[error("no heading is defined from a point ({x},{y}) to that same point")]
    NoHeading { x: f64, y: f64 },

    #[error("{kind} variable {name} is read-only")]
    ReadOnlyVariable { kind: AgentKind, name: &'static str },

    #[error("can't set {kind} variable {name} to non-{expected} {found}")]
    WrongType {
        kind:     AgentKind,
        name:     String,
        expected: &'static str,
        found:    String,
    },

    #[error("{kind} has no variable at index {index}")]
    NoSuchVariable { kind: AgentKind, index: usize },

    #[error("that {0} is dead")]
    DeadAgent(AgentKind),

    #[error("value of variable {var} on patch ({pxcor}, {pycor}) is not a number: {found}")]
    PatchNotNumeric {
        pxcor: i32,
        pycor: i32,
        var:   String,
        found: String,
    },

    #[error("{0}")]
    Domain(String),

    #[error("unknown breed: {0}")]
    UnknownBreed(String),

    #[error("link breed {breed} cannot mix directed and undirected links")]
    MixedDirectedness { breed: String },

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("the tick counter has not been started yet; use reset-ticks")]
    TicksNotStarted,

    #[error("halted")]
    Halted,
}

impl EngineError {
    pub fn severity(&self) -> Severity {
        match self {
            EngineError::PatchNotNumeric { .. } => Severity::Topology,
            EngineError::UnknownBreed(_)
            | EngineError::MixedDirectedness { .. }
            | EngineError::Invariant(_)
            | EngineError::Config(_) => Severity::Fatal,
            _ => Severity::Domain,
        }
    }

    /// `true` for errors the instruction boundary may report and continue.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        self.severity() != Severity::Fatal
    }

    /// Shorthand for a free-form domain error.
    pub fn domain(msg: impl Into<String>) -> Self {
        EngineError::Domain(msg.into())
    }

    /// Shorthand for an invariant violation.
    pub fn invariant(msg: impl Into<String>) -> Self {
        EngineError::Invariant(msg.into())
    }
}

/// Shorthand result type for all `tw-*` crates.
pub type EngineResult<T> = Result<T, EngineError>;
