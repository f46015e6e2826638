//! `tw-core` — foundational types for the `turtleworld` agent-based engine.
//!
//! This crate is a dependency of every other `tw-*` crate.  It has no `tw-*`
//! dependencies and few external ones (`rand`, `rand_chacha`, `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `TurtleId`, `LinkId`, `PatchId`, `BreedId`, `AgentKey`    |
//! | [`value`]       | `Value`, the dynamically typed variable slot              |
//! | [`rng`]         | `WorldRng`, `RngStreams` (`main` + `aux`)                 |
//! | [`geom`]        | `wrap`, heading arithmetic                                |
//! | [`config`]      | `WorldConfig`                                             |
//! | [`ticks`]       | `TickCounter`                                             |
//! | [`air`]         | `AirFlag`, `AirMonitor` (cooperative yield / halt)        |
//! | [`error`]       | `EngineError`, `Severity`, `EngineResult`                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, values and config.  |

pub mod air;
pub mod config;
pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;
pub mod ticks;
pub mod value;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use air::{AirFlag, AirMonitor};
pub use config::WorldConfig;
pub use error::{EngineError, EngineResult, Severity};
pub use ids::{AgentKey, AgentKind, AgentRef, BreedId, LinkId, PatchId, TurtleId};
pub use rng::{RngStreams, WorldRng};
pub use ticks::TickCounter;
pub use value::Value;
