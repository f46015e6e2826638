//! `tw-agent` — agent data model and agent sets for the `turtleworld` engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`schema`]      | `Schema`, `VarSchema`, `BreedDef`, `RemapPlan`            |
//! | [`builder`]     | `SchemaBuilder` (fluent schema declaration)               |
//! | [`turtle`]      | `Turtle`, builtin turtle variable indices, `PenMode`      |
//! | [`patch`]       | `Patch`, builtin patch variable indices                   |
//! | [`link`]        | `Link`, builtin link variable indices, `TieMode`          |
//! | [`observer`]    | `Observer` (globals)                                      |
//! | [`arena`]       | `Arena<H, T>` generational storage, `Handle`              |
//! | [`set`]         | `AgentSet<I>`, `Liveness`, `AlwaysAlive`                  |
//! | [`shuffle`]     | `Shufflerator<I>`                                         |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on agent structs.        |

pub mod arena;
pub mod builder;
mod check;
pub mod link;
pub mod observer;
pub mod patch;
pub mod schema;
pub mod set;
pub mod shuffle;
pub mod turtle;


pub use arena::{Arena, Handle};
pub use builder::SchemaBuilder;
pub use link::{Link, TieMode, LINK_BUILTINS};
pub use observer::Observer;
pub use patch::{Patch, PATCH_BUILTINS};
pub use schema::{BreedDef, BreedKind, Directedness, RemapPlan, Schema, VarSchema};
pub use set::{AgentSet, AlwaysAlive, Backing, Liveness};
pub use shuffle::Shufflerator;
pub use turtle::{PenMode, Turtle, TURTLE_BUILTINS};
