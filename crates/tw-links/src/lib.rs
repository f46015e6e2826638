//! `tw-links` — the link graph of the `turtleworld` engine.
//!
//! The world owns the link agents themselves (variables, colors, labels);
//! this crate owns only their topology: who is joined to whom, by which
//! breed, in which direction, and whether the link is tied.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`graph`]   | `LinkManager`, `Edge`, `LinkFilter`                         |
//! | [`tie`]     | `TieManager` (tied-link count)                              |
//! | [`metrics`] | BFS radius, distance, shortest paths, average path length   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Edge`.                 |

pub mod graph;
pub mod metrics;
pub mod tie;

#[cfg(test)]
mod tests;

pub use graph::{Edge, LinkFilter, LinkManager};
pub use tie::TieManager;
