//! `tw-topology` — grid geometry for the `turtleworld` engine.
//!
//! Pure arithmetic over patch coordinates: no agents, no logging.  The
//! world owns one [`Topology`] and a [`NeighborCache`] built from it, and
//! feeds patch variable columns through [`diffuse`].
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`bounds`]    | `Bounds` (extents, patch indexing)                         |
//! | [`topology`]  | `Topology`, `TopologyKind`, wrap/distance/towards, neighbors |
//! | [`cache`]     | `NeighborCache` (lazy per-patch neighborhoods)             |
//! | [`diffuse`]   | `diffuse8`, `diffuse4`, `diffuse26`, `diffuse6`            |
//! | [`space3d`]   | `Bounds3d`, `Topology3d`                                   |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Runs the diffusion gather on Rayon's thread pool.          |
//! | `serde`    | Derives `Serialize`/`Deserialize` on bounds and topologies. |

pub mod bounds;
pub mod cache;
pub mod diffuse;
pub mod space3d;
pub mod topology;

#[cfg(test)]
mod tests;

pub use bounds::Bounds;
pub use cache::NeighborCache;
pub use diffuse::{diffuse26, diffuse4, diffuse6, diffuse8};
pub use space3d::{Bounds3d, Topology3d};
pub use topology::{round_coord, Topology, TopologyKind};
