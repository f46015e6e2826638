//! `tw-layout` — network layouts for the `turtleworld` engine.
//!
//! Every layout is a pure function over a slice of positions and a
//! [`LayoutGraph`] of index pairs.  The world gathers turtle positions
//! (movable nodes first, in shufflerator order), runs a layout, and writes
//! the movable positions back through its normal move path, so wrapping and
//! turtles-here bookkeeping stay in one place.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`graph`]    | `LayoutGraph`, `Placement`                              |
//! | [`spring`]   | `spring_2d`, `spring_3d`, `SpringParams`                |
//! | [`radial`]   | `radial` tree layout                                    |
//! | [`tutte`]    | `circle`, `tutte_step`, `tutte`, `TutteReport`          |
//!
//! # Randomness
//!
//! Only the spring layouts draw random numbers, and only from the stream
//! passed in.  Given the same positions, graph and stream state they
//! produce identical output.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                          |
//! |---------|-------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `SpringParams`. |

pub mod graph;
pub mod radial;
pub mod spring;
pub mod tutte;

#[cfg(test)]
mod tests;

pub use graph::{LayoutGraph, Placement};
pub use radial::radial;
pub use spring::{spring_2d, spring_3d, SpringParams};
pub use tutte::{circle, tutte, tutte_step, TutteReport, TUTTE_STEP_LIMIT};
