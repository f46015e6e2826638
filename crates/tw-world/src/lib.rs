//! `tw-world` — the composition root of the `turtleworld` engine.
//!
//! A [`World`] owns the patch grid, the turtle and link arenas, the breed
//! sets, the link graph and both random streams.  Every operation takes the
//! agents it acts on by id.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`world`]    | `World`: lifecycle, ticks, clearing, resize, `ask_*`      |
//! | [`builder`]  | `WorldBuilder`                                            |
//! | [`observer`] | `WorldEvent`, `WorldObserver`, `NoopObserver`, `ChannelObserver` |
//! | [`shared`]   | `SharedWorld` (read/write handle across threads)          |
//! | `turtles`    | turtle lifecycle, variables, motion, tie propagation      |
//! | `links`      | link lifecycle, variables, ties, link neighbors           |
//! | `patches`    | patch lookup, neighborhoods, diffusion, in-radius         |
//! | `geometry`   | distance / towards                                        |
//! | `network`    | network metrics over a link breed                         |
//! | `layout`     | spring, circle, radial and Tutte layouts                  |
//! | `sets`       | global and breed sets, random picks                       |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs diffusion on Rayon's thread pool.                 |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `WorldEvent`.     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tw_agent::SchemaBuilder;
//! use tw_core::{BreedId, WorldConfig};
//! use tw_world::WorldBuilder;
//!
//! let schema = SchemaBuilder::new().patches_own(&["chemical"]).build()?;
//! let mut world = WorldBuilder::new(WorldConfig::centered(16, 16).with_seed(7), schema).build()?;
//! world.create_turtles(100, BreedId::TURTLES)?;
//! let everyone = world.turtles().clone();
//! world.ask_turtles(&everyone, |w, t| w.forward(t, 1.0).map(|_| ()))?;
//! ```

pub mod builder;
pub mod observer;
pub mod shared;
pub mod world;

mod geometry;
mod layout;
mod links;
mod network;
mod patches;
mod sets;
mod turtles;


pub use builder::WorldBuilder;
pub use observer::{ChannelObserver, NoopObserver, WorldEvent, WorldObserver};
pub use shared::SharedWorld;
pub use world::World;

pub use tw_layout::{SpringParams, TutteReport};
