//! `wh-world`: the robots' side of the warehouse.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`robot`]   | `Robot`, `RobotStatus`                                    |
//! | [`store`]   | `WorldStore` trait (robot snapshots, paths, held items)   |
//! | [`world`]   | `World` tick simulator, implements `WorldStore`           |
//! | [`checker`] | `check_world`, `WorldCollision`, `ViolationKind`          |
//! | [`layout`]  | `Layout` with CSV and ASCII loaders                       |
//! | [`error`]   | `WorldError`, `WorldResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on robots and collisions. |

pub mod checker;
pub mod error;
pub mod layout;
pub mod robot;
pub mod store;
pub mod world;

#[cfg(test)]
mod tests;

pub use checker::{Involved, ViolationKind, WorldCollision, check_world};
pub use error::{WorldError, WorldResult};
pub use layout::Layout;
pub use robot::{Robot, RobotStatus};
pub use store::WorldStore;
pub use world::World;
