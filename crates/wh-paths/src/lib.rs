//! `wh-paths`: single-agent and multi-agent pathfinding on the warehouse grid.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`heuristic`] | `Heuristic` trait, `Euclidean`, `Manhattan`, `TrueDistance`|
//! | [`astar`]     | `astar`, `astar_with_budget`, `SearchOutcome`              |
//! | [`st_astar`]  | `SpaceTimeQuery`, `space_time_astar`, obstacle sets        |
//! | [`collision`] | `Collision`, `find_collisions`, `find_all_collisions`      |
//! | [`mapf`]      | `mapf0`, `mapf1`, `resolve_collisions`, `MapfOutcome`      |
//! | [`planner`]   | `PathPlanner` trait, `AStarPlanner`, `SpaceTimePlanner`    |
//! | [`encode`]    | path ↔ actions, direction-string codec                     |
//! | [`error`]     | `PathError`, `PathResult<T>`                               |
//!
//! All searches are pure functions of their inputs and safe to run
//! concurrently against a shared `Grid`.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Rayon for `TrueDistance` builds, `mapf0`, collision scans.|
//! | `serde`    | Derives `Serialize`/`Deserialize` on `Collision`.          |

pub mod astar;
pub mod collision;
pub mod encode;
pub mod error;
pub mod heuristic;
pub mod mapf;
pub mod planner;
pub mod st_astar;

#[cfg(test)]
mod tests;

pub use astar::{SearchOutcome, astar, astar_with_budget};
pub use collision::{Collision, CollisionKind, find_all_collisions, find_collisions};
pub use encode::{actions_to_path, decode_directions, encode_directions, path_to_actions};
pub use error::{PathError, PathResult};
pub use heuristic::{Euclidean, Heuristic, Manhattan, TrueDistance};
pub use mapf::{MapfOutcome, mapf0, mapf1, resolve_collisions};
pub use planner::{AStarPlanner, PathPlanner, SpaceTimePlanner};
pub use st_astar::{DynamicObstacles, SpaceTimeQuery, StaticObstacles, space_time_astar};
