//! `wh-core`: foundational types for the warehouse robot planner.
//!
//! This crate is a dependency of every other `wh-*` crate.  It has no `wh-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `RobotId`, `JobId`, `StationId`, `OrderId`, `ItemId`      |
//! | [`geom`]    | `Position` (row, col), `Action`, `Path`, x/y conversions  |
//! | [`grid`]    | `Grid`, `Cell`                                            |
//! | [`config`]  | `PlannerConfig`, `AllocatorConfig`                        |
//! | [`rng`]     | `SimRng` (seeded, deterministic)                          |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Coordinates
//!
//! The canonical coordinate order inside every `wh-*` crate is **(row, col)**.
//! Code that talks to x/y collaborators (renderers, external stores) converts
//! at the boundary with [`Position::from_xy`] / [`Position::to_xy`] and never
//! hands x/y pairs to the planner.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geom;
pub mod grid;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AllocatorConfig, PlannerConfig};
pub use error::{CoreError, CoreResult};
pub use geom::{Action, Path, Position, flip_path_xy};
pub use grid::{Cell, Grid};
pub use ids::{ItemId, JobId, OrderId, RobotId, StationId};
pub use rng::SimRng;
