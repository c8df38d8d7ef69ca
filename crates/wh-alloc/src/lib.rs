//! `wh-alloc`: the robot allocator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`allocator`] | `RobotAllocator`, `TickReport`                             |
//! | [`observer`]  | `AllocatorObserver` hooks, `NoopObserver`                  |
//! | [`planning`]  | `leg_planner` from `AllocatorConfig`                       |
//! | [`error`]     | `AllocError`, `AllocResult<T>`                             |
//!
//! # Control loop
//!
//! The host calls [`RobotAllocator::update`] once per tick and sleeps for
//! `AllocatorConfig::poll_interval` in between.  Within a tick the allocator
//! first tries one assignment, then advances each job that was already live
//! by at most one state.  A freshly assigned job first moves on the next
//! tick.
//!
//! ```text
//! WAITING_TO_START  write robot→item leg ───────────▶ PICKING_ITEM
//! PICKING_ITEM      at item zone? hold item ────────▶ ITEM_PICKED
//! ITEM_PICKED       write item→station leg ─────────▶ GOING_TO_STATION
//! GOING_TO_STATION  at station? drop, complete key ─▶ ITEM_DROPPED
//! ITEM_DROPPED      write station→home leg ─────────▶ RETURNING_HOME
//! RETURNING_HOME    at home? release robot ─────────▶ COMPLETE
//! ```

pub mod allocator;
pub mod error;
pub mod observer;
pub mod planning;


pub use allocator::{RobotAllocator, TickReport};
pub use error::{AllocError, AllocResult};
pub use observer::{AllocatorObserver, NoopObserver};
pub use planning::{LegPlanner, leg_planner};
