//! `wh-tasks`: task keys, jobs, queues and order bookkeeping.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`key`]       | `TaskKey`, `TaskGroupKey` and their colon-delimited codec  |
//! | [`status`]    | `TaskStatus`, `OrderStatus`                                |
//! | [`job`]       | `Job` state machine, `JobState`, `JobLeg`, `Waypoints`     |
//! | [`queue`]     | `TaskQueue` trait, `MemoryTaskQueue`                       |
//! | [`orders`]    | `Order`, `Station`, `Task`, `OrderStore`, `MemoryOrderStore` |
//! | [`processor`] | order processor pass: fill stations, apply deliveries      |
//! | `sqlite`      | `SqliteOrderStore` (feature `sqlite`)                      |
//! | [`error`]     | `TaskError`, `TaskResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag     | Effect                                                     |
//! |----------|------------------------------------------------------------|
//! | `sqlite` | Enables `SqliteOrderStore` (bundled SQLite via rusqlite).  |
//! | `serde`  | Derives `Serialize`/`Deserialize` on records and jobs.     |

pub mod error;
pub mod job;
pub mod key;
pub mod orders;
pub mod processor;
pub mod queue;
pub mod status;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use error::{TaskError, TaskResult};
pub use job::{Job, JobLeg, JobState, Waypoints};
pub use key::{TaskGroupKey, TaskKey};
pub use orders::{MemoryOrderStore, NewOrder, Order, OrderStore, Station, Task, unit_keys};
pub use processor::{ProcessReport, apply_completed, fill_stations, process};
pub use queue::{MemoryTaskQueue, TaskQueue};
pub use status::{OrderStatus, TaskStatus};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteOrderStore;
