//! Task-subsystem error type.

use thiserror::Error;

use wh_core::{JobId, OrderId, StationId};

use crate::job::JobState;

/// Errors produced by `wh-tasks`.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("malformed task key {key:?}: {reason}")]
    MalformedKey { key: String, reason: &'static str },

    #[error("unknown status {0:?}")]
    UnknownStatus(String),

    /// A job transition was called out of sequence.  The job is unchanged.
    #[error("{job}: cannot {op} while {state}")]
    InvalidTransition { job: JobId, op: &'static str, state: JobState },

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("station {0} not found")]
    StationNotFound(StationId),

    #[error("station {station} already holds order {order}")]
    StationBusy { station: StationId, order: OrderId },

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type TaskResult<T> = Result<T, TaskError>;
