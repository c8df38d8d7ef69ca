//! Pathfinding error type.
//!
//! "No path" is not an error: searches return an empty `Path` for it.  These
//! variants are misuse the caller must fix before retrying.

use thiserror::Error;

use wh_core::Position;

/// Errors produced by `wh-paths`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("{0} is outside the grid")]
    OutOfBounds(Position),

    #[error("{0} is a wall cell")]
    Blocked(Position),

    #[error("step {from} -> {to} is not a single 4-connected move")]
    InvalidStep { from: Position, to: Position },

    #[error("unknown direction code {0:?}")]
    InvalidDirection(char),

    #[error("{starts} start positions but {goals} goals")]
    LengthMismatch { starts: usize, goals: usize },
}

pub type PathResult<T> = Result<T, PathError>;
