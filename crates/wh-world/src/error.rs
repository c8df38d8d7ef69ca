use thiserror::Error;

use wh_core::{CoreError, RobotId};

/// Errors produced by `wh-world`.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("robot {0} not found")]
    RobotNotFound(RobotId),

    #[error("robot {0} registered twice")]
    DuplicateRobot(RobotId),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type WorldResult<T> = Result<T, WorldError>;
