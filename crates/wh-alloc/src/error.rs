use thiserror::Error;

use wh_core::RobotId;
use wh_paths::PathError;
use wh_tasks::TaskError;
use wh_world::WorldError;

/// Errors produced by `wh-alloc`.
///
/// An empty queue or a fully busy fleet is not an error; those surface as
/// `Ok(None)` from [`assign_task_to_robot`](crate::RobotAllocator::assign_task_to_robot).
#[derive(Debug, Error)]
pub enum AllocError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("no {kind} zone for id {id}")]
    UnknownZone { kind: &'static str, id: u32 },

    #[error("robot {0} has no live job")]
    NoJob(RobotId),
}

pub type AllocResult<T> = Result<T, AllocError>;
