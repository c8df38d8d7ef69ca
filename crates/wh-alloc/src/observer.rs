//! Allocator observer trait for progress reporting and metrics.

use wh_tasks::{Job, JobState};

/// Callbacks invoked by [`RobotAllocator::update`][crate::RobotAllocator::update].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
pub trait AllocatorObserver {
    /// A queued task key was bound to an idle robot.
    fn on_job_assigned(&mut self, _job: &Job) {}

    /// A live job advanced one state.  `job` is already in its new state.
    fn on_transition(&mut self, _job: &Job, _from: JobState) {}

    /// A job reached `Complete` or `Error` and its robot went back to idle.
    fn on_job_retired(&mut self, _job: &Job) {}
}

/// An [`AllocatorObserver`] that does nothing.
pub struct NoopObserver;

impl AllocatorObserver for NoopObserver {}
