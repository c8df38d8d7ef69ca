//! The `RobotAllocator` and its control loop.

use std::collections::{BTreeMap, BTreeSet};

use wh_core::{AllocatorConfig, JobId, Position, RobotId};
use wh_paths::PathPlanner;
use wh_tasks::{Job, JobLeg, JobState, TaskError, TaskKey, TaskQueue, Waypoints};
use wh_world::{Layout, Robot, RobotStatus, WorldStore};

use crate::error::{AllocError, AllocResult};
use crate::observer::AllocatorObserver;

/// What one [`RobotAllocator::update`] call did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub assigned:      Option<JobId>,
    pub transitions:   usize,
    pub retired:       usize,
    /// Jobs whose check returned an error this tick.
    pub failed_checks: usize,
    /// Live jobs after the tick.
    pub live:          usize,
}

/// Binds queued task keys to idle robots and walks each job through its
/// state machine.
///
/// `RobotAllocator<W, Q, P>` owns its collaborators:
///
/// - `W: WorldStore`: robot positions, paths and held items.  Positions are
///   re-read on every check and never cached across ticks.
/// - `Q: TaskQueue`: source of task keys, sink for completed ones.
/// - `P: PathPlanner`: plans each leg against the static grid only.
///
/// Each robot has at most one live job.  A job leaves the live set on
/// `Complete` or `Error`, and either way its robot returns to the idle set.
pub struct RobotAllocator<W, Q, P> {
    config:  AllocatorConfig,
    layout:  Layout,
    world:   W,
    queue:   Q,
    planner: P,

    jobs:     BTreeMap<RobotId, Job>,
    idle:     BTreeSet<RobotId>,
    retired:  Vec<Job>,
    next_job: u32,
}

impl<W: WorldStore, Q: TaskQueue, P: PathPlanner> RobotAllocator<W, Q, P> {
    /// Take ownership of the collaborators and reset every robot to
    /// `Available` with empty hands.
    pub fn new(config: AllocatorConfig, layout: Layout, mut world: W, queue: Q, planner: P) -> AllocResult<Self> {
        let mut idle = BTreeSet::new();
        for robot in world.robots() {
            world.set_robot_status(robot.id, RobotStatus::Available)?;
            if let Some(item) = world.drop_item(robot.id)? {
                tracing::warn!(robot = %robot.id, item = %item, "dropped item held at start-up");
            }
            idle.insert(robot.id);
        }
        tracing::info!(robots = idle.len(), "robot allocator ready");

        Ok(Self {
            config,
            layout,
            world,
            queue,
            planner,
            jobs: BTreeMap::new(),
            idle,
            retired: Vec::new(),
            next_job: 0,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    /// Live job bound to `robot`.
    pub fn job(&self, robot: RobotId) -> Option<&Job> {
        self.jobs.get(&robot)
    }

    pub fn live_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// Jobs that reached `Complete` or `Error`, oldest first.
    pub fn retired_jobs(&self) -> &[Job] {
        &self.retired
    }

    pub fn idle_robots(&self) -> impl Iterator<Item = RobotId> + '_ {
        self.idle.iter().copied()
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Robots not bound to a live job, in id order.
    pub fn get_available_robots(&self) -> Vec<Robot> {
        self.world.robots().into_iter().filter(|r| self.idle.contains(&r.id)).collect()
    }

    /// Pop one task key and bind it to the first idle robot.
    ///
    /// `Ok(None)` when no robot is idle, the queue is empty, or a leg is
    /// unreachable right now (the key goes back on the queue).  The queue is
    /// only popped once an idle robot is known to exist.
    pub fn assign_task_to_robot(&mut self) -> AllocResult<Option<JobId>> {
        let Some(&robot) = self.idle.first() else {
            tracing::trace!("no idle robot");
            return Ok(None);
        };
        let Some(key) = self.queue.pop_key()? else {
            tracing::trace!("task queue empty");
            return Ok(None);
        };
        if let Some(holder) = self.jobs.values().find(|j| j.key == key) {
            tracing::warn!(
                task = %key,
                job = %holder.id,
                robot = %holder.robot,
                "task already bound to a live job, dropped",
            );
            return Ok(None);
        }

        let waypoints = self.waypoints_for(robot, key)?;
        let grid = &self.layout.grid;
        let legs = [
            self.planner.plan(grid, waypoints.robot_start, waypoints.item_zone)?,
            self.planner.plan(grid, waypoints.item_zone, waypoints.station_zone)?,
            self.planner.plan(grid, waypoints.station_zone, waypoints.robot_home)?,
        ];
        if legs.iter().any(Vec::is_empty) {
            tracing::warn!(robot = %robot, task = %key, "leg unreachable, task requeued");
            self.queue.requeue(key);
            return Ok(None);
        }

        let id = JobId(self.next_job);
        self.next_job += 1;
        let mut job = Job::new(id, key, robot, waypoints);
        for (leg, path) in JobLeg::ALL.into_iter().zip(legs) {
            job.set_path(leg, path);
        }

        self.world.set_robot_status(robot, RobotStatus::InProgress)?;
        self.idle.remove(&robot);
        tracing::info!(job = %id, robot = %robot, task = %key, "task assigned");
        self.jobs.insert(robot, job);
        Ok(Some(id))
    }

    fn waypoints_for(&self, robot: RobotId, key: TaskKey) -> AllocResult<Waypoints> {
        let zone = |kind, id, pos: Option<Position>| pos.ok_or(AllocError::UnknownZone { kind, id });
        Ok(Waypoints {
            robot_start:  self.world.robot_position(robot)?,
            item_zone:    zone("item", key.item.0, self.layout.item_zone(key.item))?,
            station_zone: zone("station", key.station.0, self.layout.station_zone(key.station))?,
            robot_home:   zone("robot home", robot.0, self.layout.robot_home(robot))?,
        })
    }

    /// Advance the job bound to `robot` by at most one state.
    ///
    /// Dispatch states write the next leg to the world store and advance
    /// unconditionally.  Travel states advance only once the robot stands on
    /// the awaited waypoint, and return `false` while it is still on the way.
    /// A job that has already completed returns `false` without effect.
    pub fn check_and_update_job(&mut self, robot: RobotId) -> AllocResult<bool> {
        let Some(job) = self.jobs.get_mut(&robot) else {
            return Err(AllocError::NoJob(robot));
        };
        let state = job.state();

        match state {
            JobState::Complete | JobState::Error => Ok(false),

            JobState::WaitingToStart | JobState::ItemPicked | JobState::ItemDropped => {
                if let Some(leg) = job.pending_leg() {
                    let mut path = job.path(leg).clone();
                    let here = self.world.robot_position(robot)?;
                    if path.first() == Some(&here) {
                        path.remove(0);
                    }
                    self.world.set_robot_path(robot, path)?;
                }
                match state {
                    JobState::WaitingToStart => job.start()?,
                    JobState::ItemPicked => job.going_to_station()?,
                    _ => job.return_home()?,
                }
                Ok(true)
            }

            JobState::PickingItem | JobState::GoingToStation | JobState::ReturningHome => {
                let here = self.world.robot_position(robot)?;
                if job.awaited_waypoint() != Some(here) {
                    tracing::trace!(job = %job.id, robot = %robot, at = %here, "robot still travelling");
                    return Ok(false);
                }
                match state {
                    JobState::PickingItem => {
                        if !self.world.hold_item(robot, job.item())? {
                            tracing::error!(job = %job.id, robot = %robot, "robot already holding an item at pick-up");
                        }
                        job.pick_item()?;
                    }
                    JobState::GoingToStation => match self.world.drop_item(robot)? {
                        Some(item) if item == job.item() => {
                            job.drop_item()?;
                            self.queue.complete(job.key);
                            tracing::info!(job = %job.id, task = %job.key, "item dropped, task complete");
                        }
                        held => {
                            tracing::error!(job = %job.id, robot = %robot, ?held, expected = %job.item(), "drop failed");
                            self.fail_job(robot)?;
                        }
                    },
                    _ => {
                        job.complete()?;
                        self.retire(robot)?;
                    }
                }
                Ok(true)
            }
        }
    }

    /// Abort the job bound to `robot`: force `Error` and release the robot.
    ///
    /// The task key goes back on the queue only if its item has not been
    /// dropped yet; from `ItemDropped` on, the key is already complete.
    pub fn fail_job(&mut self, robot: RobotId) -> AllocResult<()> {
        let Some(job) = self.jobs.get_mut(&robot) else {
            return Err(AllocError::NoJob(robot));
        };
        let undelivered = matches!(
            job.state(),
            JobState::WaitingToStart | JobState::PickingItem | JobState::ItemPicked | JobState::GoingToStation
        );
        job.fail();
        if undelivered {
            self.queue.requeue(job.key);
        }
        self.world.set_robot_path(robot, Vec::new())?;
        self.world.drop_item(robot)?;
        self.retire(robot)
    }

    /// Move a terminal job out of the live set and free its robot.
    fn retire(&mut self, robot: RobotId) -> AllocResult<()> {
        let job = self.jobs.remove(&robot).ok_or(AllocError::NoJob(robot))?;
        self.world.set_robot_status(robot, RobotStatus::Available)?;
        self.idle.insert(robot);
        tracing::info!(job = %job.id, robot = %robot, state = %job.state(), "job retired");
        self.retired.push(job);
        Ok(())
    }

    /// One control tick: try one assignment, then advance every job that was
    /// live when the tick began by at most one state.
    ///
    /// A malformed key popped from the queue is logged and dropped; the tick
    /// carries on.  So does a job whose check fails: the error is logged, the
    /// job stays as it was, and the remaining jobs still advance.
    pub fn update(&mut self, observer: &mut dyn AllocatorObserver) -> AllocResult<TickReport> {
        let live: Vec<RobotId> = self.jobs.keys().copied().collect();
        let mut report = TickReport::default();

        match self.assign_task_to_robot() {
            Ok(Some(id)) => {
                report.assigned = Some(id);
                if let Some(job) = self.jobs.values().find(|j| j.id == id) {
                    observer.on_job_assigned(job);
                }
            }
            Ok(None) => {}
            Err(AllocError::Task(e @ TaskError::MalformedKey { .. })) => {
                tracing::error!(error = %e, "dropping malformed task key");
            }
            Err(e) => return Err(e),
        }

        for robot in live {
            let Some(from) = self.jobs.get(&robot).map(Job::state) else {
                continue;
            };
            let retired_before = self.retired.len();
            match self.check_and_update_job(robot) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::error!(robot = %robot, error = %e, "job check failed");
                    report.failed_checks += 1;
                    continue;
                }
            }
            report.transitions += 1;
            if self.retired.len() > retired_before {
                report.retired += 1;
                if let Some(job) = self.retired.last() {
                    observer.on_transition(job, from);
                    observer.on_job_retired(job);
                }
            } else if let Some(job) = self.jobs.get(&robot) {
                observer.on_transition(job, from);
            }
        }

        report.live = self.jobs.len();
        Ok(report)
    }
}
