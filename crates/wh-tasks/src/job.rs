//! Per-assignment job state machine.
//!
//! ```text
//! WaitingToStart ─start─▶ PickingItem ─pick_item─▶ ItemPicked
//!   ─going_to_station─▶ GoingToStation ─drop_item─▶ ItemDropped
//!   ─return_home─▶ ReturningHome ─complete─▶ Complete
//! ```
//!
//! Every transition is legal from exactly one state.  A call from any other
//! state returns [`TaskError::InvalidTransition`] and leaves the job as it
//! was.  [`Job::fail`] moves any state to `Error`.
//!
//! The job never plans or touches the world.  It records the three leg paths
//! the allocator computed at assignment time and tells the allocator which
//! leg to dispatch and which waypoint to wait for in each state.

use std::fmt;

use wh_core::{ItemId, JobId, OrderId, Path, Position, RobotId, StationId};

use crate::error::{TaskError, TaskResult};
use crate::key::TaskKey;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JobState {
    WaitingToStart,
    PickingItem,
    ItemPicked,
    GoingToStation,
    ItemDropped,
    ReturningHome,
    Complete,
    Error,
}

impl JobState {
    /// The single legal successor, `None` for terminal states.
    pub const fn next(self) -> Option<JobState> {
        match self {
            JobState::WaitingToStart => Some(JobState::PickingItem),
            JobState::PickingItem    => Some(JobState::ItemPicked),
            JobState::ItemPicked     => Some(JobState::GoingToStation),
            JobState::GoingToStation => Some(JobState::ItemDropped),
            JobState::ItemDropped    => Some(JobState::ReturningHome),
            JobState::ReturningHome  => Some(JobState::Complete),
            JobState::Complete | JobState::Error => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, JobState::Complete | JobState::Error)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            JobState::WaitingToStart => "WAITING_TO_START",
            JobState::PickingItem    => "PICKING_ITEM",
            JobState::ItemPicked     => "ITEM_PICKED",
            JobState::GoingToStation => "GOING_TO_STATION",
            JobState::ItemDropped    => "ITEM_DROPPED",
            JobState::ReturningHome  => "RETURNING_HOME",
            JobState::Complete       => "COMPLETE",
            JobState::Error          => "ERROR",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three path segments of a job.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JobLeg {
    RobotToItem,
    ItemToStation,
    StationToHome,
}

impl JobLeg {
    pub const ALL: [JobLeg; 3] = [JobLeg::RobotToItem, JobLeg::ItemToStation, JobLeg::StationToHome];

    #[inline]
    const fn slot(self) -> usize {
        self as usize
    }
}

/// Fixed stops on a job's route, resolved when the job is created.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoints {
    pub robot_start:  Position,
    pub item_zone:    Position,
    pub station_zone: Position,
    pub robot_home:   Position,
}

impl Waypoints {
    /// `(start, goal)` of `leg`.
    pub fn endpoints(&self, leg: JobLeg) -> (Position, Position) {
        match leg {
            JobLeg::RobotToItem   => (self.robot_start, self.item_zone),
            JobLeg::ItemToStation => (self.item_zone, self.station_zone),
            JobLeg::StationToHome => (self.station_zone, self.robot_home),
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    pub id:        JobId,
    pub key:       TaskKey,
    pub robot:     RobotId,
    pub waypoints: Waypoints,
    legs:          [Path; 3],
    state:         JobState,
}

impl Job {
    /// A job in `WaitingToStart` with all legs empty.
    pub fn new(id: JobId, key: TaskKey, robot: RobotId, waypoints: Waypoints) -> Self {
        Self { id, key, robot, waypoints, legs: Default::default(), state: JobState::WaitingToStart }
    }

    #[inline]
    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn station(&self) -> StationId {
        self.key.station
    }

    pub fn order(&self) -> OrderId {
        self.key.order
    }

    pub fn item(&self) -> ItemId {
        self.key.item
    }

    pub fn idx(&self) -> u32 {
        self.key.idx
    }

    pub fn path(&self, leg: JobLeg) -> &Path {
        &self.legs[leg.slot()]
    }

    pub fn set_path(&mut self, leg: JobLeg, path: Path) {
        self.legs[leg.slot()] = path;
    }

    // ── Allocator hooks ───────────────────────────────────────────────────

    /// Leg to write to the world in this state, before transitioning.
    pub fn pending_leg(&self) -> Option<JobLeg> {
        match self.state {
            JobState::WaitingToStart => Some(JobLeg::RobotToItem),
            JobState::ItemPicked     => Some(JobLeg::ItemToStation),
            JobState::ItemDropped    => Some(JobLeg::StationToHome),
            _ => None,
        }
    }

    /// Leg the robot is currently driving.
    pub fn in_flight_leg(&self) -> Option<JobLeg> {
        match self.state {
            JobState::PickingItem    => Some(JobLeg::RobotToItem),
            JobState::GoingToStation => Some(JobLeg::ItemToStation),
            JobState::ReturningHome  => Some(JobLeg::StationToHome),
            _ => None,
        }
    }

    /// Cell the robot must reach before the next transition.
    pub fn awaited_waypoint(&self) -> Option<Position> {
        self.in_flight_leg().map(|leg| self.waypoints.endpoints(leg).1)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    fn advance(&mut self, from: JobState, op: &'static str) -> TaskResult<()> {
        match (self.state == from).then(|| from.next()).flatten() {
            Some(to) => {
                tracing::debug!(job = %self.id, robot = %self.robot, from = %from, to = %to, "job transition");
                self.state = to;
                Ok(())
            }
            None => Err(TaskError::InvalidTransition { job: self.id, op, state: self.state }),
        }
    }

    /// `WaitingToStart → PickingItem`
    pub fn start(&mut self) -> TaskResult<()> {
        self.advance(JobState::WaitingToStart, "start")
    }

    /// `PickingItem → ItemPicked`
    pub fn pick_item(&mut self) -> TaskResult<()> {
        self.advance(JobState::PickingItem, "pick item")
    }

    /// `ItemPicked → GoingToStation`
    pub fn going_to_station(&mut self) -> TaskResult<()> {
        self.advance(JobState::ItemPicked, "go to station")
    }

    /// `GoingToStation → ItemDropped`
    pub fn drop_item(&mut self) -> TaskResult<()> {
        self.advance(JobState::GoingToStation, "drop item")
    }

    /// `ItemDropped → ReturningHome`
    pub fn return_home(&mut self) -> TaskResult<()> {
        self.advance(JobState::ItemDropped, "return home")
    }

    /// `ReturningHome → Complete`
    pub fn complete(&mut self) -> TaskResult<()> {
        self.advance(JobState::ReturningHome, "complete")
    }

    /// Force `Error` from any state.
    pub fn fail(&mut self) {
        tracing::warn!(job = %self.id, robot = %self.robot, from = %self.state, "job failed");
        self.state = JobState::Error;
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}]: {} legs {}/{}/{}",
            self.id,
            self.robot,
            self.key,
            self.state,
            self.legs[0].len(),
            self.legs[1].len(),
            self.legs[2].len(),
        )
    }
}
