//! World-state store collaborator.
//!
//! The single source of truth for robot position.  Reads return snapshots;
//! callers re-read every tick instead of holding on to a `Robot`.

use wh_core::{ItemId, Path, Position, RobotId};

use crate::error::WorldResult;
use crate::robot::{Robot, RobotStatus};

pub trait WorldStore {
    fn robot(&self, id: RobotId) -> WorldResult<Robot>;

    /// All robots in registration order.
    fn robots(&self) -> Vec<Robot>;

    /// Replace the robot's future path.  An empty path clears it.
    fn set_robot_path(&mut self, id: RobotId, path: Path) -> WorldResult<()>;

    fn set_robot_status(&mut self, id: RobotId, status: RobotStatus) -> WorldResult<()>;

    /// `Ok(false)` when the robot already holds an item.
    fn hold_item(&mut self, id: RobotId, item: ItemId) -> WorldResult<bool>;

    fn drop_item(&mut self, id: RobotId) -> WorldResult<Option<ItemId>>;

    fn robot_position(&self, id: RobotId) -> WorldResult<Position> {
        self.robot(id).map(|r| r.pos)
    }
}
