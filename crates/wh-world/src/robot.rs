//! Robot record as held by the world-state store.

use std::collections::VecDeque;
use std::fmt;

use wh_core::{Action, ItemId, Path, Position, RobotId};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RobotStatus {
    #[default]
    Available,
    InProgress,
    Error,
}

impl RobotStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RobotStatus::Available  => "AVAILABLE",
            RobotStatus::InProgress => "IN_PROGRESS",
            RobotStatus::Error      => "ERROR",
        }
    }
}

impl fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Robot {
    pub id:          RobotId,
    pub pos:         Position,
    /// Cell occupied before the last step.
    pub last_pos:    Position,
    /// Action taken on the last step.
    pub last_action: Action,
    pub held_item:   Option<ItemId>,
    pub status:      RobotStatus,
    /// Cells still to visit, one per tick.
    path:            VecDeque<Position>,
}

impl Robot {
    pub fn new(id: RobotId, pos: Position) -> Self {
        Self {
            id,
            pos,
            last_pos: pos,
            last_action: Action::Wait,
            held_item: None,
            status: RobotStatus::Available,
            path: VecDeque::new(),
        }
    }

    pub fn future_path(&self) -> &VecDeque<Position> {
        &self.path
    }

    /// Replace the future path.
    pub fn set_path(&mut self, path: Path) {
        self.path = path.into();
    }

    /// Append to the future path.
    pub fn extend_path(&mut self, path: impl IntoIterator<Item = Position>) {
        self.path.extend(path);
    }

    pub fn peek_next(&self) -> Option<Position> {
        self.path.front().copied()
    }

    /// Attach `item`.  `false` if the robot already holds something.
    pub fn hold_item(&mut self, item: ItemId) -> bool {
        if self.held_item.is_some() {
            return false;
        }
        self.held_item = Some(item);
        true
    }

    /// Detach and return the held item, if any.
    pub fn drop_item(&mut self) -> Option<ItemId> {
        self.held_item.take()
    }

    /// Move one tick along the future path, or wait when it is empty.
    /// Returns `true` if the robot consumed a path cell.
    pub fn advance(&mut self) -> bool {
        self.last_pos = self.pos;
        let Some(next) = self.path.pop_front() else {
            self.last_action = Action::Wait;
            return false;
        };
        self.last_action = match Action::between(self.pos, next) {
            Some(action) => action,
            None => {
                tracing::warn!(robot = %self.id, from = %self.pos, to = %next, "robot path jumps");
                Action::Wait
            }
        };
        self.pos = next;
        true
    }
}

impl fmt::Display for Robot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] at {}", self.id, self.status, self.pos)?;
        if let Some(item) = self.held_item {
            write!(f, " holding {item}")?;
        }
        Ok(())
    }
}
