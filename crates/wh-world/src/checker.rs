//! World consistency checker.
//!
//! Runs once per tick after every robot has taken its action.  Robots are
//! visited in registration order and the first violation found is reported;
//! later ones in the same tick are not looked for.
//!
//! | Kind     | Condition                                                    |
//! |----------|--------------------------------------------------------------|
//! | `Wall`   | robot stands on a wall or outside the grid                   |
//! | `Vertex` | robot stands on a cell an earlier-visited robot already holds |
//! | `Edge`   | robot entered the cell another robot left, that robot entered this robot's old cell, and the two actions oppose |

use std::fmt;

use rustc_hash::FxHashMap;

use wh_core::{Action, Grid, Position, RobotId};

use crate::robot::Robot;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViolationKind {
    Wall,
    Vertex,
    Edge,
}

/// One robot implicated in a violation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Involved {
    pub robot:  RobotId,
    pub pos:    Position,
    pub prev:   Position,
    pub action: Action,
}

impl From<&Robot> for Involved {
    fn from(r: &Robot) -> Self {
        Self { robot: r.id, pos: r.pos, prev: r.last_pos, action: r.last_action }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldCollision {
    pub kind:   ViolationKind,
    /// The robot that tripped the check first, then the other party.
    pub robots: Vec<Involved>,
}

impl WorldCollision {
    pub fn involves(&self, id: RobotId) -> bool {
        self.robots.iter().any(|r| r.robot == id)
    }
}

impl fmt::Display for WorldCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        for r in &self.robots {
            write!(f, " {} {}->{} ({})", r.robot, r.prev, r.pos, r.action)?;
        }
        Ok(())
    }
}

/// First violation in `robots`, or `None` if the state is valid.
pub fn check_world(grid: &Grid, robots: &[Robot]) -> Option<WorldCollision> {
    let before: FxHashMap<Position, usize> =
        robots.iter().enumerate().map(|(i, r)| (r.last_pos, i)).collect();
    let mut now: FxHashMap<Position, usize> = FxHashMap::default();

    for (i, robot) in robots.iter().enumerate() {
        if !grid.is_free(robot.pos) {
            return Some(WorldCollision { kind: ViolationKind::Wall, robots: vec![robot.into()] });
        }

        if let Some(&j) = now.get(&robot.pos) {
            return Some(WorldCollision {
                kind:   ViolationKind::Vertex,
                robots: vec![robot.into(), (&robots[j]).into()],
            });
        }
        now.insert(robot.pos, i);

        if let Some(&j) = before.get(&robot.pos) {
            let other = &robots[j];
            if j != i && other.pos == robot.last_pos && robot.last_action.opposes(other.last_action) {
                return Some(WorldCollision {
                    kind:   ViolationKind::Edge,
                    robots: vec![robot.into(), other.into()],
                });
            }
        }
    }
    None
}
