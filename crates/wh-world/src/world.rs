//! In-process world simulator.
//!
//! Each [`World::step`] moves every robot one cell along its future path (or
//! leaves it waiting), then runs [`check_world`].  A collision is recorded
//! and logged but the simulation keeps going; the next valid step clears it.

use std::collections::BTreeMap;

use wh_core::{Action, Cell, Grid, ItemId, Path, Position, RobotId};

use crate::checker::{WorldCollision, check_world};
use crate::error::{WorldError, WorldResult};
use crate::layout::Layout;
use crate::robot::{Robot, RobotStatus};
use crate::store::WorldStore;

pub struct World {
    grid:           Grid,
    robots:         Vec<Robot>,
    index:          BTreeMap<RobotId, usize>,
    tick:           u64,
    last_collision: Option<WorldCollision>,
}

impl World {
    pub fn new(grid: Grid, robots: Vec<Robot>) -> WorldResult<Self> {
        let mut index = BTreeMap::new();
        for (i, r) in robots.iter().enumerate() {
            if index.insert(r.id, i).is_some() {
                return Err(WorldError::DuplicateRobot(r.id));
            }
        }
        Ok(Self { grid, robots, index, tick: 0, last_collision: None })
    }

    /// One robot per home zone, `RobotId(n)` at `robot_homes[n]`.
    pub fn from_layout(layout: &Layout) -> WorldResult<Self> {
        let robots = layout
            .robot_homes
            .iter()
            .enumerate()
            .map(|(i, &home)| Robot::new(RobotId(i as u32), home))
            .collect();
        Self::new(layout.grid.clone(), robots)
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn robots_ref(&self) -> &[Robot] {
        &self.robots
    }

    pub fn is_valid(&self) -> bool {
        self.last_collision.is_none()
    }

    pub fn last_collision(&self) -> Option<&WorldCollision> {
        self.last_collision.as_ref()
    }

    fn slot(&self, id: RobotId) -> WorldResult<usize> {
        self.index.get(&id).copied().ok_or(WorldError::RobotNotFound(id))
    }

    fn robot_mut(&mut self, id: RobotId) -> WorldResult<&mut Robot> {
        let i = self.slot(id)?;
        Ok(&mut self.robots[i])
    }

    /// Teleport a robot.  Test and setup helper; clears its last move.
    pub fn place_robot(&mut self, id: RobotId, pos: Position) -> WorldResult<()> {
        let r = self.robot_mut(id)?;
        r.pos = pos;
        r.last_pos = pos;
        r.last_action = Action::Wait;
        Ok(())
    }

    /// Advance one tick.  Returns `true` if any robot moved.
    pub fn step(&mut self) -> bool {
        let mut moved = 0usize;
        for r in &mut self.robots {
            moved += usize::from(r.advance());
        }

        self.last_collision = check_world(&self.grid, &self.robots);
        self.tick += 1;

        match &self.last_collision {
            Some(c) => tracing::warn!(tick = self.tick, collision = %c, "world entered an invalid state"),
            None => tracing::trace!(tick = self.tick, moved, "world step"),
        }
        moved > 0
    }

    /// ASCII snapshot: `#` wall, `.` free, `R` robot, `X` robot on a wall.
    pub fn render_ascii(&self) -> String {
        let mut rows: Vec<Vec<char>> = self
            .grid
            .to_string()
            .lines()
            .map(|l| l.chars().collect())
            .collect();
        for r in &self.robots {
            if let Some(cell) = self.grid.cell(r.pos) {
                let ch = if cell == Cell::Wall { 'X' } else { 'R' };
                rows[r.pos.row as usize][r.pos.col as usize] = ch;
            }
        }
        rows.into_iter().map(|r| r.into_iter().collect::<String>() + "\n").collect()
    }
}

impl WorldStore for World {
    fn robot(&self, id: RobotId) -> WorldResult<Robot> {
        Ok(self.robots[self.slot(id)?].clone())
    }

    fn robots(&self) -> Vec<Robot> {
        self.robots.clone()
    }

    fn set_robot_path(&mut self, id: RobotId, path: Path) -> WorldResult<()> {
        tracing::debug!(robot = %id, len = path.len(), "robot path set");
        self.robot_mut(id)?.set_path(path);
        Ok(())
    }

    fn set_robot_status(&mut self, id: RobotId, status: RobotStatus) -> WorldResult<()> {
        self.robot_mut(id)?.status = status;
        Ok(())
    }

    fn hold_item(&mut self, id: RobotId, item: ItemId) -> WorldResult<bool> {
        Ok(self.robot_mut(id)?.hold_item(item))
    }

    fn drop_item(&mut self, id: RobotId) -> WorldResult<Option<ItemId>> {
        Ok(self.robot_mut(id)?.drop_item())
    }
}
