//! Single-leg planning trait used by the allocator.
//!
//! The allocator plans each job leg independently against the static grid,
//! so it only needs "start to goal on this grid".  Swap in
//! [`SpaceTimePlanner`] to plan around a fixed set of reservations instead.

use wh_core::{Grid, Path, PlannerConfig, Position};

use crate::astar::astar_with_budget;
use crate::error::PathResult;
use crate::heuristic::{Euclidean, Heuristic};
use crate::st_astar::{DynamicObstacles, SpaceTimeQuery, StaticObstacles};

/// Pluggable leg planner.
///
/// Empty `Ok` path means unreachable; `Err` means bad endpoints.
pub trait PathPlanner: Send + Sync {
    fn plan(&self, grid: &Grid, start: Position, goal: Position) -> PathResult<Path>;
}

// ── AStarPlanner ──────────────────────────────────────────────────────────────

/// Plain grid A*.
#[derive(Clone, Debug)]
pub struct AStarPlanner<H = Euclidean> {
    heuristic:      H,
    max_expansions: usize,
}

impl Default for AStarPlanner<Euclidean> {
    fn default() -> Self {
        Self::new(Euclidean, &PlannerConfig::default())
    }
}

impl<H: Heuristic> AStarPlanner<H> {
    pub fn new(heuristic: H, config: &PlannerConfig) -> Self {
        Self { heuristic, max_expansions: config.astar_max_expansions }
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }
}

impl<H: Heuristic> PathPlanner for AStarPlanner<H> {
    fn plan(&self, grid: &Grid, start: Position, goal: Position) -> PathResult<Path> {
        astar_with_budget(grid, start, goal, &self.heuristic, self.max_expansions).map(|o| o.path)
    }
}

// ── SpaceTimePlanner ──────────────────────────────────────────────────────────

/// Space-Time A* with `end_fast`, avoiding a fixed reservation table.
#[derive(Clone, Debug, Default)]
pub struct SpaceTimePlanner<H = Euclidean> {
    heuristic: H,
    dynamic:   DynamicObstacles,
    statics:   StaticObstacles,
    max_time:  u32,
    max_iters: usize,
}

impl<H: Heuristic> SpaceTimePlanner<H> {
    pub fn new(heuristic: H, config: &PlannerConfig) -> Self {
        Self {
            heuristic,
            dynamic: DynamicObstacles::default(),
            statics: StaticObstacles::default(),
            max_time: config.st_max_time,
            max_iters: config.st_max_iters,
        }
    }

    /// Reserve `path` as a moving obstacle starting at tick `start_time`.
    pub fn reserve_path(&mut self, path: &[Position], start_time: u32) {
        for (t, &pos) in path.iter().enumerate() {
            self.dynamic.insert((pos, start_time + t as u32));
        }
    }

    pub fn block_cell(&mut self, pos: Position) {
        self.statics.insert(pos);
    }

    pub fn clear(&mut self) {
        self.dynamic.clear();
        self.statics.clear();
    }
}

impl<H: Heuristic> PathPlanner for SpaceTimePlanner<H> {
    fn plan(&self, grid: &Grid, start: Position, goal: Position) -> PathResult<Path> {
        SpaceTimeQuery::new(grid, start, goal)
            .dynamic_obstacles(&self.dynamic)
            .static_obstacles(&self.statics)
            .max_time(self.max_time)
            .max_iters(self.max_iters)
            .end_fast(true)
            .heuristic(&self.heuristic)
            .run()
    }
}
