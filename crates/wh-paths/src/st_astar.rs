//! Space-Time A* over the `(row, col, t)` lattice.
//!
//! Each state has five successors, all one tick later: wait in place, then
//! up, down, left and right.  A state `(pos, t)` is valid when
//!
//! - `t <= max_time + start_time`,
//! - `pos` is in bounds and not a wall,
//! - `pos` is not a static obstacle, and
//! - `(pos, t)` is not a dynamic obstacle.
//!
//! With `end_fast` the search stops the first time it pops the goal cell.
//! Otherwise it must reach the goal at exactly `t == max_time` (absolute
//! time), so the path is padded with waits and has
//! `max_time - start_time + 1` entries.
//!
//! Ordering follows [`crate::astar`]: min-heap on `(f, seq)`, FIFO on ties.

use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use wh_core::{Action, Grid, Path, Position};

use crate::astar::{OpenEntry, SearchOutcome, check_endpoint};
use crate::error::PathResult;
use crate::heuristic::{Euclidean, Heuristic};

/// `(cell, absolute time)` pairs reserved by other agents.
pub type DynamicObstacles = FxHashSet<(Position, u32)>;

/// Cells forbidden at every time step.
pub type StaticObstacles = FxHashSet<Position>;

pub const DEFAULT_MAX_TIME: u32 = 20;
pub const DEFAULT_MAX_ITERS: usize = 10_000;

type State = (Position, u32);

/// Builder for one Space-Time A* search.
///
/// ```rust,ignore
/// let path = SpaceTimeQuery::new(&grid, start, goal)
///     .dynamic_obstacles(&reserved)
///     .max_time(30)
///     .end_fast(true)
///     .run()?;
/// ```
#[derive(Clone)]
pub struct SpaceTimeQuery<'a> {
    grid:          &'a Grid,
    start:         Position,
    goal:          Position,
    dynamic:       Option<&'a DynamicObstacles>,
    statics:       Option<&'a StaticObstacles>,
    max_time:      u32,
    start_time:    u32,
    end_fast:      bool,
    max_iters:     usize,
    validate_ends: bool,
    heuristic:     &'a dyn Heuristic,
}

impl<'a> SpaceTimeQuery<'a> {
    pub fn new(grid: &'a Grid, start: Position, goal: Position) -> Self {
        Self {
            grid,
            start,
            goal,
            dynamic: None,
            statics: None,
            max_time: DEFAULT_MAX_TIME,
            start_time: 0,
            end_fast: false,
            max_iters: DEFAULT_MAX_ITERS,
            validate_ends: true,
            heuristic: &Euclidean,
        }
    }

    pub fn dynamic_obstacles(mut self, obstacles: &'a DynamicObstacles) -> Self {
        self.dynamic = Some(obstacles);
        self
    }

    pub fn static_obstacles(mut self, obstacles: &'a StaticObstacles) -> Self {
        self.statics = Some(obstacles);
        self
    }

    /// Horizon, in absolute ticks.
    pub fn max_time(mut self, max_time: u32) -> Self {
        self.max_time = max_time;
        self
    }

    /// Absolute tick of the start state, for planning against obstacles
    /// recorded on a shared clock.
    pub fn start_time(mut self, start_time: u32) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn end_fast(mut self, end_fast: bool) -> Self {
        self.end_fast = end_fast;
        self
    }

    /// Queue-pop budget.
    pub fn max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// When `false`, the start and goal cells are valid at every tick,
    /// obstacles notwithstanding.  Used when robots park on shared zones.
    pub fn validate_ends(mut self, validate_ends: bool) -> Self {
        self.validate_ends = validate_ends;
        self
    }

    pub fn heuristic(mut self, heuristic: &'a dyn Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn run(&self) -> PathResult<Path> {
        self.run_with_stats().map(|o| o.path)
    }

    /// Like [`run`](Self::run), also reporting how many states were popped.
    pub fn run_with_stats(&self) -> PathResult<SearchOutcome> {
        check_endpoint(self.grid, self.start)?;
        check_endpoint(self.grid, self.goal)?;
        if self.validate_ends && (self.is_static(self.start) || self.is_static(self.goal)) {
            return Ok(SearchOutcome::default());
        }

        let origin: State = (self.start, self.start_time);
        let mut parent: FxHashMap<State, State> = FxHashMap::default();
        let mut seen: FxHashSet<State> = FxHashSet::default();
        let mut open: BinaryHeap<OpenEntry<State>> = BinaryHeap::new();
        let mut seq = 0u64;

        seen.insert(origin);
        open.push(OpenEntry { f: self.heuristic.estimate(self.start, self.goal), seq, node: origin });

        let mut pops = 0usize;
        while pops < self.max_iters {
            let Some(OpenEntry { node: cur, .. }) = open.pop() else { break };
            pops += 1;

            let (pos, t) = cur;
            if pos == self.goal && (self.end_fast || t == self.max_time) {
                let path = reconstruct(&parent, origin, cur);
                tracing::trace!(start = %self.start, goal = %self.goal, pops, len = path.len(), "st-astar found path");
                return Ok(SearchOutcome { path, expanded: pops });
            }

            let Some(next_t) = t.checked_add(1) else { continue };
            // Every successor has the same g, so the first push is final.
            let g = (next_t - self.start_time) as f64;
            for action in Action::ALL {
                let next = (action.apply(pos), next_t);
                if !self.is_valid(next) || !seen.insert(next) {
                    continue;
                }
                parent.insert(next, cur);
                seq += 1;
                open.push(OpenEntry { f: g + self.heuristic.estimate(next.0, self.goal), seq, node: next });
            }
        }

        tracing::debug!(start = %self.start, goal = %self.goal, pops, "st-astar found no path");
        Ok(SearchOutcome { path: Path::new(), expanded: pops })
    }

    fn is_static(&self, pos: Position) -> bool {
        self.statics.is_some_and(|s| s.contains(&pos))
    }

    fn is_valid(&self, (pos, t): State) -> bool {
        if t > self.max_time.saturating_add(self.start_time) {
            return false;
        }
        if !self.validate_ends && (pos == self.start || pos == self.goal) {
            return true;
        }
        self.grid.is_free(pos)
            && !self.is_static(pos)
            && !self.dynamic.is_some_and(|d| d.contains(&(pos, t)))
    }
}

/// Convenience wrapper mirroring the full parameter list.
#[allow(clippy::too_many_arguments)]
pub fn space_time_astar(
    grid:       &Grid,
    start:      Position,
    goal:       Position,
    dynamic:    &DynamicObstacles,
    statics:    &StaticObstacles,
    max_time:   u32,
    start_time: u32,
    end_fast:   bool,
    heuristic:  &dyn Heuristic,
) -> PathResult<Path> {
    SpaceTimeQuery::new(grid, start, goal)
        .dynamic_obstacles(dynamic)
        .static_obstacles(statics)
        .max_time(max_time)
        .start_time(start_time)
        .end_fast(end_fast)
        .heuristic(heuristic)
        .run()
}

fn reconstruct(parent: &FxHashMap<State, State>, origin: State, end: State) -> Path {
    let mut path = vec![end.0];
    let mut cur = end;
    while cur != origin {
        match parent.get(&cur) {
            Some(&p) => {
                path.push(p.0);
                cur = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
