//! Pluggable distance estimates for A* and Space-Time A*.
//!
//! | Heuristic       | Admissible | Notes                                       |
//! |-----------------|------------|---------------------------------------------|
//! | [`Euclidean`]   | yes        | default                                     |
//! | [`Manhattan`]   | yes        | tight on an open 4-connected grid           |
//! | [`TrueDistance`]| exact      | BFS table per goal, built once per grid     |
//!
//! `TrueDistance` trades `O(goals × cells)` memory for perfect estimates, so
//! A* expands only cells on some shortest path.  Building it for every free
//! cell is quadratic; the allocator only builds it for zone cells, which are
//! the only goals it ever plans to.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use wh_core::{Grid, Position};

/// Distance estimate from `from` to `goal`.
///
/// `Send + Sync` so one heuristic can serve concurrent searches.
pub trait Heuristic: Send + Sync {
    fn estimate(&self, from: Position, goal: Position) -> f64;
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    #[inline]
    fn estimate(&self, from: Position, goal: Position) -> f64 {
        (**self).estimate(from, goal)
    }
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    #[inline]
    fn estimate(&self, from: Position, goal: Position) -> f64 {
        (**self).estimate(from, goal)
    }
}

/// Straight-line distance.
#[derive(Copy, Clone, Debug, Default)]
pub struct Euclidean;

impl Heuristic for Euclidean {
    #[inline]
    fn estimate(&self, from: Position, goal: Position) -> f64 {
        from.euclidean(goal)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    #[inline]
    fn estimate(&self, from: Position, goal: Position) -> f64 {
        from.manhattan(goal) as f64
    }
}

// ── TrueDistance ──────────────────────────────────────────────────────────────

/// Sentinel for cells the BFS never reached.
const UNREACHABLE: i32 = -1;

/// Exact shortest-path distances to a fixed set of goal cells.
///
/// Goals without a table fall back to Euclidean distance; cells the goal
/// cannot reach estimate to `f64::INFINITY`.
#[derive(Clone, Debug)]
pub struct TrueDistance {
    cols: usize,
    tables: FxHashMap<Position, Vec<i32>>,
}

impl TrueDistance {
    /// Tables for every free cell of `grid`.
    pub fn build(grid: &Grid) -> Self {
        Self::for_goals(grid, grid.free_cells())
    }

    /// Tables for the given goal cells only.  Wall and out-of-bounds goals are
    /// skipped.
    pub fn for_goals(grid: &Grid, goals: impl IntoIterator<Item = Position>) -> Self {
        let mut goals: Vec<Position> = goals.into_iter().filter(|g| grid.is_free(*g)).collect();
        goals.sort_unstable();
        goals.dedup();

        #[cfg(not(feature = "parallel"))]
        let tables: FxHashMap<Position, Vec<i32>> =
            goals.iter().map(|&g| (g, distances_from(grid, g))).collect();

        #[cfg(feature = "parallel")]
        let tables: FxHashMap<Position, Vec<i32>> = {
            use rayon::prelude::*;
            goals.par_iter().map(|&g| (g, distances_from(grid, g))).collect()
        };

        tracing::debug!(goals = tables.len(), cells = grid.rows() * grid.cols(), "built true-distance tables");
        Self { cols: grid.cols(), tables }
    }

    /// Number of goal tables held.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Exact distance, or `None` if `goal` has no table or `from` cannot reach
    /// it.
    pub fn distance(&self, from: Position, goal: Position) -> Option<u32> {
        let table = self.tables.get(&goal)?;
        if from.row < 0 || from.col < 0 || from.col as usize >= self.cols {
            return None;
        }
        let d = *table.get(from.row as usize * self.cols + from.col as usize)?;
        (d != UNREACHABLE).then_some(d as u32)
    }
}

impl Heuristic for TrueDistance {
    fn estimate(&self, from: Position, goal: Position) -> f64 {
        if !self.tables.contains_key(&goal) {
            return from.euclidean(goal);
        }
        match self.distance(from, goal) {
            Some(d) => d as f64,
            None => f64::INFINITY,
        }
    }
}

/// Breadth-first flood from `source` over free cells.  Row-major table of step
/// counts with `UNREACHABLE` for walls and disconnected cells.
fn distances_from(grid: &Grid, source: Position) -> Vec<i32> {
    let mut dist = vec![UNREACHABLE; grid.rows() * grid.cols()];
    let Some(si) = grid.index(source) else {
        return dist;
    };
    dist[si] = 0;

    let mut queue = VecDeque::from([source]);
    while let Some(cur) = queue.pop_front() {
        let Some(ci) = grid.index(cur) else { continue };
        let next = dist[ci] + 1;
        for n in grid.free_neighbors(cur) {
            if let Some(ni) = grid.index(n) {
                if dist[ni] == UNREACHABLE {
                    dist[ni] = next;
                    queue.push_back(n);
                }
            }
        }
    }
    dist
}
