//! Grid A* over 4-connected free cells.
//!
//! # Ordering
//!
//! The open list is a min-heap on `(f, seq)` where `seq` is a monotonically
//! increasing insertion counter.  `f` is compared with `f64::total_cmp`, so
//! equal-`f` entries pop in insertion order and results are identical across
//! runs for identical inputs.
//!
//! There is no closed set.  A cell is re-pushed whenever a cheaper `g` is
//! found and stale heap entries are skipped on pop.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use wh_core::{Grid, Path, Position};

use crate::error::{PathError, PathResult};
use crate::heuristic::Heuristic;

/// Default node-expansion budget for [`astar`].
pub const DEFAULT_MAX_EXPANSIONS: usize = 10_000;

/// A found path plus search effort, for comparing heuristics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchOutcome {
    /// Empty when no path was found within budget.
    pub path: Path,
    /// Nodes popped and expanded.
    pub expanded: usize,
}

// ── Open-list entry ───────────────────────────────────────────────────────────

/// Heap entry shared by A* and Space-Time A*.  Reversed ordering turns
/// `BinaryHeap` into a min-heap on `(f, seq)`.
#[derive(Debug)]
pub(crate) struct OpenEntry<N> {
    pub f: f64,
    pub seq: u64,
    pub node: N,
}

impl<N> PartialEq for OpenEntry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N> Eq for OpenEntry<N> {}

impl<N> PartialOrd for OpenEntry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for OpenEntry<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Reject out-of-bounds and wall endpoints.
pub(crate) fn check_endpoint(grid: &Grid, pos: Position) -> PathResult<()> {
    if !grid.in_bounds(pos) {
        return Err(PathError::OutOfBounds(pos));
    }
    if !grid.is_free(pos) {
        return Err(PathError::Blocked(pos));
    }
    Ok(())
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Shortest 4-connected path from `start` to `goal`, both included.
///
/// Returns an empty path when the goal is unreachable or the default
/// expansion budget runs out, and `Err` when either endpoint is a wall or off
/// the grid.
pub fn astar(grid: &Grid, start: Position, goal: Position, heuristic: &dyn Heuristic) -> PathResult<Path> {
    astar_with_budget(grid, start, goal, heuristic, DEFAULT_MAX_EXPANSIONS).map(|o| o.path)
}

/// [`astar`] with an explicit expansion budget, reporting search effort.
pub fn astar_with_budget(
    grid:           &Grid,
    start:          Position,
    goal:           Position,
    heuristic:      &dyn Heuristic,
    max_expansions: usize,
) -> PathResult<SearchOutcome> {
    check_endpoint(grid, start)?;
    check_endpoint(grid, goal)?;

    let mut g_score: FxHashMap<Position, u32> = FxHashMap::default();
    let mut parent: FxHashMap<Position, Position> = FxHashMap::default();
    let mut open: BinaryHeap<OpenEntry<(Position, u32)>> = BinaryHeap::new();
    let mut seq = 0u64;

    g_score.insert(start, 0);
    open.push(OpenEntry { f: heuristic.estimate(start, goal), seq, node: (start, 0) });

    let mut expanded = 0usize;
    while let Some(OpenEntry { node: (cur, g), .. }) = open.pop() {
        // Stale entry: a cheaper route to `cur` was pushed after this one.
        if g_score.get(&cur).is_some_and(|&best| g > best) {
            continue;
        }
        if cur == goal {
            let path = reconstruct(&parent, start, goal);
            tracing::trace!(%start, %goal, expanded, len = path.len(), "astar found path");
            return Ok(SearchOutcome { path, expanded });
        }
        if expanded >= max_expansions {
            tracing::debug!(%start, %goal, expanded, "astar budget exhausted");
            break;
        }
        expanded += 1;

        let next_g = g + 1;
        for n in grid.free_neighbors(cur) {
            if g_score.get(&n).is_none_or(|&old| next_g < old) {
                g_score.insert(n, next_g);
                parent.insert(n, cur);
                seq += 1;
                open.push(OpenEntry { f: next_g as f64 + heuristic.estimate(n, goal), seq, node: (n, next_g) });
            }
        }
    }

    Ok(SearchOutcome { path: Path::new(), expanded })
}

fn reconstruct(parent: &FxHashMap<Position, Position>, start: Position, goal: Position) -> Path {
    let mut path = vec![goal];
    let mut cur = goal;
    while cur != start {
        match parent.get(&cur) {
            Some(&p) => {
                path.push(p);
                cur = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
