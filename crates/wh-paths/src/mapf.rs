//! Multi-agent path finding by prioritized re-planning.
//!
//! [`mapf0`] plans every robot independently with A*.  [`mapf1`] starts from
//! those paths and hands them to [`resolve_collisions`], which repeatedly
//! re-plans the path blamed by the first recorded collision with Space-Time
//! A*, avoiding every `(cell, time)` ever recorded against that path.
//!
//! # Known incompleteness
//!
//! Obstacles accumulated for a path are never evicted, even after the clash
//! that produced them has been resolved.  Later re-plans keep avoiding stale
//! cells, which can waste iterations or make a path unnecessarily long.
//! The resolver is not globally optimal and may exhaust its budget; callers
//! must check [`MapfOutcome::collisions`].

use rustc_hash::FxHashMap;
use wh_core::{Grid, Path, PlannerConfig, Position};

use crate::astar::astar_with_budget;
use crate::collision::{Collision, find_all_collisions};
use crate::error::{PathError, PathResult};
use crate::heuristic::Heuristic;
use crate::st_astar::{DynamicObstacles, SpaceTimeQuery};

/// Result of a resolution run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapfOutcome {
    /// One path per robot, same order as the inputs.  A path the resolver
    /// could not re-plan is left empty.
    pub paths: Vec<Path>,
    /// Re-plan rounds consumed.
    pub iterations: usize,
    /// Collisions still present in `paths`.  Empty on success.
    pub collisions: Vec<Collision>,
}

impl MapfOutcome {
    pub fn is_collision_free(&self) -> bool {
        self.collisions.is_empty()
    }
}

fn check_lengths(starts: &[Position], goals: &[Position]) -> PathResult<()> {
    if starts.len() != goals.len() {
        return Err(PathError::LengthMismatch { starts: starts.len(), goals: goals.len() });
    }
    Ok(())
}

/// Independent A* per robot.  Collisions between the results are ignored.
pub fn mapf0(
    grid:      &Grid,
    starts:    &[Position],
    goals:     &[Position],
    heuristic: &dyn Heuristic,
    config:    &PlannerConfig,
) -> PathResult<Vec<Path>> {
    check_lengths(starts, goals)?;
    let plan = |(&s, &g): (&Position, &Position)| {
        astar_with_budget(grid, s, g, heuristic, config.astar_max_expansions).map(|o| o.path)
    };

    #[cfg(not(feature = "parallel"))]
    {
        starts.iter().zip(goals).map(plan).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        starts.par_iter().zip(goals.par_iter()).map(plan).collect()
    }
}

/// [`mapf0`] followed by [`resolve_collisions`].
pub fn mapf1(
    grid:      &Grid,
    starts:    &[Position],
    goals:     &[Position],
    heuristic: &dyn Heuristic,
    config:    &PlannerConfig,
) -> PathResult<MapfOutcome> {
    let paths = mapf0(grid, starts, goals, heuristic, config)?;
    resolve_collisions(grid, starts, goals, paths, heuristic, config)
}

/// Re-plan colliding paths until none collide or
/// `config.mapf_max_iterations` rounds are spent.
///
/// A collision-free input is returned unchanged with zero iterations.
pub fn resolve_collisions(
    grid:      &Grid,
    starts:    &[Position],
    goals:     &[Position],
    mut paths: Vec<Path>,
    heuristic: &dyn Heuristic,
    config:    &PlannerConfig,
) -> PathResult<MapfOutcome> {
    check_lengths(starts, goals)?;
    if paths.len() != starts.len() {
        return Err(PathError::LengthMismatch { starts: starts.len(), goals: paths.len() });
    }

    let mut collisions = find_all_collisions(&paths);
    if collisions.is_empty() {
        return Ok(MapfOutcome { paths, iterations: 0, collisions });
    }

    let mut obstacles: FxHashMap<usize, DynamicObstacles> = FxHashMap::default();
    record(&mut obstacles, &collisions);

    let mut iterations = 0;
    while iterations < config.mapf_max_iterations {
        let Some(first) = collisions.first() else { break };
        let idx = first.path;
        let reserved = obstacles.entry(idx).or_default();

        paths[idx] = SpaceTimeQuery::new(grid, starts[idx], goals[idx])
            .dynamic_obstacles(reserved)
            .max_time(config.st_max_time)
            .max_iters(config.st_max_iters)
            .heuristic(heuristic)
            .run()?;
        iterations += 1;

        collisions = find_all_collisions(&paths);
        tracing::debug!(iteration = iterations, path = idx, remaining = collisions.len(), "mapf re-plan");
        if collisions.is_empty() {
            break;
        }
        record(&mut obstacles, &collisions);
    }

    if !collisions.is_empty() {
        tracing::warn!(iterations, remaining = collisions.len(), "mapf budget exhausted with collisions");
    }
    Ok(MapfOutcome { paths, iterations, collisions })
}

fn record(obstacles: &mut FxHashMap<usize, DynamicObstacles>, collisions: &[Collision]) {
    for c in collisions {
        obstacles.entry(c.path).or_default().insert(c.obstacle());
    }
}
