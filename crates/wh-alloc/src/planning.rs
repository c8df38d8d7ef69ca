//! Leg planner construction from configuration.

use wh_core::AllocatorConfig;
use wh_paths::{AStarPlanner, Euclidean, Heuristic, TrueDistance};
use wh_world::Layout;

/// The planner the allocator uses for job legs.
pub type LegPlanner = AStarPlanner<Box<dyn Heuristic>>;

/// A* with Euclidean distance, or with a true-distance table over every zone
/// cell of `layout` when `use_true_heuristic` is set.  Legs only ever end on
/// zone cells, so the table covers every goal the allocator plans to.
pub fn leg_planner(config: &AllocatorConfig, layout: &Layout) -> LegPlanner {
    let heuristic: Box<dyn Heuristic> = if config.use_true_heuristic {
        let table = TrueDistance::for_goals(&layout.grid, layout.all_zones());
        tracing::info!(goals = table.len(), "true-distance heuristic built");
        Box::new(table)
    } else {
        Box::new(Euclidean)
    };
    AStarPlanner::new(heuristic, &config.planner)
}
