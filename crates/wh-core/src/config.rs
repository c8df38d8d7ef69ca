//! Tunables for the planner and the allocator control loop.
//!
//! Built in code or deserialized by the host binary (under the `serde`
//! feature) and handed to `RobotAllocator::new`.

/// Search budgets and horizons for the pathfinding engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Node expansions plain A* may perform before giving up with an empty
    /// path.  Default: 10 000.
    pub astar_max_expansions: usize,

    /// Queue pops Space-Time A* may perform before giving up.  Default: 10 000.
    pub st_max_iters: usize,

    /// Absolute time horizon for Space-Time A* re-planning.  Default: 20.
    pub st_max_time: u32,

    /// Re-plan rounds the MAPF resolver may spend.  Default: 5.
    pub mapf_max_iterations: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            astar_max_expansions: 10_000,
            st_max_iters: 10_000,
            st_max_time: 20,
            mapf_max_iterations: 5,
        }
    }
}

/// Allocator control-loop settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AllocatorConfig {
    pub planner: PlannerConfig,

    /// Back-off between ticks when the queue is empty or no robot is idle.
    /// The allocator itself never sleeps; the host loop reads this.
    /// Default: 200 ms.
    pub poll_interval_ms: u64,

    /// Precompute an exact BFS distance table over the layout's zone cells and
    /// use it instead of Euclidean distance.  Default: false.
    pub use_true_heuristic: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            planner: PlannerConfig::default(),
            poll_interval_ms: 200,
            use_true_heuristic: false,
        }
    }
}

impl AllocatorConfig {
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms)
    }
}
