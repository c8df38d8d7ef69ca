//! Seeded RNG for order generation and randomized planner checks.
//!
//! One seed always yields one sequence, so simulated runs and generated test
//! grids are reproducible.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::CoreResult;
use crate::geom::Position;
use crate::grid::{Cell, Grid};

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// `None` on an empty slice.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }

    /// A `rows x cols` grid where each cell is a wall with probability
    /// `wall_p`.
    pub fn random_grid(&mut self, rows: usize, cols: usize, wall_p: f64) -> CoreResult<Grid> {
        let cells = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| if self.gen_bool(wall_p) { Cell::Wall } else { Cell::Free })
                    .collect()
            })
            .collect();
        Grid::from_rows(cells)
    }

    /// A uniformly chosen free cell of `grid`, `None` when it has none.
    pub fn free_cell(&mut self, grid: &Grid) -> Option<Position> {
        let free: Vec<Position> = grid.free_cells().collect();
        self.choose(&free).copied()
    }
}
