//! Static occupancy grid shared by the planner and the world checker.
//!
//! Cells are stored row-major in a flat `Vec<Cell>`.  The grid is built once
//! per run and treated as read-only afterwards; nothing in the planner mutates
//! it.

use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::geom::Position;

/// State of one grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    #[default]
    Free,
    Wall,
}

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-free grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, cells: vec![Cell::Free; rows * cols] }
    }

    /// Build from nested rows.  Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> CoreResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(n_rows * n_cols);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(CoreError::Parse(format!(
                    "row {r} has {} cells, expected {n_cols}",
                    row.len()
                )));
            }
            cells.extend(row);
        }
        Ok(Self { rows: n_rows, cols: n_cols, cells })
    }

    /// Parse an ASCII map: `#` is a wall, `.` is free.  Blank lines and
    /// surrounding whitespace are ignored.
    pub fn parse_ascii(text: &str) -> CoreResult<Self> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|line| {
                line.chars()
                    .map(|c| match c {
                        '.' => Ok(Cell::Free),
                        '#' => Ok(Cell::Wall),
                        other => Err(CoreError::Parse(format!("unknown grid symbol {other:?}"))),
                    })
                    .collect::<CoreResult<Vec<_>>>()
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Self::from_rows(rows)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Flat index of `pos`, or `None` when out of bounds.
    #[inline]
    pub fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.row as usize * self.cols + pos.col as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Grid::index`].
    #[inline]
    pub fn position(&self, index: usize) -> Position {
        Position::new((index / self.cols) as i32, (index % self.cols) as i32)
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && (pos.row as usize) < self.rows && (pos.col as usize) < self.cols
    }

    /// `None` when out of bounds.
    #[inline]
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// In bounds and not a wall.
    #[inline]
    pub fn is_free(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Free)
    }

    /// Overwrite one cell.  Out-of-bounds writes are rejected.
    pub fn set(&mut self, pos: Position, cell: Cell) -> CoreResult<()> {
        let i = self
            .index(pos)
            .ok_or_else(|| CoreError::Config(format!("{pos} is outside a {}x{} grid", self.rows, self.cols)))?;
        self.cells[i] = cell;
        Ok(())
    }

    /// All free cells in row-major order.
    pub fn free_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Free)
            .map(|(i, _)| self.position(i))
    }

    /// Free 4-neighbours of `pos`, in up/down/left/right order.
    pub fn free_neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors4().into_iter().filter(|p| self.is_free(*p))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                let ch = match self.cells[r * self.cols + c] {
                    Cell::Free => '.',
                    Cell::Wall => '#',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
