//! Warehouse layout: static grid plus the three zone lists.
//!
//! # CSV format
//!
//! One grid row per line, one integer code per cell, no header:
//!
//! ```csv
//! 1,1,1,1,1
//! 1,2,0,3,1
//! 1,2,0,4,1
//! 1,1,1,1,1
//! ```
//!
//! | Code | Meaning          | ASCII |
//! |------|------------------|-------|
//! | `0`  | free             | `.`   |
//! | `1`  | wall             | `#`   |
//! | `2`  | robot home zone  | `H`   |
//! | `3`  | item load zone   | `I`   |
//! | `4`  | station zone     | `S`   |
//!
//! Zones are collected in row-major order, then their cells become free.
//! Robot `n` lives at `robot_homes[n]`, item `n` loads at `item_zones[n]`
//! and station `n` (1-based, as the order store issues them) is
//! `station_zones[n - 1]`.

use std::io::Read;
use std::path::Path;

use wh_core::{Cell, Grid, ItemId, Position, RobotId, StationId};

use crate::error::{WorldError, WorldResult};

#[derive(Clone, Debug)]
pub struct Layout {
    pub grid:          Grid,
    pub robot_homes:   Vec<Position>,
    pub item_zones:    Vec<Position>,
    pub station_zones: Vec<Position>,
}

impl Layout {
    /// Build from rows of cell codes.
    pub fn from_codes(rows: &[Vec<u8>]) -> WorldResult<Self> {
        let mut robot_homes = Vec::new();
        let mut item_zones = Vec::new();
        let mut station_zones = Vec::new();

        let mut cells = Vec::with_capacity(rows.len());
        for (r, row) in rows.iter().enumerate() {
            let mut out = Vec::with_capacity(row.len());
            for (c, &code) in row.iter().enumerate() {
                let pos = Position::new(r as i32, c as i32);
                let cell = match code {
                    0 => Cell::Free,
                    1 => Cell::Wall,
                    2 => {
                        robot_homes.push(pos);
                        Cell::Free
                    }
                    3 => {
                        item_zones.push(pos);
                        Cell::Free
                    }
                    4 => {
                        station_zones.push(pos);
                        Cell::Free
                    }
                    other => {
                        return Err(WorldError::Layout(format!("unknown cell code {other} at {pos}")));
                    }
                };
                out.push(cell);
            }
            cells.push(out);
        }

        let layout = Self { grid: Grid::from_rows(cells)?, robot_homes, item_zones, station_zones };
        tracing::debug!(
            rows = layout.grid.rows(),
            cols = layout.grid.cols(),
            robots = layout.robot_homes.len(),
            items = layout.item_zones.len(),
            stations = layout.station_zones.len(),
            "layout loaded"
        );
        Ok(layout)
    }

    /// Load a CSV layout file.
    pub fn load_csv(path: &Path) -> WorldResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Like [`load_csv`](Self::load_csv) but reads any `Read` source.
    pub fn from_csv_reader<R: Read>(reader: R) -> WorldResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|field| {
                    field
                        .parse::<u8>()
                        .map_err(|_| WorldError::Layout(format!("invalid cell code {field:?}")))
                })
                .collect::<WorldResult<Vec<u8>>>()?;
            rows.push(row);
        }
        Self::from_codes(&rows)
    }

    /// ASCII layout using the symbols in the module table.  Blank lines and
    /// surrounding whitespace are ignored.
    pub fn parse_ascii(text: &str) -> WorldResult<Self> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|line| {
                line.chars()
                    .map(|ch| match ch {
                        '.' => Ok(0),
                        '#' => Ok(1),
                        'H' => Ok(2),
                        'I' => Ok(3),
                        'S' => Ok(4),
                        other => Err(WorldError::Layout(format!("unknown layout symbol {other:?}"))),
                    })
                    .collect::<WorldResult<Vec<u8>>>()
            })
            .collect::<WorldResult<Vec<_>>>()?;
        Self::from_codes(&rows)
    }

    pub fn robot_home(&self, robot: RobotId) -> Option<Position> {
        self.robot_homes.get(robot.index()).copied()
    }

    pub fn item_zone(&self, item: ItemId) -> Option<Position> {
        self.item_zones.get(item.index()).copied()
    }

    pub fn station_zone(&self, station: StationId) -> Option<Position> {
        station.index().checked_sub(1).and_then(|i| self.station_zones.get(i)).copied()
    }

    /// Every zone cell, homes first.
    pub fn all_zones(&self) -> impl Iterator<Item = Position> + '_ {
        self.robot_homes.iter().chain(&self.item_zones).chain(&self.station_zones).copied()
    }
}
