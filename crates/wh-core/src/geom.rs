//! Grid positions, robot actions, and coordinate-order conversions.
//!
//! `Position` is always **(row, col)**.  Rows grow downward, so `Action::Up`
//! decreases `row` and `Action::Right` increases `col`.  The only places x/y
//! pairs are allowed are the named boundary helpers at the bottom of this
//! module.

use std::fmt;

/// A cell address on the warehouse grid.
///
/// Signed so that neighbours of edge cells can be formed and then rejected by
/// a bounds check instead of wrapping.  Serialized as a `[row, col]` pair.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "(i32, i32)", into = "(i32, i32)")
)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

/// An ordered sequence of cells, one per time step.  Index `t` is the cell
/// occupied at elapsed step `t`; element 0 is the start.  Empty means "no
/// path found".
pub type Path = Vec<Position>;

impl Position {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The four 4-connected neighbours in fixed order: up, down, left, right.
    #[inline]
    pub fn neighbors4(self) -> [Position; 4] {
        [
            Position::new(self.row - 1, self.col),
            Position::new(self.row + 1, self.col),
            Position::new(self.row, self.col - 1),
            Position::new(self.row, self.col + 1),
        ]
    }

    /// `true` if `other` is this cell or one of its 4-neighbours.
    #[inline]
    pub fn is_adjacent_or_same(self, other: Position) -> bool {
        (self.row - other.row).abs() + (self.col - other.col).abs() <= 1
    }

    pub fn manhattan(self, other: Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    pub fn euclidean(self, other: Position) -> f64 {
        let dr = (self.row - other.row) as f64;
        let dc = (self.col - other.col) as f64;
        (dr * dr + dc * dc).sqrt()
    }

    // ── x/y boundary ──────────────────────────────────────────────────────

    /// Build from an `(x, y)` pair, where `x` is the column and `y` the row.
    #[inline]
    pub const fn from_xy(x: i32, y: i32) -> Self {
        Self { row: y, col: x }
    }

    /// The `(x, y)` pair for collaborators that speak column-first.
    #[inline]
    pub const fn to_xy(self) -> (i32, i32) {
        (self.col, self.row)
    }
}

impl From<(i32, i32)> for Position {
    /// Interprets the tuple as `(row, col)`.
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

impl From<Position> for (i32, i32) {
    fn from(p: Position) -> Self {
        (p.row, p.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Convert a path of `(x, y)` pairs into canonical positions.
pub fn flip_path_xy(xy: &[(i32, i32)]) -> Path {
    xy.iter().map(|&(x, y)| Position::from_xy(x, y)).collect()
}

// ── Action ────────────────────────────────────────────────────────────────────

/// One robot move per tick.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    #[default]
    Wait,
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 5] = [Action::Wait, Action::Up, Action::Down, Action::Left, Action::Right];

    /// `(d_row, d_col)` for this action.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::Wait  => (0, 0),
            Action::Up    => (-1, 0),
            Action::Down  => (1, 0),
            Action::Left  => (0, -1),
            Action::Right => (0, 1),
        }
    }

    #[inline]
    pub fn apply(self, pos: Position) -> Position {
        let (dr, dc) = self.delta();
        Position::new(pos.row + dr, pos.col + dc)
    }

    /// The action that moves a robot from `from` to `to`, or `None` if the two
    /// cells are not the same or 4-adjacent.
    pub fn between(from: Position, to: Position) -> Option<Action> {
        let d = (to.row - from.row, to.col - from.col);
        Action::ALL.into_iter().find(|a| a.delta() == d)
    }

    pub const fn opposite(self) -> Action {
        match self {
            Action::Wait  => Action::Wait,
            Action::Up    => Action::Down,
            Action::Down  => Action::Up,
            Action::Left  => Action::Right,
            Action::Right => Action::Left,
        }
    }

    /// `true` for the LEFT/RIGHT and UP/DOWN pairs, the only pairs along
    /// which two robots can swap cells.
    #[inline]
    pub fn opposes(self, other: Action) -> bool {
        self != Action::Wait && self.opposite() == other
    }

    /// Single-letter code used by the compact path encoding.
    pub const fn as_char(self) -> char {
        match self {
            Action::Wait  => 'W',
            Action::Up    => 'U',
            Action::Down  => 'D',
            Action::Left  => 'L',
            Action::Right => 'R',
        }
    }

    pub fn from_char(c: char) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.as_char() == c)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Wait  => "WAIT",
            Action::Up    => "UP",
            Action::Down  => "DOWN",
            Action::Left  => "LEFT",
            Action::Right => "RIGHT",
        };
        f.write_str(name)
    }
}
