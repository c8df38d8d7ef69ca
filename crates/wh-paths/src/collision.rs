//! Vertex and edge collision detection between time-indexed paths.

use std::fmt;

use wh_core::{Path, Position};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionKind {
    /// Both paths occupy the same cell at the same step.
    Vertex,
    /// The paths swap cells between two consecutive steps.
    Edge,
}

/// One detected clash.  `path` names the path expected to avoid it; `pos` and
/// `time` form the dynamic obstacle it should plan around.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collision {
    pub path: usize,
    pub pos:  Position,
    pub time: u32,
    pub kind: CollisionKind,
}

impl Collision {
    /// The `(cell, time)` pair for a dynamic-obstacle set.
    #[inline]
    pub fn obstacle(&self) -> (Position, u32) {
        (self.pos, self.time)
    }
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} collision for path {} at {} t={}", self.kind, self.path, self.pos, self.time)
    }
}

/// Cell at step `t`, holding the last cell once the path has ended.
#[inline]
fn at(path: &[Position], t: usize) -> Position {
    path[t.min(path.len() - 1)]
}

/// Collisions between `a` and `b`, labelled with `label` (normally `b`'s
/// index).
///
/// The shorter path is treated as waiting at its last cell until the longer
/// one ends.  Edge clashes are attributed to `b`'s cell at the later step.
/// A robot that waits is never counted as swapping.  Either path empty means
/// no collisions.
pub fn find_collisions(a: &[Position], b: &[Position], label: usize) -> Vec<Collision> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let horizon = a.len().max(b.len());
    let mut out = Vec::new();

    for t in 0..horizon {
        let (a_now, b_now) = (at(a, t), at(b, t));
        if a_now == b_now {
            out.push(Collision { path: label, pos: a_now, time: t as u32, kind: CollisionKind::Vertex });
        }
        if t > 0 {
            let (a_prev, b_prev) = (at(a, t - 1), at(b, t - 1));
            if a_prev == b_now && a_now == b_prev && a_prev != a_now {
                out.push(Collision { path: label, pos: b_now, time: t as u32, kind: CollisionKind::Edge });
            }
        }
    }
    out
}

/// Every pairwise collision, scanning pairs `(i, j)` with `i < j` in order
/// and labelling each with `j`.
pub fn find_all_collisions(paths: &[Path]) -> Vec<Collision> {
    let n = paths.len();
    let pairs_for = move |i: usize| {
        ((i + 1)..n).flat_map(move |j| find_collisions(&paths[i], &paths[j], j))
    };

    #[cfg(not(feature = "parallel"))]
    {
        (0..n).flat_map(pairs_for).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..n).into_par_iter().flat_map_iter(pairs_for).collect()
    }
}
