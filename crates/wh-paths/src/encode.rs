//! Path ↔ action conversions and the compact direction-string encoding.
//!
//! A direction string holds one letter per step (`U`, `D`, `L`, `R`, `W`),
//! so `[(1,1), (1,2), (2,2), (2,2)]` from start `(1,1)` encodes as `"RDW"`.
//! The start cell itself is never encoded.

use wh_core::{Action, Path, Position};

use crate::error::{PathError, PathResult};

/// One action per consecutive pair of cells.
pub fn path_to_actions(path: &[Position]) -> PathResult<Vec<Action>> {
    path.windows(2)
        .map(|w| Action::between(w[0], w[1]).ok_or(PathError::InvalidStep { from: w[0], to: w[1] }))
        .collect()
}

/// Cells visited by applying `actions` from `start`, start excluded.
pub fn actions_to_path(start: Position, actions: &[Action]) -> Path {
    actions
        .iter()
        .scan(start, |cur, a| {
            *cur = a.apply(*cur);
            Some(*cur)
        })
        .collect()
}

/// Encode `path` (start excluded) as a direction string.
pub fn encode_directions(start: Position, path: &[Position]) -> PathResult<String> {
    let mut prev = start;
    let mut out = String::with_capacity(path.len());
    for &next in path {
        let a = Action::between(prev, next).ok_or(PathError::InvalidStep { from: prev, to: next })?;
        out.push(a.as_char());
        prev = next;
    }
    Ok(out)
}

/// Inverse of [`encode_directions`].
pub fn decode_directions(start: Position, directions: &str) -> PathResult<Path> {
    let actions = directions
        .chars()
        .map(|c| Action::from_char(c).ok_or(PathError::InvalidDirection(c)))
        .collect::<PathResult<Vec<_>>>()?;
    Ok(actions_to_path(start, &actions))
}
