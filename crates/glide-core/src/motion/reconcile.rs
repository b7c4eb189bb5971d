//! Atomic Layer: merging a new request into a running animation

use super::animation::MoveMode;

/// Result of [`merge`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    /// Displacement the animation should continue with
    pub target: i64,
    /// The running animation must be stopped before `target` is applied
    pub stop_first: bool,
}

/// Fold `new_lines` into the displacement still owed
///
/// - a zero request changes nothing
/// - with `break_on_reverse`, a request against the current direction stops
///   the animation and replaces the target
/// - a cursor jump always restarts from the real current line
/// - scrolls accumulate, so repeated presses extend the same curve
pub fn merge(existing: i64, new_lines: i64, mode: MoveMode, break_on_reverse: bool) -> Merge {
    if new_lines == 0 {
        return Merge { target: existing, stop_first: false };
    }

    let reverses = existing != 0 && existing.signum() != new_lines.signum();
    if break_on_reverse && reverses {
        return Merge { target: new_lines, stop_first: true };
    }

    match mode {
        MoveMode::CursorJump => Merge { target: new_lines, stop_first: true },
        MoveMode::Scroll => Merge {
            target: existing.saturating_add(new_lines),
            stop_first: false,
        },
    }
}
