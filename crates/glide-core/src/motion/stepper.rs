//! Molecular Layer: single-line moves against the host
//!
//! Every animation tick ends up here as a count of whole lines. Each line is
//! applied on its own so a boundary stops the motion on the exact line where
//! it was hit.

use tracing::trace;

use super::animation::MoveMode;
use super::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Direction of a signed line count, `None` for zero
    pub fn of(lines: i64) -> Option<Self> {
        match lines.signum() {
            1 => Some(Direction::Down),
            -1 => Some(Direction::Up),
            _ => None,
        }
    }
}

/// Whether a move in `direction` can make progress from the current position
///
/// With `compensate_forward`, the last line is not a wall as long as the
/// window can still scroll it towards the top row.
pub fn is_blocked<S: Surface + ?Sized>(
    surface: &S,
    direction: Direction,
    compensate_forward: bool,
) -> bool {
    match direction {
        Direction::Up => at_first_line(surface),
        Direction::Down => {
            at_last_line(surface) && !(compensate_forward && surface.current_screen_row() > 1)
        }
    }
}

fn at_first_line<S: Surface + ?Sized>(surface: &S) -> bool {
    let line = surface.current_line();
    surface.fold_start_of(line).unwrap_or(line) <= 1
}

fn at_last_line<S: Surface + ?Sized>(surface: &S) -> bool {
    let line = surface.current_line();
    surface.fold_end_of(line).unwrap_or(line) >= surface.last_line()
}

/// Applies whole-line steps in one movement mode
pub struct Stepper<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    mode: MoveMode,
    compensate_forward: bool,
}

impl<'a, S: Surface + ?Sized> Stepper<'a, S> {
    pub fn new(surface: &'a mut S, mode: MoveMode, compensate_forward: bool) -> Self {
        Self {
            surface,
            mode,
            compensate_forward,
        }
    }

    /// Move one line; returns `true` if a boundary stopped the move
    pub fn step_one(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.step_up(),
            Direction::Down => self.step_down(),
        }
    }

    /// Move `|lines|` lines in the sign's direction
    ///
    /// Stops at the first boundary and returns `true`; the remaining steps
    /// are dropped.
    pub fn step_many(&mut self, lines: i64) -> bool {
        let Some(direction) = Direction::of(lines) else {
            return false;
        };
        for _ in 0..lines.unsigned_abs() {
            if self.step_one(direction) {
                trace!(?direction, line = self.surface.current_line(), "Boundary hit");
                return true;
            }
        }
        false
    }

    fn step_up(&mut self) -> bool {
        if at_first_line(self.surface) {
            return true;
        }
        match self.mode {
            MoveMode::CursorJump => self.surface.move_cursor_relative(-1),
            MoveMode::Scroll => self.scroll_one(-1),
        }
        false
    }

    fn step_down(&mut self) -> bool {
        if at_last_line(self.surface) {
            // A forward page may keep scrolling the tail of the buffer up
            // until the last line reaches the top row.
            if self.compensate_forward && self.surface.current_screen_row() > 1 {
                self.surface.shift_viewport(1);
                return false;
            }
            return true;
        }

        let initial_row = self.surface.current_screen_row();
        match self.mode {
            MoveMode::CursorJump => self.surface.move_cursor_relative(1),
            MoveMode::Scroll => {
                let bottom = self.surface.viewport_bottom_line();
                if let Some(end) = self.surface.fold_end_of(bottom) {
                    self.surface.set_cursor_line(end);
                }
                self.scroll_one(1);
            }
        }

        if self.compensate_forward && self.surface.current_screen_row() > initial_row {
            self.surface.shift_viewport(1);
        }
        false
    }

    /// One-line scroll that leaves the host's scroll amount untouched
    fn scroll_one(&mut self, delta: i64) {
        let saved = self.surface.scroll_amount();
        self.surface.move_viewport_relative(delta);
        self.surface.set_scroll_amount(saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::TextView;

    fn view(lines: usize, height: usize) -> TextView {
        TextView::from_lines((1..=lines).map(|n| format!("line {n}")), height)
    }

    #[test]
    fn test_direction_of() {
        assert_eq!(Direction::of(3), Some(Direction::Down));
        assert_eq!(Direction::of(-1), Some(Direction::Up));
        assert_eq!(Direction::of(0), None);
    }

    #[test]
    fn test_up_at_first_line_is_boundary() {
        let mut v = view(10, 5);
        let mut stepper = Stepper::new(&mut v, MoveMode::CursorJump, false);
        assert!(stepper.step_one(Direction::Up));
        assert_eq!(v.current_line(), 1);
    }

    #[test]
    fn test_cursor_step_moves_cursor_only() {
        let mut v = view(50, 10);
        let mut stepper = Stepper::new(&mut v, MoveMode::CursorJump, false);
        assert!(!stepper.step_many(3));
        assert_eq!(v.current_line(), 4);
        assert_eq!(v.top_line(), 1);
    }

    #[test]
    fn test_scroll_step_moves_view_and_keeps_scroll_amount() {
        let mut v = view(50, 10);
        v.set_scroll_amount(7);
        let mut stepper = Stepper::new(&mut v, MoveMode::Scroll, false);
        assert!(!stepper.step_many(4));
        assert_eq!(v.top_line(), 5);
        assert_eq!(v.current_line(), 5);
        assert_eq!(v.scroll_amount(), 7);
    }

    #[test]
    fn test_step_many_stops_at_last_line() {
        let mut v = view(10, 5).with_cursor(8);
        let mut stepper = Stepper::new(&mut v, MoveMode::CursorJump, false);
        assert!(stepper.step_many(5));
        assert_eq!(v.current_line(), 10);
    }

    #[test]
    fn test_step_many_upward_stops_at_first_line() {
        let mut v = view(30, 10).with_cursor(3);
        let mut stepper = Stepper::new(&mut v, MoveMode::Scroll, false);
        assert!(stepper.step_many(-5));
        assert_eq!(v.current_line(), 1);
    }

    #[test]
    fn test_cursor_step_skips_closed_fold() {
        let mut v = view(30, 10).with_cursor(4);
        v.add_fold(5, 12).unwrap();
        let mut stepper = Stepper::new(&mut v, MoveMode::CursorJump, false);
        stepper.step_many(2);
        assert_eq!(v.current_line(), 13);
    }

    #[test]
    fn test_fold_at_bottom_edge_is_skipped_in_one_step() {
        // Rows 1..=4 are lines 1..=4, row 5 is the fold 5..=20
        let mut v = view(40, 5);
        v.add_fold(5, 20).unwrap();
        assert_eq!(v.viewport_bottom_line(), 5);
        let mut stepper = Stepper::new(&mut v, MoveMode::Scroll, false);
        assert!(!stepper.step_one(Direction::Down));
        assert_eq!(v.current_line(), 21);
    }

    #[test]
    fn test_last_line_is_boundary_without_compensation() {
        let mut v = view(30, 10).with_cursor(30);
        assert!(v.current_screen_row() > 1);
        let mut stepper = Stepper::new(&mut v, MoveMode::Scroll, false);
        assert!(stepper.step_one(Direction::Down));
    }

    #[test]
    fn test_compensation_scrolls_past_last_line() {
        let mut v = view(30, 10).with_cursor(30);
        let row = v.current_screen_row();
        let top = v.top_line();
        let mut stepper = Stepper::new(&mut v, MoveMode::Scroll, true);
        assert!(!stepper.step_one(Direction::Down));
        assert_eq!(v.current_line(), 30);
        assert_eq!(v.top_line(), top + 1);
        assert_eq!(v.current_screen_row(), row - 1);
    }

    #[test]
    fn test_compensation_stops_with_last_line_on_top_row() {
        let mut v = view(30, 10).with_cursor(30);
        let mut stepper = Stepper::new(&mut v, MoveMode::Scroll, true);
        assert!(stepper.step_many(50));
        assert_eq!(v.top_line(), 30);
        assert_eq!(v.current_screen_row(), 1);
    }

    #[test]
    fn test_compensation_keeps_view_moving_when_window_cannot_scroll() {
        // Last line already visible: a plain scroll step only moves the cursor
        let mut v = view(30, 10).with_cursor(30);
        v.move_cursor_relative(-8);
        assert_eq!(v.current_line(), 22);
        assert_eq!(v.top_line(), 21);
        let mut plain = v.clone();
        Stepper::new(&mut plain, MoveMode::Scroll, false).step_one(Direction::Down);
        assert_eq!(plain.top_line(), 21);

        Stepper::new(&mut v, MoveMode::Scroll, true).step_one(Direction::Down);
        assert_eq!(v.current_line(), 23);
        assert_eq!(v.top_line(), 22);
    }

    #[test]
    fn test_is_blocked() {
        let v = view(30, 10);
        assert!(is_blocked(&v, Direction::Up, false));
        assert!(!is_blocked(&v, Direction::Down, false));

        let v = view(30, 10).with_cursor(30);
        assert!(is_blocked(&v, Direction::Down, false));
        assert!(!is_blocked(&v, Direction::Down, true));
    }
}
