//! Atomic Layer: the host boundary
//!
//! The engine never touches a buffer directly. Everything it needs from the
//! editor window and from the timer goes through these two traits.

use std::time::Duration;

/// Handle returned by [`Timer::schedule_periodic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Text window operations used by the engine
///
/// Lines and screen rows are 1-based. A closed fold is shown as one screen
/// row; `fold_start_of` / `fold_end_of` return `None` for lines that are not
/// inside a closed fold.
pub trait Surface {
    fn current_line(&self) -> usize;

    fn last_line(&self) -> usize;

    /// Row of the cursor within the window
    fn current_screen_row(&self) -> usize;

    fn window_height(&self) -> usize;

    /// Buffer line shown on the bottom row of the window
    fn viewport_bottom_line(&self) -> usize;

    /// Move the cursor `delta` screen lines, text stays put unless the cursor
    /// would leave the window
    fn move_cursor_relative(&mut self, delta: i64);

    /// Scroll text and cursor together by `delta` lines
    ///
    /// Hosts may overwrite the scroll amount as a side effect, the way a
    /// counted half-page scroll does in vi.
    fn move_viewport_relative(&mut self, delta: i64);

    /// Scroll the text by `delta` lines without moving the cursor, unless the
    /// cursor would leave the window
    fn shift_viewport(&mut self, delta: i64);

    fn set_cursor_line(&mut self, line: usize);

    fn fold_start_of(&self, line: usize) -> Option<usize>;

    fn fold_end_of(&self, line: usize) -> Option<usize>;

    /// Lines moved by a half-page scroll
    fn scroll_amount(&self) -> usize;

    fn set_scroll_amount(&mut self, lines: usize);

    fn ring_alert(&mut self);

    fn request_redraw(&mut self);

    /// Remember the cursor position in the jump history
    fn record_jump(&mut self);

    fn move_to_first_non_blank(&mut self);

    /// Put the cursor on `line` in one go, without animation
    fn jump_to_line(&mut self, line: usize, linewise: bool);
}

/// Periodic callback scheduling owned by the host
///
/// The host calls [`MotionEngine::on_tick`](super::MotionEngine::on_tick)
/// each time a scheduled timer fires.
pub trait Timer {
    fn schedule_periodic(&mut self, interval: Duration) -> TimerId;

    fn cancel_periodic(&mut self, id: TimerId);

    /// Let the host run for `interval` while a blocking jump waits
    fn yield_for(&mut self, interval: Duration);
}
