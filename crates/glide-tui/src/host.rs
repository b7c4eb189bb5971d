//! Terminal-backed host for blocking motions
//!
//! A jump only returns once the cursor has arrived, so the regular event loop
//! cannot draw the frames in between. `TerminalHost` lends the view to the
//! engine and redraws the whole screen every time the engine yields.
//!
//! Terminal events are not read while a jump runs: Esc and resizes queue up
//! and are handled once the cursor has arrived, so a running jump cannot be
//! cancelled.

use std::time::Duration;

use glide_core::motion::TimerId;
use glide_core::{Surface, TextView, Timer};
use ratatui::{backend::Backend, Terminal};
use tracing::warn;

use crate::ui::{self, Chrome};

pub struct TerminalHost<'a, B: Backend> {
    view: &'a mut TextView,
    terminal: &'a mut Terminal<B>,
    chrome: Chrome<'a>,
}

impl<'a, B: Backend> TerminalHost<'a, B> {
    pub fn new(view: &'a mut TextView, terminal: &'a mut Terminal<B>, chrome: Chrome<'a>) -> Self {
        Self {
            view,
            terminal,
            chrome,
        }
    }
}

impl<B: Backend> Surface for TerminalHost<'_, B> {
    fn current_line(&self) -> usize {
        self.view.current_line()
    }

    fn last_line(&self) -> usize {
        self.view.last_line()
    }

    fn current_screen_row(&self) -> usize {
        self.view.current_screen_row()
    }

    fn window_height(&self) -> usize {
        self.view.window_height()
    }

    fn viewport_bottom_line(&self) -> usize {
        self.view.viewport_bottom_line()
    }

    fn move_cursor_relative(&mut self, delta: i64) {
        self.view.move_cursor_relative(delta)
    }

    fn move_viewport_relative(&mut self, delta: i64) {
        self.view.move_viewport_relative(delta)
    }

    fn shift_viewport(&mut self, delta: i64) {
        self.view.shift_viewport(delta)
    }

    fn set_cursor_line(&mut self, line: usize) {
        self.view.set_cursor_line(line)
    }

    fn fold_start_of(&self, line: usize) -> Option<usize> {
        self.view.fold_start_of(line)
    }

    fn fold_end_of(&self, line: usize) -> Option<usize> {
        self.view.fold_end_of(line)
    }

    fn scroll_amount(&self) -> usize {
        self.view.scroll_amount()
    }

    fn set_scroll_amount(&mut self, lines: usize) {
        self.view.set_scroll_amount(lines)
    }

    fn ring_alert(&mut self) {
        self.view.ring_alert()
    }

    fn request_redraw(&mut self) {
        self.view.request_redraw()
    }

    fn record_jump(&mut self) {
        self.view.record_jump()
    }

    fn move_to_first_non_blank(&mut self) {
        self.view.move_to_first_non_blank()
    }

    fn jump_to_line(&mut self, line: usize, linewise: bool) {
        self.view.jump_to_line(line, linewise)
    }
}

impl<B: Backend> Timer for TerminalHost<'_, B> {
    fn schedule_periodic(&mut self, interval: Duration) -> TimerId {
        self.view.schedule_periodic(interval)
    }

    fn cancel_periodic(&mut self, id: TimerId) {
        self.view.cancel_periodic(id)
    }

    /// Draw one frame, then sleep; pending input stays queued
    fn yield_for(&mut self, interval: Duration) {
        let view = &*self.view;
        let chrome = &self.chrome;
        if let Err(e) = self.terminal.draw(|frame| ui::draw(frame, view, chrome)) {
            warn!("Failed to draw during motion: {}", e);
        }
        std::thread::sleep(interval);
        self.view.yield_for(interval);
    }
}
