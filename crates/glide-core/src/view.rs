//! In-memory editor window
//!
//! `TextView` is a buffer of lines shown through a fixed-height window, with
//! closed folds collapsing to one row, a vi-style `scroll` option and a jump
//! history. It implements both host traits; its [`Timer`] runs on a virtual
//! clock that only advances through `yield_for`, which makes engine runs
//! deterministic.

use std::time::Duration;

use crate::motion::{Surface, Timer, TimerId};

/// A foldable line range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fold {
    pub start: usize,
    pub end: usize,
    pub closed: bool,
}

impl Fold {
    fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }
}

/// One row of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Line(usize),
    Fold { start: usize, end: usize },
}

impl Row {
    /// First buffer line shown on the row
    pub fn line(&self) -> usize {
        match self {
            Row::Line(line) => *line,
            Row::Fold { start, .. } => *start,
        }
    }
}

const FOLD_OPEN_MARKER: &str = "{{{";
const FOLD_CLOSE_MARKER: &str = "}}}";

#[derive(Debug, Clone)]
pub struct TextView {
    lines: Vec<String>,
    folds: Vec<Fold>,
    /// Cursor line, always the first line of its closed fold
    cursor: usize,
    col: usize,
    /// First line in the window
    top: usize,
    height: usize,
    /// vi `scroll` option, 0 means half the window
    scroll: usize,
    jumplist: Vec<usize>,
    alerts: usize,
    redraws: usize,
    clock: Duration,
    timer: Option<TimerId>,
    next_timer_id: u64,
}

impl TextView {
    /// Build a view over `lines`; an empty input becomes a single empty line
    pub fn from_lines<I, L>(lines: I, height: usize) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            folds: Vec::new(),
            cursor: 1,
            col: 0,
            top: 1,
            height: height.max(1),
            scroll: 0,
            jumplist: Vec::new(),
            alerts: 0,
            redraws: 0,
            clock: Duration::ZERO,
            timer: None,
            next_timer_id: 0,
        }
    }

    /// Build a view over `text`, closing a fold for every `{{{` ... `}}}`
    /// marker pair
    pub fn from_text(text: &str, height: usize) -> Self {
        let mut view = Self::from_lines(text.lines(), height);
        let mut open = Vec::new();
        for (idx, line) in view.lines.iter().enumerate() {
            let number = idx + 1;
            if line.contains(FOLD_OPEN_MARKER) {
                open.push(number);
            } else if line.contains(FOLD_CLOSE_MARKER) {
                if let Some(start) = open.pop() {
                    view.folds.push(Fold {
                        start,
                        end: number,
                        closed: true,
                    });
                }
            }
        }
        view.folds.sort_by_key(|f| (f.start, std::cmp::Reverse(f.end)));
        view.scroll_to_cursor();
        view
    }

    /// Place the cursor on `line` (builder form)
    pub fn with_cursor(mut self, line: usize) -> Self {
        self.set_cursor_line(line);
        self
    }

    /// Add a closed fold over `start..=end`
    ///
    /// Folds may nest but must not partially overlap.
    pub fn add_fold(&mut self, start: usize, end: usize) -> crate::Result<()> {
        if start == 0 || start > end || end > self.lines.len() {
            return Err(crate::Error::InvalidFold(format!(
                "{start}-{end} outside 1-{}",
                self.lines.len()
            )));
        }
        let crosses = self.folds.iter().any(|f| {
            let disjoint = end < f.start || f.end < start;
            let nested = (f.start <= start && end <= f.end) || (start <= f.start && f.end <= end);
            !disjoint && !nested
        });
        if crosses {
            return Err(crate::Error::InvalidFold(format!(
                "{start}-{end} overlaps an existing fold"
            )));
        }
        self.folds.push(Fold {
            start,
            end,
            closed: true,
        });
        self.folds.sort_by_key(|f| (f.start, std::cmp::Reverse(f.end)));
        self.scroll_to_cursor();
        Ok(())
    }

    /// Open the closed fold at `line`, or close the innermost open one
    ///
    /// Returns `false` when no fold contains `line`.
    pub fn toggle_fold(&mut self, line: usize) -> bool {
        if let Some(idx) = self
            .folds
            .iter()
            .position(|f| f.closed && f.contains(line))
        {
            self.folds[idx].closed = false;
        } else if let Some(fold) = self
            .folds
            .iter_mut()
            .filter(|f| f.contains(line))
            .min_by_key(|f| f.end - f.start)
        {
            fold.closed = true;
        } else {
            return false;
        }
        self.scroll_to_cursor();
        true
    }

    pub fn open_all_folds(&mut self) {
        self.folds.iter_mut().for_each(|f| f.closed = false);
        self.scroll_to_cursor();
    }

    pub fn close_all_folds(&mut self) {
        self.folds.iter_mut().for_each(|f| f.closed = true);
        self.scroll_to_cursor();
    }

    pub fn line_text(&self, line: usize) -> Option<&str> {
        self.lines.get(line.checked_sub(1)?).map(String::as_str)
    }

    pub fn top_line(&self) -> usize {
        self.top
    }

    pub fn resize(&mut self, height: usize) {
        self.height = height.max(1);
        self.scroll_to_cursor();
    }

    /// Cursor column, clamped to the current line
    pub fn cursor_col(&self) -> usize {
        let len = self
            .line_text(self.cursor)
            .map_or(0, |l| l.chars().count());
        self.col.min(len.saturating_sub(1))
    }

    pub fn jumplist(&self) -> &[usize] {
        &self.jumplist
    }

    pub fn alert_count(&self) -> usize {
        self.alerts
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Virtual time spent in `yield_for`
    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    pub fn timer_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Rows currently in the window, top to bottom
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.height);
        let mut line = Some(self.top);
        while let Some(current) = line {
            if rows.len() == self.height {
                break;
            }
            rows.push(match self.closed_range(current) {
                Some((start, end)) => Row::Fold { start, end },
                None => Row::Line(current),
            });
            line = self.next_unit(current);
        }
        rows
    }

    /// Outermost closed fold containing `line`
    fn closed_range(&self, line: usize) -> Option<(usize, usize)> {
        self.folds
            .iter()
            .filter(|f| f.closed && f.contains(line))
            .min_by_key(|f| f.start)
            .map(|f| (f.start, f.end))
    }

    fn unit_start(&self, line: usize) -> usize {
        self.closed_range(line).map_or(line, |(start, _)| start)
    }

    fn next_unit(&self, line: usize) -> Option<usize> {
        let next = self.closed_range(line).map_or(line, |(_, end)| end) + 1;
        (next <= self.lines.len()).then_some(next)
    }

    fn prev_unit(&self, line: usize) -> Option<usize> {
        let start = self.unit_start(line);
        (start > 1).then(|| self.unit_start(start - 1))
    }

    /// Window row of `line`, counting from the top line (may exceed the height)
    fn row_of(&self, line: usize) -> usize {
        let target = self.unit_start(line);
        let mut row = 1;
        let mut current = self.top;
        while current < target {
            match self.next_unit(current) {
                Some(next) => current = next,
                None => break,
            }
            row += 1;
        }
        row
    }

    /// Re-anchor cursor and top after a move so the cursor is inside the window
    fn scroll_to_cursor(&mut self) {
        self.cursor = self.unit_start(self.cursor.clamp(1, self.lines.len()));
        self.top = self.unit_start(self.top.clamp(1, self.lines.len()));
        if self.cursor < self.top {
            self.top = self.cursor;
            return;
        }
        while self.row_of(self.cursor) > self.height {
            match self.next_unit(self.top) {
                Some(next) => self.top = next,
                None => break,
            }
        }
    }
}

impl Surface for TextView {
    fn current_line(&self) -> usize {
        self.cursor
    }

    fn last_line(&self) -> usize {
        self.lines.len()
    }

    fn current_screen_row(&self) -> usize {
        self.row_of(self.cursor)
    }

    fn window_height(&self) -> usize {
        self.height
    }

    fn viewport_bottom_line(&self) -> usize {
        self.rows().last().map_or(self.top, Row::line)
    }

    fn move_cursor_relative(&mut self, delta: i64) {
        for _ in 0..delta.unsigned_abs() {
            let next = if delta > 0 {
                self.next_unit(self.cursor)
            } else {
                self.prev_unit(self.cursor)
            };
            match next {
                Some(line) => self.cursor = line,
                None => break,
            }
        }
        self.scroll_to_cursor();
    }

    fn move_viewport_relative(&mut self, delta: i64) {
        for _ in 0..delta.unsigned_abs() {
            if delta > 0 {
                let bottom = self.viewport_bottom_line();
                let bottom_end = self.closed_range(bottom).map_or(bottom, |(_, end)| end);
                if bottom_end < self.lines.len() {
                    if let Some(next) = self.next_unit(self.top) {
                        self.top = next;
                    }
                }
                if let Some(next) = self.next_unit(self.cursor) {
                    self.cursor = next;
                }
            } else {
                if let Some(prev) = self.prev_unit(self.top) {
                    self.top = prev;
                }
                if let Some(prev) = self.prev_unit(self.cursor) {
                    self.cursor = prev;
                }
                if self.row_of(self.cursor) > self.height {
                    self.cursor = self.viewport_bottom_line();
                }
            }
            self.scroll_to_cursor();
        }
        self.scroll = delta.unsigned_abs() as usize;
    }

    fn shift_viewport(&mut self, delta: i64) {
        for _ in 0..delta.unsigned_abs() {
            if delta > 0 {
                if let Some(next) = self.next_unit(self.top) {
                    self.top = next;
                }
                if self.cursor < self.top {
                    self.cursor = self.top;
                }
            } else {
                if let Some(prev) = self.prev_unit(self.top) {
                    self.top = prev;
                }
                if self.row_of(self.cursor) > self.height {
                    self.cursor = self.viewport_bottom_line();
                }
            }
        }
    }

    fn set_cursor_line(&mut self, line: usize) {
        self.cursor = line;
        self.scroll_to_cursor();
    }

    fn fold_start_of(&self, line: usize) -> Option<usize> {
        self.closed_range(line).map(|(start, _)| start)
    }

    fn fold_end_of(&self, line: usize) -> Option<usize> {
        self.closed_range(line).map(|(_, end)| end)
    }

    fn scroll_amount(&self) -> usize {
        if self.scroll == 0 {
            (self.height / 2).max(1)
        } else {
            self.scroll
        }
    }

    fn set_scroll_amount(&mut self, lines: usize) {
        self.scroll = lines;
    }

    fn ring_alert(&mut self) {
        self.alerts += 1;
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn record_jump(&mut self) {
        self.jumplist.push(self.cursor);
    }

    fn move_to_first_non_blank(&mut self) {
        self.col = self
            .line_text(self.cursor)
            .and_then(|l| l.chars().position(|c| !c.is_whitespace()))
            .unwrap_or(0);
    }

    // A plain view has no operators, so a linewise motion lands the same way.
    fn jump_to_line(&mut self, line: usize, _linewise: bool) {
        self.set_cursor_line(line);
    }
}

impl Timer for TextView {
    fn schedule_periodic(&mut self, _interval: Duration) -> TimerId {
        self.next_timer_id += 1;
        let id = TimerId(self.next_timer_id);
        self.timer = Some(id);
        id
    }

    fn cancel_periodic(&mut self, id: TimerId) {
        if self.timer == Some(id) {
            self.timer = None;
        }
    }

    fn yield_for(&mut self, interval: Duration) {
        self.clock += interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(lines: usize, height: usize) -> TextView {
        TextView::from_lines((1..=lines).map(|n| format!("line {n}")), height)
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let view = TextView::from_text("", 10);
        assert_eq!(view.last_line(), 1);
        assert_eq!(view.current_line(), 1);
    }

    #[test]
    fn test_fold_markers() {
        let text = "a\nb {{{\nc\nd }}}\ne {{{\nf {{{\ng }}}\nh }}}\ni";
        let view = TextView::from_text(text, 10);
        assert_eq!(view.fold_start_of(3), Some(2));
        assert_eq!(view.fold_end_of(3), Some(4));
        // Outer fold wins over the nested one
        assert_eq!(view.fold_start_of(7), Some(5));
        assert_eq!(view.fold_end_of(7), Some(8));
        assert_eq!(view.fold_start_of(9), None);
        assert_eq!(
            view.rows(),
            vec![
                Row::Line(1),
                Row::Fold { start: 2, end: 4 },
                Row::Fold { start: 5, end: 8 },
                Row::Line(9),
            ]
        );
    }

    #[test]
    fn test_add_fold_validation() {
        let mut view = numbered(20, 10);
        assert!(view.add_fold(0, 3).is_err());
        assert!(view.add_fold(5, 4).is_err());
        assert!(view.add_fold(5, 21).is_err());
        view.add_fold(5, 10).unwrap();
        assert!(view.add_fold(8, 12).is_err());
        view.add_fold(6, 7).unwrap();
        view.add_fold(2, 15).unwrap();
    }

    #[test]
    fn test_toggle_fold() {
        let mut view = numbered(20, 10).with_cursor(5);
        view.add_fold(5, 10).unwrap();
        assert_eq!(view.fold_start_of(7), Some(5));
        assert!(view.toggle_fold(5));
        assert_eq!(view.fold_start_of(7), None);
        assert!(view.toggle_fold(7));
        assert_eq!(view.fold_start_of(7), Some(5));
        assert!(!view.toggle_fold(15));
    }

    #[test]
    fn test_cursor_scrolls_window() {
        let mut view = numbered(100, 10);
        view.move_cursor_relative(15);
        assert_eq!(view.current_line(), 16);
        assert_eq!(view.top_line(), 7);
        assert_eq!(view.current_screen_row(), 10);
        view.move_cursor_relative(-12);
        assert_eq!(view.current_line(), 4);
        assert_eq!(view.top_line(), 4);
        assert_eq!(view.current_screen_row(), 1);
    }

    #[test]
    fn test_viewport_move_overwrites_scroll_option() {
        let mut view = numbered(100, 10);
        view.move_viewport_relative(3);
        assert_eq!(view.top_line(), 4);
        assert_eq!(view.current_line(), 4);
        assert_eq!(view.scroll_amount(), 3);
    }

    #[test]
    fn test_viewport_stops_scrolling_at_end() {
        let mut view = numbered(12, 10);
        view.move_viewport_relative(5);
        assert_eq!(view.top_line(), 3);
        assert_eq!(view.current_line(), 6);
    }

    #[test]
    fn test_shift_viewport_keeps_cursor_in_window() {
        let mut view = numbered(100, 10).with_cursor(3);
        view.shift_viewport(5);
        assert_eq!(view.top_line(), 6);
        assert_eq!(view.current_line(), 6);
        view.shift_viewport(-5);
        assert_eq!(view.top_line(), 1);
        assert_eq!(view.current_line(), 6);
    }

    #[test]
    fn test_bottom_line_with_fold() {
        let mut view = numbered(100, 5);
        view.add_fold(2, 30).unwrap();
        assert_eq!(view.viewport_bottom_line(), 33);
    }

    #[test]
    fn test_timer() {
        let mut view = numbered(5, 5);
        let id = view.schedule_periodic(Duration::from_millis(20));
        assert!(view.timer_active());
        view.cancel_periodic(TimerId(id.0 + 1));
        assert!(view.timer_active());
        view.cancel_periodic(id);
        assert!(!view.timer_active());
        view.yield_for(Duration::from_millis(20));
        view.yield_for(Duration::from_millis(20));
        assert_eq!(view.elapsed(), Duration::from_millis(40));
    }

    #[test]
    fn test_first_non_blank() {
        let mut view = TextView::from_text("\tfoo\n   \nbar", 5);
        view.move_to_first_non_blank();
        assert_eq!(view.cursor_col(), 1);
        view.set_cursor_line(2);
        view.move_to_first_non_blank();
        assert_eq!(view.cursor_col(), 0);
    }
}
