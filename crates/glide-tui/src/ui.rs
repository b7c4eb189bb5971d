use glide_core::TextView;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::theme::Theme;
use crate::widgets::{BufferViewWidget, StatusBarWidget};

/// Everything drawn around the buffer
pub struct Chrome<'a> {
    pub title: &'a str,
    pub theme: &'a Theme,
    pub line_numbers: bool,
    /// Status message, shown instead of the pending keys
    pub message: Option<&'a str>,
    /// Count and prefix typed so far
    pub pending: String,
    pub animating: bool,
}

/// Draw one frame: buffer on top, one status line below
pub fn draw(frame: &mut Frame, view: &TextView, chrome: &Chrome) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    BufferViewWidget::render(frame, layout[0], view, chrome.theme, chrome.line_numbers);
    StatusBarWidget::render(frame, layout[1], view, chrome);
}
