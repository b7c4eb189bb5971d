use glide_core::{Surface, TextView};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::Chrome;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, view: &TextView, chrome: &Chrome) {
        let theme = chrome.theme;
        let (mode_str, mode_color) = if chrome.animating {
            (" MOTION ", theme.aqua)
        } else {
            (" NORMAL ", theme.grey2)
        };

        let middle = match chrome.message {
            Some(msg) => format!(" {msg}"),
            None => format!(" {} {}", chrome.title, chrome.pending),
        };
        let position = format!(
            " {}:{} {} ",
            view.current_line(),
            view.cursor_col() + 1,
            scroll_position(view)
        );

        let used = mode_str.len() + middle.width() + position.len();
        let padding_len = (area.width as usize).saturating_sub(used);
        let middle_style = if chrome.message.is_some() {
            Style::default().fg(theme.alert).bg(theme.bg2)
        } else {
            Style::default().fg(theme.fg0).bg(theme.bg2)
        };

        let line = Line::from(vec![
            Span::styled(
                mode_str,
                Style::default()
                    .fg(theme.bg0)
                    .bg(mode_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(middle, middle_style),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(position, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Vim ruler position: All, Top, Bot or the percentage above the window
fn scroll_position(view: &TextView) -> String {
    let top = view.top_line();
    let bottom_visible = view.viewport_bottom_line() >= view.last_line()
        || view
            .fold_end_of(view.viewport_bottom_line())
            .is_some_and(|end| end >= view.last_line());
    match (top <= 1, bottom_visible) {
        (true, true) => "All".to_string(),
        (true, false) => "Top".to_string(),
        (false, true) => "Bot".to_string(),
        (false, false) => format!("{}%", (top - 1) * 100 / view.last_line()),
    }
}
