use glide_core::view::Row;
use glide_core::{Surface, TextView};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::Theme;

const TAB_WIDTH: usize = 4;

pub struct BufferViewWidget;

impl BufferViewWidget {
    pub fn render(frame: &mut Frame, area: Rect, view: &TextView, theme: &Theme, line_numbers: bool) {
        let width = area.width as usize;
        let gutter = if line_numbers {
            view.last_line().to_string().len() + 1
        } else {
            0
        };
        let text_width = width.saturating_sub(gutter);
        let cursor = view.current_line();

        let rows = view.rows();
        let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
        for row in rows.iter().take(area.height as usize) {
            let is_cursor = row.line() == cursor;
            let (text, base) = match *row {
                Row::Line(n) => (
                    expand_tabs(view.line_text(n).unwrap_or_default()),
                    Style::default().fg(theme.fg0),
                ),
                Row::Fold { start, end } => (
                    fold_label(view.line_text(start).unwrap_or_default(), end - start + 1),
                    Style::default().fg(theme.fold).bg(theme.bg1),
                ),
            };
            let style = if is_cursor { base.bg(theme.selection) } else { base };

            let mut spans = Vec::with_capacity(2);
            if gutter > 0 {
                let number_style = if is_cursor {
                    Style::default().fg(theme.yellow)
                } else {
                    Style::default().fg(theme.grey0)
                };
                spans.push(Span::styled(
                    format!("{:>w$} ", row.line(), w = gutter - 1),
                    number_style,
                ));
            }
            let body = fit(&text, text_width);
            // Fill the row so the cursor highlight spans the window
            let fill = if is_cursor || matches!(row, Row::Fold { .. }) {
                text_width.saturating_sub(body.width())
            } else {
                0
            };
            spans.push(Span::styled(format!("{body}{}", " ".repeat(fill)), style));
            lines.push(Line::from(spans));
        }

        // Rows past the end of the buffer
        while lines.len() < area.height as usize {
            lines.push(Line::from(Span::styled("~", Style::default().fg(theme.grey0))));
        }

        let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.bg0));
        frame.render_widget(paragraph, area);
    }
}

fn expand_tabs(text: &str) -> String {
    text.replace('\t', &" ".repeat(TAB_WIDTH))
}

/// Text of a closed fold row, e.g. `+-- 12 lines: fn main()`
fn fold_label(first_line: &str, count: usize) -> String {
    let title = first_line.replace("{{{", "").replace("}}}", "");
    format!("+--{count:>3} lines: {}", expand_tabs(title.trim()))
}

/// Cut `text` to at most `width` display columns
fn fit(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}
