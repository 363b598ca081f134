//! Source editor panel.
//!
//! Draws the buffer with a line-number gutter. The renderer owns vertical
//! scrolling: before drawing it moves `editor_scroll` just enough to keep the
//! cursor row visible. In Insert mode the terminal cursor is placed at the
//! buffer cursor.

use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Returns the scroll offset that keeps `row` inside a `height`-row viewport.
pub fn follow_cursor(scroll: usize, row: usize, height: usize) -> usize {
    if height == 0 {
        return row;
    }
    if row < scroll {
        row
    } else if row >= scroll + height {
        row + 1 - height
    } else {
        scroll
    }
}

/// Display form of a buffer line. A raw `\r` would move the terminal cursor,
/// so a trailing one renders blank and any other shows as `␍`. Both keep the
/// char count, so cursor columns still line up.
pub fn display_line(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    let body = text.strip_suffix('\r').unwrap_or(text);
    let mut shown = body.replace('\r', "␍");
    if body.len() != text.len() {
        shown.push(' ');
    }
    Cow::Owned(shown)
}

pub fn render_editor(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Editor;
    let title = format!("Source ({})", state.session.language.label());
    let block = panel_block(title, is_focused, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    let (row, col) = state.editor.cursor();
    state.editor_scroll = follow_cursor(state.editor_scroll, row, height);

    if state.editor.is_blank() && state.mode != Mode::Insert {
        let placeholder = format!("// Paste your {} here...", state.session.language.label());
        frame.render_widget(
            Paragraph::new(Line::styled(placeholder, Style::default().fg(theme.placeholder))),
            inner,
        );
        return;
    }

    let lines = state.editor.lines();
    let gutter = lines.len().to_string().len().max(3);
    let visible: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(state.editor_scroll)
        .take(height)
        .map(|(i, text)| {
            Line::from(vec![
                Span::styled(
                    format!("{:>gutter$} ", i + 1),
                    Style::default().fg(theme.line_number),
                ),
                Span::styled(display_line(text), Style::default().fg(theme.source_text)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(visible), inner);

    if state.mode == Mode::Insert && is_focused {
        let x = inner.x as usize + gutter + 1 + col;
        let y = inner.y as usize + row - state.editor_scroll;
        if x < (inner.x + inner.width) as usize && y < (inner.y + inner.height) as usize {
            // Bounds checked against the u16 inner rect above.
            frame.set_cursor_position(Position {
                x: x as u16,
                y: y as u16,
            });
        }
    }
}
