//! Path prompt popup for loading a source file.

use ratatui::{
    Frame,
    layout::Position,
    style::Style,
    text::Line,
    widgets::{Block, Clear, Paragraph},
};

use crate::app::AppState;
use crate::loader::worker::accepted_extensions;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, popup_rect};

pub fn render_path_prompt(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let width = frame.area().width.saturating_sub(8).clamp(20, 80);
    let area = popup_rect(frame.area(), width, 4);
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Open file  Enter load, Esc cancel ")
        .border_style(Style::default().fg(theme.border_active));
    let body = vec![
        Line::raw(state.path_input.as_str()),
        Line::styled(accepted_extensions(), Style::default().fg(theme.placeholder)),
    ];
    frame.render_widget(Paragraph::new(body).block(block), area);

    let inner = inner_rect(area);
    let typed = u16::try_from(state.path_input.chars().count()).unwrap_or(u16::MAX);
    let x = inner.x.saturating_add(typed).min(inner.right().saturating_sub(1));
    frame.set_cursor_position(Position { x, y: inner.y });
}
