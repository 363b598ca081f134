//! Language picker popup.

use critique_core::Language;
use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Clear, List, ListItem},
};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::popup_rect;

pub fn render_language_picker(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let height = Language::ALL.len() as u16 + 2;
    let area = popup_rect(frame.area(), 32, height);
    frame.render_widget(Clear, area);

    let current = state.session.language;
    let items: Vec<ListItem> = Language::ALL
        .iter()
        .map(|&lang| {
            let marker = if lang == current { "● " } else { "  " };
            ListItem::new(Line::raw(format!("{marker}{}", lang.label())))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::bordered()
                .title(" Language  Enter select, Esc cancel ")
                .border_style(Style::default().fg(theme.border_active)),
        )
        .highlight_style(
            Style::default().fg(theme.tab_active).add_modifier(Modifier::REVERSED),
        );

    frame.render_stateful_widget(list, area, &mut state.language_list_state);
}
