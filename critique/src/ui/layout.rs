//! Responsive 2-panel layout engine for critique.
//!
//! This module is pure layout arithmetic. It is called inside `terminal.draw()`
//! on every render so every frame gets a fresh layout that reflects the current
//! terminal size.
//!
//! # Panel geometry
//!
//! At `>= 100` columns the editor and the review sit side by side, the editor
//! taking `AppState.left_pct` percent. Narrower terminals stack them vertically
//! with the review below, mirroring a single-column web layout.
//!
//! `Spacing::Overlap(1)` combined with `Block::merge_borders(MergeStrategy::Fuzzy)`
//! makes adjacent panel borders share a single cell.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Below this width the panels stack vertically.
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;

/// Braille spinner frames advanced on every logic tick while loading.
pub const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Returns `[editor, review, status_bar]` `Rect`s for the current frame.
///
/// The returned rects are valid only for the current draw closure.
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 3] {
    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let split = if frame.area().width >= SIDE_BY_SIDE_MIN_WIDTH {
        Layout::horizontal([
            Constraint::Percentage(state.left_pct),
            Constraint::Fill(1),
        ])
    } else {
        Layout::vertical([Constraint::Percentage(45), Constraint::Fill(1)])
    }
    .spacing(Spacing::Overlap(1));

    let [editor, review] = main_area.layout(&split);
    [editor, review, status_bar]
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    })
}

/// Builds a bordered `Block` for a panel.
///
/// Focused panels get `BorderType::Thick`; `MergeStrategy::Fuzzy` is required
/// because `Exact` draws wrong junctions when `Thick` meets `Plain`.
///
/// # Arguments
///
/// * `title`: panel title shown in the top border
/// * `is_focused`: `true` when this panel has keyboard focus
/// * `theme`: active color theme (supplies `border_active` / `border_inactive`)
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Returns a centred popup rect of the given size, clamped to `area`.
pub fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    area.centered(
        Constraint::Length(width.min(area.width)),
        Constraint::Length(height.min(area.height)),
    )
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Shows the mode, the session language, a spinner while a review is in
/// flight, and the last status message.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::LanguagePicker => (" LANGUAGE ", theme.status_mode_normal),
        Mode::OpenFile => (" OPEN ", theme.status_mode_normal),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {} ", state.session.language.label())),
    ];
    if state.session.loading {
        spans.push(Span::styled(
            format!(" {} reviewing ", SPINNER[state.spinner_frame % SPINNER.len()]),
            Style::default().fg(theme.spinner),
        ));
    }
    if let Some(message) = &state.status_message {
        spans.push(Span::raw(format!(" {message}")));
    }
    spans.push(Span::styled("  ? help", Style::default().fg(theme.line_number)));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
