//! Review report panel.
//!
//! Shows, in priority order: the loading indicator, the last error, the tabbed
//! result, or the idle placeholder. Tab content comes from the core view model;
//! this module only styles it.

use critique_core::view::{tab_content, TabContent, NO_ISSUES};
use critique_core::{Language, ReviewResult, Tab};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs, Wrap},
};

use crate::app::{AppState, PanelFocus, RenderedTab};
use crate::highlight::highlight_snippet;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block, SPINNER};

pub const IDLE_TEXT: &str = "Your code review will appear here.";
pub const LOADING_TEXT: &str = "Analyzing your code...";

pub fn render_review(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Review;
    frame.render_widget(panel_block("Review Report", is_focused, theme), area);
    let inner = inner_rect(area);

    if state.session.loading {
        let spinner = SPINNER[state.spinner_frame % SPINNER.len()];
        let line = Line::from(vec![
            Span::styled(format!("{spinner} "), Style::default().fg(theme.spinner)),
            Span::raw(LOADING_TEXT),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    if let Some(message) = &state.session.error_message {
        frame.render_widget(
            Paragraph::new(Line::styled(message.as_str(), Style::default().fg(theme.error_fg)))
                .wrap(Wrap { trim: false }),
            inner,
        );
        return;
    }

    let Some(result) = &state.session.current_result else {
        frame.render_widget(
            Paragraph::new(Line::styled(IDLE_TEXT, Style::default().fg(theme.placeholder))),
            inner,
        );
        return;
    };

    let [tabs_area, body_area] =
        inner.layout(&Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]));

    let active = state.session.active_tab;
    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.label()));
    frame.render_widget(
        Tabs::new(titles)
            .select(active.index())
            .style(Style::default().fg(theme.tab_inactive))
            .highlight_style(
                Style::default()
                    .fg(theme.tab_active)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .divider("|"),
        tabs_area,
    );

    let key = (active, state.session.language, state.result_seq);
    if state.review_cache.as_ref().is_none_or(|c| c.key != key) {
        let lines = build_tab_lines(result, active, state.session.language, theme);
        state.review_cache = Some(RenderedTab { key, lines });
    }
    let lines = state
        .review_cache
        .as_ref()
        .map(|c| c.lines.clone())
        .unwrap_or_default();

    state.review_viewport_height = body_area.height;
    // Clamp so G lands on the last page rather than past it.
    let max_scroll = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .saturating_sub(body_area.height);
    state.review_scroll = state.review_scroll.min(max_scroll);

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((state.review_scroll, 0)),
        body_area,
    );
}

/// Styles the content of one tab into owned lines.
pub fn build_tab_lines(
    result: &ReviewResult,
    tab: Tab,
    language: Language,
    theme: &Theme,
) -> Vec<Line<'static>> {
    match tab_content(result, tab) {
        TabContent::Paragraphs(paragraphs) => paragraphs
            .into_iter()
            .map(|p| Line::styled(p.to_owned(), Style::default().fg(theme.suggestion)))
            .collect(),
        TabContent::Empty => vec![Line::styled(NO_ISSUES, Style::default().fg(theme.placeholder))],
        TabContent::Findings(findings) => {
            let mut lines = Vec::new();
            for (i, finding) in findings.iter().enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{}. ", i + 1),
                        Style::default().fg(theme.tab_active).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(finding.suggestion.clone(), Style::default().fg(theme.suggestion)),
                ]));
                if finding.has_snippet() {
                    lines.extend(
                        highlight_snippet(&finding.code_snippet, language)
                            .into_iter()
                            .map(|line| line.style(Style::default().bg(theme.snippet_bg))),
                    );
                }
                lines.push(Line::default());
            }
            lines
        }
    }
}
