//! Help overlay renderer for critique.
//!
//! Draws a centred modal box over the panels, using ratatui's `Clear` widget to
//! erase the background first. The overlay is rendered inside the same
//! `terminal.draw()` closure as everything else.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal on top of the panels.
///
/// Skipped on terminals narrower than 40 columns to avoid a zero-height `Rect`.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `theme`: active color theme (supplies `border_active` for the modal border)
/// * `help_scroll`: vertical scroll offset; j/k in HelpOverlay mode mutate this field
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Review"),
        Line::from("  r / Ctrl-r    Submit the source for review"),
        Line::from("  Tab / S-Tab   Next / previous result tab"),
        Line::from("  1 2 3 4       Overall, Readability, Modularity, Potential Bugs"),
        Line::from("  e             Export report to code_review_report.txt"),
        Line::from(""),
        Line::from("Source"),
        Line::from("  i / Enter     Edit the source (Esc returns to normal mode)"),
        Line::from("  o             Open a file"),
        Line::from("  l             Choose the language"),
        Line::from("  D             Clear the source"),
        Line::from("  paste         Inserts at the cursor in any mode"),
        Line::from(""),
        Line::from("Navigation"),
        Line::from("  j / k         Down / up one line"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Half page down / up"),
        Line::from("  H / L         Focus source / review panel"),
        Line::from("  < / >         Narrow / widen the source panel"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit"),
        Line::from("  Ctrl-c        Quit from any mode"),
    ])
}
