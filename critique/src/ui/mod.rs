//! UI rendering module for critique.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each
//! panel and popup has its own module.

mod editor_view;
mod language_picker;
mod layout;
mod prompt;
mod review_view;
pub mod help;
pub mod keybindings;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: editor, review report, status bar and any popup.
///
/// Called exactly once per `AppEvent::Render`. Panel rects and viewport heights
/// are written back into `state` so the next keypress can hit-test clicks and
/// compute page distances. The one-frame lag is imperceptible in practice.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `state`: mutable app state (scroll offsets and geometry are cached here)
/// * `theme`: active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [editor, review, status_bar] = compute_layout(frame, state);

    state.panel_rects = [editor, review];
    state.editor_viewport_height = inner_rect(editor).height;
    state.review_viewport_height = inner_rect(review).height;

    editor_view::render_editor(frame, editor, state, theme);
    review_view::render_review(frame, review, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    // Popups render last so they sit on top.
    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::LanguagePicker => language_picker::render_language_picker(frame, state, theme),
        Mode::OpenFile => prompt::render_path_prompt(frame, state, theme),
        Mode::Normal | Mode::Insert => {}
    }
}
