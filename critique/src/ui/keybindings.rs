//! Keybinding dispatcher for critique.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` telling the event loop what to do next. The dispatcher branches
//! first on `state.mode` so every mode has an isolated handler.
//!
//! Submitting is the one action that needs the client and the event sender,
//! so it is returned as [`KeyAction::Submit`] for the event loop to perform.

use critique_core::Tab;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};

/// Spaces inserted for Tab in Insert mode.
const INDENT: &str = "    ";

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
    /// Submit the current source for review.
    Submit,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// Ctrl-c quits and Ctrl-r submits from every mode.
///
/// # Arguments
///
/// * `key`:   the raw crossterm key event (code + modifiers)
/// * `state`: mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return KeyAction::Quit,
            KeyCode::Char('r') => return KeyAction::Submit,
            _ => {}
        }
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::LanguagePicker => handle_picker(key, state),
        Mode::OpenFile => handle_prompt(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
    }
}

/// Inserts bracketed-paste text.
///
/// Goes into the path prompt when it is open, otherwise into the editor at the
/// cursor. Ignored while the picker or help overlay is shown.
pub fn handle_paste(text: &str, state: &mut AppState) {
    match state.mode {
        Mode::OpenFile => {
            let first_line = text.lines().next().unwrap_or_default();
            state.path_input.push_str(first_line.trim());
        }
        Mode::Normal | Mode::Insert => {
            state.editor.insert_str(text);
            state.focus = PanelFocus::Editor;
            state.sync_source();
        }
        Mode::LanguagePicker | Mode::HelpOverlay => {}
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    if let Some(action) = handle_tab_key(key, state) {
        return action;
    }

    match key.code {
        KeyCode::Char('H') => state.focus = PanelFocus::Editor,
        KeyCode::Char('L') => state.focus = PanelFocus::Review,

        KeyCode::Char('<') => state.shrink_editor_panel(),
        KeyCode::Char('>') => state.grow_editor_panel(),

        KeyCode::Char('i') | KeyCode::Enter => {
            state.focus = PanelFocus::Editor;
            state.mode = Mode::Insert;
        }
        KeyCode::Char('r') => return KeyAction::Submit,
        KeyCode::Char('o') => state.open_file_prompt(),
        KeyCode::Char('l') => state.open_language_picker(),
        KeyCode::Char('e') => state.export_report(),
        KeyCode::Char('D') => state.clear_source(),

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        _ => {}
    }
    KeyAction::Continue
}

/// Result-tab keys: Tab / BackTab cycle, digits select directly.
fn handle_tab_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let tab = match key.code {
        KeyCode::Tab => state.session.active_tab.next(),
        KeyCode::BackTab => state.session.active_tab.prev(),
        KeyCode::Char(c @ '1'..='4') => Tab::ALL[(c as usize) - ('1' as usize)],
        _ => return None,
    };
    state.select_tab(tab);
    state.focus = PanelFocus::Review;
    Some(KeyAction::Continue)
}

/// Scroll keys in Normal mode: j / k / g / G, arrows and Ctrl-d / Ctrl-u.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') => state.scroll_top(),
        KeyCode::Char('G') => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Edits the source buffer. `Esc` returns to Normal mode.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let editor = &mut state.editor;
    match key.code {
        KeyCode::Esc => {
            state.mode = Mode::Normal;
            return KeyAction::Continue;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => editor.insert_char(c),
        KeyCode::Enter => editor.insert_newline(),
        KeyCode::Tab => editor.insert_str(INDENT),
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Delete => editor.delete(),
        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Up => editor.move_up(),
        KeyCode::Down => editor.move_down(),
        KeyCode::Home => editor.move_home(),
        KeyCode::End => editor.move_end(),
        _ => return KeyAction::Continue,
    }
    state.sync_source();
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Popups
// ---------------------------------------------------------------------------

fn handle_picker(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.language_list_state.select_next(),
        KeyCode::Char('k') | KeyCode::Up => state.language_list_state.select_previous(),
        KeyCode::Char('g') => state.language_list_state.select_first(),
        KeyCode::Char('G') => state.language_list_state.select_last(),
        KeyCode::Enter => state.confirm_language_picker(),
        KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

fn handle_prompt(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.path_input.push(c);
        }
        KeyCode::Backspace => {
            state.path_input.pop();
        }
        KeyCode::Enter => state.confirm_file_prompt(),
        KeyCode::Esc => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

/// `?`, `Esc` or `q` dismisses the overlay; j/k/g/G scroll it.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: click-to-focus and scroll-wheel.
///
/// The wheel scrolls the focused panel by 3 lines, or the help overlay when
/// it is open.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let pos = Position {
                x: mouse.column,
                y: mouse.row,
            };
            let [editor, review] = state.panel_rects;
            if editor.contains(pos) {
                state.focus = PanelFocus::Editor;
            } else if review.contains(pos) {
                state.focus = PanelFocus::Review;
            }
        }
        MouseEventKind::ScrollUp if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        MouseEventKind::ScrollDown if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp => state.scroll_up(3),
        MouseEventKind::ScrollDown => state.scroll_down(3),
        _ => {}
    }
    KeyAction::Continue
}
