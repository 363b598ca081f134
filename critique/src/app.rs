//! Central application state for critique.
//!
//! This module owns all mutable UI state: the review session, the editor
//! buffer, the current mode, which panel has focus, per-panel scroll offsets and
//! viewport heights. No ratatui rendering logic lives here. `app.rs` is read by
//! the render module and mutated by the keybinding dispatcher and the main loop.
//!
//! Review state itself is never mutated directly: every change goes through
//! [`AppState::dispatch`], which folds a [`SessionEvent`] into the session.

use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use critique_core::report::write_report;
use critique_core::session::{completion_event, log_failure};
use critique_core::{
    GeminiClient, Language, ReviewError, ReviewResult, SessionEvent, SessionState, Tab,
};
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;

use crate::editor::TextBuffer;
use crate::event::AppEvent;
use crate::loader::types::{LoadError, LoadRequest, LoadedFile};

/// Mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Vim-style navigation (default).
    #[default]
    Normal,
    /// Keys edit the source buffer.
    Insert,
    /// Language picker popup is open.
    LanguagePicker,
    /// Path prompt popup for loading a file is open.
    OpenFile,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
}

/// Which panel currently has keyboard focus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel: the source editor.
    #[default]
    Editor,
    /// Right panel: the review report.
    Review,
}

/// Rendered lines for one tab, reused until the tab, language or result changes.
#[derive(Debug)]
pub struct RenderedTab {
    pub key: (Tab, Language, u64),
    pub lines: Vec<Line<'static>>,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    /// The review session. Only changed through [`AppState::dispatch`].
    pub session: SessionState,
    pub mode: Mode,
    pub focus: PanelFocus,

    pub editor: TextBuffer,
    /// First visible editor line; adjusted by the renderer to keep the cursor shown.
    pub editor_scroll: usize,
    /// Vertical scroll offset for the review `Paragraph`.
    pub review_scroll: u16,
    pub help_scroll: u16,

    /// Inner heights after borders, cached after each render for page scrolling.
    pub editor_viewport_height: u16,
    pub review_viewport_height: u16,

    /// Selection in the language picker popup.
    pub language_list_state: ListState,
    /// Text typed into the open-file prompt.
    pub path_input: String,
    /// Last notice shown in the status bar (load results, exports).
    pub status_message: Option<String>,
    /// Directory `code_review_report.txt` is written to.
    pub export_dir: PathBuf,

    /// Sender half of the loader channel. `None` until the loader thread starts.
    pub loader_tx: Option<Sender<LoadRequest>>,

    /// Width percentage of the editor panel in the side-by-side layout.
    pub left_pct: u16,
    /// `[editor, review]` rects from the last render, for mouse hit-testing.
    pub panel_rects: [Rect; 2],

    pub spinner_frame: usize,
    /// Bumped on every completed review so cached tab lines are rebuilt.
    pub result_seq: u64,
    pub review_cache: Option<RenderedTab>,
}

impl AppState {
    pub fn new(language: Language, export_dir: PathBuf) -> Self {
        Self {
            session: SessionState::new(language),
            mode: Mode::default(),
            focus: PanelFocus::default(),
            editor: TextBuffer::default(),
            editor_scroll: 0,
            review_scroll: 0,
            help_scroll: 0,
            editor_viewport_height: 0,
            review_viewport_height: 0,
            language_list_state: ListState::default(),
            path_input: String::new(),
            status_message: None,
            export_dir,
            loader_tx: None,
            left_pct: 50,
            panel_rects: [Rect::default(); 2],
            spinner_frame: 0,
            result_seq: 0,
            review_cache: None,
        }
    }

    /// Folds `event` into the session.
    pub fn dispatch(&mut self, event: SessionEvent) {
        self.session = std::mem::take(&mut self.session).apply(event);
    }

    /// Copies the editor buffer into the session after an edit.
    pub fn sync_source(&mut self) {
        let text = self.editor.text();
        if text != self.session.source_text {
            self.dispatch(SessionEvent::SourceReplaced(text));
        }
    }

    // -----------------------------------------------------------------------
    // Review lifecycle
    // -----------------------------------------------------------------------

    /// Validates the session and, if it passes, spawns the request task.
    ///
    /// The task owns a snapshot of the request, so later edits do not affect
    /// it. Its outcome arrives as `AppEvent::ReviewFinished`. A submission while
    /// one is in flight is ignored.
    pub fn start_review(&mut self, client: &GeminiClient, tx: &UnboundedSender<AppEvent>) {
        self.sync_source();
        let request = match self.session.prepare_submission(client) {
            Ok(request) => request,
            Err(ReviewError::Busy) => {
                tracing::debug!("submission ignored, review already in flight");
                return;
            }
            Err(err) => {
                log_failure(&err);
                self.dispatch(SessionEvent::ReviewFailed(err.to_string()));
                return;
            }
        };

        self.dispatch(SessionEvent::ReviewStarted);
        self.review_scroll = 0;
        tracing::info!(language = %request.language(), "review started");

        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = client.review(&request).await;
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(AppEvent::ReviewFinished(Box::new(outcome)));
        });
    }

    /// Applies the outcome of the request task.
    pub fn finish_review(&mut self, outcome: critique_core::Result<ReviewResult>) {
        match &outcome {
            Ok(result) => {
                tracing::info!(
                    readability = result.readability.len(),
                    modularity = result.modularity.len(),
                    bugs = result.bugs.len(),
                    "review completed"
                );
                self.result_seq = self.result_seq.wrapping_add(1);
            }
            Err(err) => log_failure(err),
        }
        self.review_scroll = 0;
        self.dispatch(completion_event(outcome));
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.session.active_tab != tab {
            self.review_scroll = 0;
        }
        self.dispatch(SessionEvent::TabSelected(tab));
    }

    pub fn select_language(&mut self, language: Language) {
        self.dispatch(SessionEvent::LanguageSelected(language));
    }

    // -----------------------------------------------------------------------
    // Source loading
    // -----------------------------------------------------------------------

    /// Queues `path` on the loader thread.
    pub fn request_load(&mut self, path: PathBuf, detect_language: bool) {
        let Some(tx) = &self.loader_tx else {
            self.status_message = Some("File loader is not running.".to_owned());
            return;
        };
        let shown = path.display().to_string();
        let request = LoadRequest {
            path,
            detect_language,
        };
        if tx.send(request).is_err() {
            tracing::warn!("loader thread is gone");
            self.status_message = Some("File loader is not running.".to_owned());
        } else {
            self.status_message = Some(format!("Loading {shown}..."));
        }
    }

    /// Replaces the editor contents with a loaded file, or reports why not.
    ///
    /// Load failures leave the editor and the review session untouched.
    pub fn apply_loaded_file(&mut self, outcome: Result<LoadedFile, LoadError>) {
        match outcome {
            Ok(file) => {
                self.editor.set_text(&file.contents);
                self.editor_scroll = 0;
                self.sync_source();
                if let Some(language) = file.language {
                    self.select_language(language);
                }
                self.status_message = Some(format!("Loaded {}", file.path.display()));
            }
            Err(err) => self.status_message = Some(err.to_string()),
        }
    }

    pub fn clear_source(&mut self) {
        self.editor.clear();
        self.editor_scroll = 0;
        self.sync_source();
        self.status_message = Some("Source cleared".to_owned());
    }

    /// Writes the current result to `code_review_report.txt` in the export dir.
    pub fn export_report(&mut self) {
        let Some(result) = &self.session.current_result else {
            self.status_message = Some("Nothing to export yet.".to_owned());
            return;
        };
        self.status_message = Some(
            match write_report(&self.export_dir, result, self.session.language) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "report exported");
                    format!("Report saved to {}", path.display())
                }
                Err(err) => {
                    tracing::warn!(error = %err, "report export failed");
                    format!("Could not save report: {err}")
                }
            },
        );
    }

    // -----------------------------------------------------------------------
    // Popups
    // -----------------------------------------------------------------------

    pub fn open_language_picker(&mut self) {
        self.language_list_state.select(Some(self.session.language.index()));
        self.mode = Mode::LanguagePicker;
    }

    /// Applies the highlighted picker entry and closes the popup.
    pub fn confirm_language_picker(&mut self) {
        if let Some(language) = self
            .language_list_state
            .selected()
            .and_then(|i| Language::ALL.get(i).copied())
        {
            self.select_language(language);
        }
        self.mode = Mode::Normal;
    }

    pub fn open_file_prompt(&mut self) {
        self.path_input.clear();
        self.mode = Mode::OpenFile;
    }

    /// Sends the typed path to the loader and closes the prompt.
    pub fn confirm_file_prompt(&mut self) {
        self.mode = Mode::Normal;
        let raw = self.path_input.trim();
        if raw.is_empty() {
            return;
        }
        let path = expand_home(raw);
        self.request_load(path, true);
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    /// Scrolls the focused panel down by `lines` rows.
    ///
    /// For `Editor` the cursor moves; the renderer keeps it in view.
    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Editor => {
                for _ in 0..lines {
                    self.editor.move_down();
                }
            }
            PanelFocus::Review => {
                self.review_scroll = self.review_scroll.saturating_add(lines);
            }
        }
    }

    /// Scrolls the focused panel up by `lines` rows.
    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Editor => {
                for _ in 0..lines {
                    self.editor.move_up();
                }
            }
            PanelFocus::Review => {
                self.review_scroll = self.review_scroll.saturating_sub(lines);
            }
        }
    }

    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::Editor => {
                let (row, _) = self.editor.cursor();
                self.scroll_up(u16::try_from(row).unwrap_or(u16::MAX));
                self.editor.move_home();
            }
            PanelFocus::Review => self.review_scroll = 0,
        }
    }

    /// For `Review` sets the offset to u16::MAX; the renderer clamps it.
    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::Editor => {
                let (row, _) = self.editor.cursor();
                let remaining = self.editor.lines().len().saturating_sub(row + 1);
                self.scroll_down(u16::try_from(remaining).unwrap_or(u16::MAX));
            }
            PanelFocus::Review => self.review_scroll = u16::MAX,
        }
    }

    fn viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Editor => self.editor_viewport_height,
            PanelFocus::Review => self.review_viewport_height,
        }
    }

    /// Uses the viewport height cached from the previous render; scrolls by 1
    /// before the first frame.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.viewport_height() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.viewport_height() / 2).max(1));
    }

    /// Narrows the editor panel by 5%, never below 20%.
    pub fn shrink_editor_panel(&mut self) {
        const MIN_LEFT: u16 = 20;
        const STEP: u16 = 5;
        self.left_pct = self.left_pct.saturating_sub(STEP).max(MIN_LEFT);
    }

    /// Widens the editor panel by 5%, never above 80%.
    pub fn grow_editor_panel(&mut self) {
        const MAX_LEFT: u16 = 80;
        const STEP: u16 = 5;
        self.left_pct = (self.left_pct + STEP).min(MAX_LEFT);
    }

    pub fn advance_spinner(&mut self) {
        if self.session.loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }
}

/// Expands a leading `~/` against `$HOME`.
fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => Path::new(&home).join(rest),
        _ => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critique_core::{ClientConfig, Finding};

    fn state() -> AppState {
        AppState::new(Language::Python, PathBuf::from("."))
    }

    fn client(api_key: Option<&str>) -> GeminiClient {
        GeminiClient::new(ClientConfig {
            endpoint: "http://127.0.0.1:9".to_owned(),
            api_key: api_key.map(str::to_owned),
            ..ClientConfig::default()
        })
    }

    fn result() -> ReviewResult {
        ReviewResult {
            overall_assessment: "OK".to_owned(),
            readability: Vec::new(),
            modularity: Vec::new(),
            bugs: vec![Finding::new("no docstring", "def f():")],
        }
    }

    #[test]
    fn blank_source_fails_locally() {
        let mut app = state();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        app.editor.set_text("   \n\t");
        app.start_review(&client(Some("k")), &tx);
        assert!(!app.session.loading);
        assert_eq!(
            app.session.error_message.as_deref(),
            Some("Please enter or upload some code to review.")
        );
    }

    #[test]
    fn missing_key_fails_locally() {
        let mut app = state();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        app.editor.set_text("print(1)");
        app.start_review(&client(None), &tx);
        assert!(!app.session.loading);
        assert!(app.session.error_message.unwrap().starts_with("API key is not configured"));
    }

    #[tokio::test]
    async fn submission_sets_loading_and_second_submit_is_ignored() {
        let mut app = state();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        app.editor.set_text("def f():\n  pass");
        let client = client(Some("k"));

        app.start_review(&client, &tx);
        assert!(app.session.loading);
        assert_eq!(app.session.source_text, "def f():\n  pass");

        app.start_review(&client, &tx);
        assert!(app.session.loading);
        assert!(app.session.error_message.is_none());
    }

    #[test]
    fn finished_review_resets_tab_and_bumps_sequence() {
        let mut app = state();
        app.dispatch(SessionEvent::ReviewStarted);
        app.select_tab(Tab::Bugs);
        app.finish_review(Ok(result()));
        assert!(!app.session.loading);
        assert_eq!(app.session.active_tab, Tab::Overall);
        assert_eq!(app.result_seq, 1);

        app.dispatch(SessionEvent::ReviewStarted);
        app.finish_review(Err(ReviewError::NoValidReview));
        assert!(app.session.current_result.is_none());
        assert_eq!(app.result_seq, 1);
    }

    #[test]
    fn loaded_file_replaces_source_and_language() {
        let mut app = state();
        app.editor.set_text("old");
        app.apply_loaded_file(Ok(LoadedFile {
            path: PathBuf::from("main.rs"),
            contents: "fn main() {}".to_owned(),
            language: Some(Language::Rust),
        }));
        assert_eq!(app.session.source_text, "fn main() {}");
        assert_eq!(app.session.language, Language::Rust);
        assert_eq!(app.status_message.as_deref(), Some("Loaded main.rs"));
    }

    #[test]
    fn loaded_file_reaches_session_verbatim() {
        let mut app = state();
        let contents = "a = 1\r\nb = '\r'\r\n";
        app.apply_loaded_file(Ok(LoadedFile {
            path: PathBuf::from("crlf.py"),
            contents: contents.to_owned(),
            language: None,
        }));
        assert_eq!(app.session.source_text, contents);
        app.sync_source();
        assert_eq!(app.session.source_text, contents);
    }

    #[test]
    fn load_error_leaves_session_alone() {
        let mut app = state();
        app.editor.set_text("keep me");
        app.sync_source();
        app.apply_loaded_file(Err(LoadError::NotUtf8(PathBuf::from("blob.py"))));
        assert_eq!(app.session.source_text, "keep me");
        assert!(app.session.error_message.is_none());
        assert_eq!(app.status_message.as_deref(), Some("blob.py is not valid UTF-8 text"));
    }

    #[test]
    fn export_without_result_only_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = AppState::new(Language::Python, dir.path().to_path_buf());
        app.export_report();
        assert_eq!(app.status_message.as_deref(), Some("Nothing to export yet."));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn export_writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = AppState::new(Language::Python, dir.path().to_path_buf());
        app.dispatch(SessionEvent::ReviewCompleted(result()));
        app.export_report();
        let written = std::fs::read_to_string(dir.path().join("code_review_report.txt")).unwrap();
        assert!(written.contains("1. Suggestion: no docstring"));
    }

    #[test]
    fn picker_confirms_highlighted_language() {
        let mut app = state();
        app.open_language_picker();
        assert_eq!(app.language_list_state.selected(), Some(Language::Python.index()));
        app.language_list_state.select(Some(Language::Go.index()));
        app.confirm_language_picker();
        assert_eq!(app.session.language, Language::Go);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn file_prompt_without_loader_reports_it() {
        let mut app = state();
        app.open_file_prompt();
        app.path_input.push_str("main.rs");
        app.confirm_file_prompt();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("File loader is not running."));
    }

    #[test]
    fn file_prompt_queues_request() {
        let mut app = state();
        let (tx, rx) = crossbeam_channel::unbounded();
        app.loader_tx = Some(tx);
        app.open_file_prompt();
        app.path_input.push_str(" src/lib.rs ");
        app.confirm_file_prompt();
        let request = rx.try_recv().unwrap();
        assert_eq!(request.path, PathBuf::from("src/lib.rs"));
        assert!(request.detect_language);
    }

    #[test]
    fn review_scroll_saturates() {
        let mut app = state();
        app.focus = PanelFocus::Review;
        app.scroll_up(3);
        assert_eq!(app.review_scroll, 0);
        app.review_viewport_height = 10;
        app.half_page_down();
        assert_eq!(app.review_scroll, 5);
    }

    #[test]
    fn panel_resize_is_clamped() {
        let mut app = state();
        for _ in 0..20 {
            app.grow_editor_panel();
        }
        assert_eq!(app.left_pct, 80);
        for _ in 0..20 {
            app.shrink_editor_panel();
        }
        assert_eq!(app.left_pct, 20);
    }

    #[test]
    fn editor_scroll_moves_cursor() {
        let mut app = state();
        app.editor.set_text("a\nb\nc\nd");
        app.scroll_bottom();
        assert_eq!(app.editor.cursor().0, 3);
        app.scroll_top();
        assert_eq!(app.editor.cursor(), (0, 0));
    }
}
