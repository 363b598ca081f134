//! critique: structured AI code review in the terminal.
//!
//! Entry point for the `critique` binary. Wires together the CLI (`cli`),
//! configuration (`config`), logging (`logging`), the terminal lifecycle
//! (`tui`), the unified event bus (`event`), the file loader thread (`loader`)
//! and the UI (`ui`) around the review pipeline in `critique-core`.
//!
//! # Startup sequence (TUI mode)
//!
//! 1. File logging, then config and theme: safe before terminal init.
//! 2. `install_panic_hook()`: restores the terminal before the panic message prints.
//! 3. `register_sigterm()`: returns `Arc<AtomicBool>` polled in the event loop.
//! 4. `init_tui()`: enters alternate screen and enables raw mode.
//! 5. Event channel, input task and loader thread; a FILE argument is queued.
//!
//! `restore_tui()` runs after the event loop returns, whether it returned `Ok`
//! or `Err`. The panic hook covers unexpected panics.
//!
//! With `--print` none of the terminal machinery starts: one review runs and the
//! report goes to stdout or `--output`.

mod app;
mod cli;
mod config;
mod editor;
mod event;
mod highlight;
mod loader;
mod logging;
mod theme;
mod tui;
mod ui;

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use critique_core::report::build_report;
use critique_core::session::submit_review;
use critique_core::{GeminiClient, SessionEvent, SessionState};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::app::AppState;
use crate::cli::Cli;
use crate::event::{AppEvent, EventHandler};
use crate::loader::worker::{load_file, loader_worker_loop};
use crate::theme::Theme;
use crate::ui::keybindings::{handle_key, handle_mouse, handle_paste, KeyAction};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.print {
        run_print(&cli).await
    } else {
        run_tui(cli).await
    }
}

/// Reviews FILE once and writes the report. Review failures become the exit error.
async fn run_print(cli: &Cli) -> Result<()> {
    logging::init_stderr_logging()?;
    let settings = config::load(cli);

    let Some(path) = &cli.file else {
        bail!("--print needs a FILE to review");
    };
    let file = load_file(path, cli.language.is_none())?;
    let language = file.language.unwrap_or(settings.language);

    let client = GeminiClient::new(settings.client);
    let state = SessionState::new(language).apply(SessionEvent::SourceReplaced(file.contents));
    let state = submit_review(state, &client).await;

    if let Some(message) = state.error_message {
        bail!(message);
    }
    let result = state
        .current_result
        .context("review finished without a result")?;
    let report = build_report(&result, language);

    match &cli.output {
        Some(out) => {
            std::fs::write(out, report)
                .with_context(|| format!("writing report to {}", out.display()))?;
            tracing::info!(path = %out.display(), "report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(report.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

async fn run_tui(cli: Cli) -> Result<()> {
    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    let _log_guard = match logging::init_file_logging(&log_path) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("critique: logging disabled: {err:#}");
            None
        }
    };

    let settings = config::load(&cli);
    let theme = Theme::from_name(&settings.theme_name);
    let client = GeminiClient::new(settings.client);
    if !client.has_credential() {
        tracing::warn!("no API key configured, submissions will fail until one is set");
    }
    let mut state = AppState::new(settings.language, settings.export_dir);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("registering SIGTERM handler")?;
    let mut terminal = tui::init_tui().context("initialising terminal")?;

    let handler = EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let tx = handler.tx;
    let mut rx = handler.rx;

    let (loader_tx, loader_rx) = crossbeam_channel::unbounded();
    let loader_event_tx = tx.clone();
    let spawned = std::thread::Builder::new()
        .name("critique-loader".to_owned())
        .spawn(move || loader_worker_loop(loader_rx, loader_event_tx));
    match spawned {
        Ok(_) => state.loader_tx = Some(loader_tx),
        Err(err) => tracing::warn!(error = %err, "could not start loader thread"),
    }
    if let Some(path) = cli.file.clone() {
        state.request_load(path, cli.language.is_none());
    }

    tracing::info!(language = %state.session.language, "session started");
    let outcome =
        run_event_loop(&mut terminal, &mut state, &mut rx, &tx, &client, &theme, &term_flag)
            .await;

    tui::restore_tui()?;
    outcome
}

/// Drives the UI until quit, SIGTERM, or a draw error.
async fn run_event_loop(
    terminal: &mut tui::Tui,
    state: &mut AppState,
    rx: &mut UnboundedReceiver<AppEvent>,
    tx: &UnboundedSender<AppEvent>,
    client: &GeminiClient,
    theme: &Theme,
    term_flag: &AtomicBool,
) -> Result<()> {
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50ms even when idle.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        // Exactly one draw() call per Render event.
                        terminal.draw(|frame| ui::render(frame, state, theme))?;
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => handle_key(key, state),
                    Some(AppEvent::Paste(text)) => {
                        handle_paste(&text, state);
                        KeyAction::Continue
                    }
                    Some(AppEvent::Mouse(mouse)) => handle_mouse(mouse, state),
                    // ratatui picks up the new size on the next Render.
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    Some(AppEvent::Tick) => {
                        state.advance_spinner();
                        KeyAction::Continue
                    }
                    Some(AppEvent::FileLoaded(outcome)) => {
                        state.apply_loaded_file(*outcome);
                        KeyAction::Continue
                    }
                    Some(AppEvent::ReviewFinished(outcome)) => {
                        state.finish_review(*outcome);
                        KeyAction::Continue
                    }
                    None => break 'event_loop,
                };
                match action {
                    KeyAction::Quit => break 'event_loop,
                    KeyAction::Submit => state.start_review(client, tx),
                    KeyAction::Continue => {}
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }
    tracing::info!("session ended");
    Ok(())
}
