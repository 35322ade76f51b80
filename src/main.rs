//! A small terminal editor for JSON files.
//!
//! Open a file, edit the raw text, validate and pretty-print it, save it back.
//! Run with a path to open it straight away.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::{
    actions,
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::ui::{
    editor_widget::EditorWidget, layout::AppLayout, popup, theme::Theme, toolbar::ToolbarWidget,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Open, validate, pretty-print and save JSON files")]
struct Cli {
    /// JSON file to open at start-up.  A missing file is created on first save.
    file: Option<PathBuf>,

    /// Spaces per indentation level (overrides the config file).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
    indent: Option<u8>,

    /// Write logs to this file.  With only `RUST_LOG` set, logs go to
    /// `json-edit.log` in the config directory.
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

/// Where logs go.  Never stderr: the TUI draws there.
fn log_destination(explicit: Option<&PathBuf>, rust_log_set: bool) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.clone()),
        None if rust_log_set => Some(config::default_log_path()),
        None => None,
    }
}

fn init_tracing(dest: Option<&Path>) -> Result<()> {
    let Some(path) = dest else {
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create log directory {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ───────────────────────────────────────── terminal ─────────

fn restore_terminal(out: &mut impl Write) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, DisableBracketedPaste, LeaveAlternateScreen, DisableMouseCapture, Show)
}

/// Puts the terminal into TUI mode and restores it when dropped, so an
/// early `?` return leaves the shell usable.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        // Panics skip the draw loop's error path; restore from the hook too.
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal(&mut stderr());
            default_hook(info);
        }));

        enable_raw_mode()?;
        let guard = Self;
        execute!(
            stderr(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            SetTitle("JSON Editor")
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore_terminal(&mut stderr()) {
            tracing::warn!("terminal restore failed: {e}");
        }
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_dest = log_destination(cli.log.as_ref(), std::env::var_os("RUST_LOG").is_some());
    init_tracing(log_dest.as_deref())?;

    // ── initial state ─────────────────────────────────────────
    let mut user_config = config::AppConfig::load();
    if let Some(indent) = cli.indent {
        user_config.indent_width = indent as usize;
    }
    let cwd = std::env::current_dir()?;
    let mut state = AppState::new(cwd, user_config);

    if let Some(path) = &cli.file {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.clone());
        if path.exists() {
            actions::open_file(&mut state, &path);
        } else {
            actions::start_new_file(&mut state, &path);
        }
    }

    // ── terminal setup ────────────────────────────────────────
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(Duration::from_millis(100));

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            state.terminal_area = area;
            let layout = AppLayout::from_area(area);

            frame.render_widget(ToolbarWidget { config: &state.config }, layout.toolbar_area);

            let geo = handler::editor_geometry(&state);
            state
                .buffer
                .reveal_cursor(geo.text.height as usize, geo.text.width as usize);

            let editor_block = Block::default()
                .title(format!(" {} ", state.document_title()))
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());
            frame.render_widget(
                EditorWidget {
                    buffer: &state.buffer,
                    block: editor_block,
                    line_numbers: state.config.line_numbers,
                },
                layout.editor_area,
            );

            let cursor = state.buffer.cursor();
            let position = format!("Ln {}, Col {} ", cursor.line + 1, cursor.col + 1);
            // Message on the left, cursor position flush right.
            let pad = (layout.status_area.width as usize)
                .saturating_sub(position.chars().count() + 1);
            let status_text = format!(" {:<pad$}{position}", state.status_message);
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);

            match state.active_view {
                ActiveView::Editor => {
                    if state.message.is_none() {
                        if let Some(pos) = geo.cursor_position(&state.buffer) {
                            frame.set_cursor_position(pos);
                        }
                    }
                }
                ActiveView::OpenDialog => {
                    if let Some(dialog) = &state.open_dialog {
                        frame.render_widget(popup::OpenDialogPopup { dialog }, area);
                    }
                }
                ActiveView::SaveAsPrompt => {
                    if let Some(prompt) = &state.save_as {
                        frame.render_widget(popup::SaveAsPopup { prompt }, area);
                        if state.message.is_none() {
                            frame.set_cursor_position(popup::save_as_cursor(area, prompt));
                        }
                    }
                }
                ActiveView::SettingsMenu => {
                    frame.render_widget(popup::SettingsPopup { state: &state }, area);
                }
                ActiveView::ControlsSubmenu => {
                    frame.render_widget(
                        popup::ControlsPopup {
                            config: &state.config,
                            selected: state.controls_selected,
                            awaiting_rebind: state.awaiting_rebind,
                        },
                        area,
                    );
                }
            }

            if let Some(message) = &state.message {
                frame.render_widget(popup::MessagePopup { message }, area);
            }
        })?;

        match events.recv().await {
            Some(AppEvent::Key(k)) => handler::handle_key(&mut state, k),
            Some(AppEvent::Mouse(m)) => handler::handle_mouse(&mut state, m),
            Some(AppEvent::Paste(text)) => handler::handle_paste(&mut state, &text),
            Some(AppEvent::Resize(_, _)) | Some(AppEvent::Tick) => {}
            None => break,
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
