//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::{Path, PathBuf};
use std::time::Instant;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::buffer::TextBuffer;

use super::dialog::{OpenDialogState, SaveAsState};

/// Status line shown before anything happened.
pub const READY_STATUS: &str = "Ready";

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Editor,
    OpenDialog,
    SaveAsPrompt,
    SettingsMenu,
    ControlsSubmenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// A blocking message box.  While one is shown, all other input is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub title: String,
    pub body: String,
}

/// Top-level application state.
pub struct AppState {
    /// The text being edited.
    pub buffer: TextBuffer,
    /// Path of the open document; `None` until opened or saved.
    pub current_file: Option<PathBuf>,
    /// Directory dialogs start in when there is no current file.
    pub cwd: PathBuf,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Text of the bottom status bar.
    pub status_message: String,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Modal message box on top of everything else.
    pub message: Option<Message>,
    /// Open-file dialog, while it is shown.
    pub open_dialog: Option<OpenDialogState>,
    /// Save-as prompt, while it is shown.
    pub save_as: Option<SaveAsState>,
    /// User-configurable keybindings and options.
    pub config: AppConfig,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Currently highlighted item in the controls submenu.
    pub controls_selected: usize,
    /// When `true`, the controls submenu is waiting for the user to press
    /// a key to rebind the action at `controls_selected`.
    pub awaiting_rebind: bool,
    /// Size of the terminal at the last draw, for mouse hit-testing.
    pub terminal_area: Rect,
    /// Last left-clicked dialog row and click time, for double-click.
    pub last_left_click: Option<(usize, Instant)>,
}

impl AppState {
    pub fn new(cwd: PathBuf, config: AppConfig) -> Self {
        Self {
            buffer: TextBuffer::new(),
            current_file: None,
            cwd,
            should_quit: false,
            status_message: READY_STATUS.to_string(),
            active_view: ActiveView::default(),
            message: None,
            open_dialog: None,
            save_as: None,
            config,
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            terminal_area: Rect::new(0, 0, 80, 24),
            last_left_click: None,
        }
    }

    pub fn show_error(&mut self, title: &str, body: impl Into<String>) {
        self.message = Some(Message {
            kind: MessageKind::Error,
            title: title.to_string(),
            body: body.into(),
        });
    }

    pub fn show_info(&mut self, title: &str, body: impl Into<String>) {
        self.message = Some(Message {
            kind: MessageKind::Info,
            title: title.to_string(),
            body: body.into(),
        });
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    /// Directory the file dialogs should start in, always absolute.
    pub fn dialog_dir(&self) -> PathBuf {
        let dir = self
            .current_file
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| self.cwd.join(p))
            .unwrap_or_else(|| self.cwd.clone());
        std::path::absolute(&dir).unwrap_or(dir)
    }

    /// Title shown on the editor frame: file name plus a modified marker.
    pub fn document_title(&self) -> String {
        let name = self
            .current_file
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "untitled".to_string());
        if self.buffer.is_modified() {
            format!("{name} [+]")
        } else {
            name
        }
    }
}
