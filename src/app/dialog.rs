//! State behind the open-file dialog and the save-as prompt.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::core::fs::{self, DialogEntry, FileFilter};

// ───────────────────────────────────────── open dialog ───────

/// Browsable directory listing used to pick a file to open.
#[derive(Debug, Clone)]
pub struct OpenDialogState {
    pub dir: PathBuf,
    pub filter: FileFilter,
    pub show_hidden: bool,
    pub entries: Vec<DialogEntry>,
    pub selected: usize,
    /// First visible row of the list.
    pub offset: usize,
    /// Set when `dir` could not be listed.
    pub error: Option<String>,
}

impl OpenDialogState {
    /// A relative `dir` is resolved against the working directory so that
    /// walking up always reaches `/`.
    pub fn new(dir: PathBuf) -> Self {
        let dir = std::path::absolute(&dir).unwrap_or(dir);
        let mut dialog = Self {
            dir,
            filter: FileFilter::default(),
            show_hidden: false,
            entries: Vec::new(),
            selected: 0,
            offset: 0,
            error: None,
        };
        dialog.refresh();
        dialog
    }

    /// Re-read the current directory, keeping the selection in range.
    pub fn refresh(&mut self) {
        match fs::list_dir(&self.dir, self.filter, self.show_hidden) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("cannot list {}: {e}", self.dir.display());
                self.entries.clear();
                self.error = Some(e.to_string());
            }
        }
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
        self.offset = self.offset.min(self.selected);
    }

    /// Switch to another directory and select its first entry.
    pub fn enter_dir(&mut self, dir: &Path) {
        let previous = std::mem::replace(&mut self.dir, dir.to_path_buf());
        self.selected = 0;
        self.offset = 0;
        self.refresh();
        // Coming back up: keep the directory we just left highlighted.
        if let Some(idx) = self.entries.iter().position(|e| {
            matches!(e, DialogEntry::Entry(meta) if meta.path == previous)
        }) {
            self.selected = idx;
        }
    }

    pub fn go_parent(&mut self) {
        if let Some(parent) = self.dir.parent().map(Path::to_path_buf) {
            self.enter_dir(&parent);
        }
    }

    pub fn toggle_filter(&mut self) {
        self.filter = self.filter.toggled();
        self.refresh();
    }

    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        self.refresh();
    }

    pub fn selected_entry(&self) -> Option<&DialogEntry> {
        self.entries.get(self.selected)
    }

    pub fn select_prev(&mut self, rows: usize) {
        self.selected = self.selected.saturating_sub(rows);
    }

    pub fn select_next(&mut self, rows: usize) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + rows).min(self.entries.len() - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.entries.len().saturating_sub(1);
    }

    /// Jump to the next entry whose name starts with `c` (case-insensitive).
    pub fn jump_to_char(&mut self, c: char) {
        let needle = c.to_lowercase().to_string();
        let n = self.entries.len();
        for step in 1..=n {
            let idx = (self.selected + step) % n;
            if let DialogEntry::Entry(meta) = &self.entries[idx] {
                if meta.name.to_lowercase().starts_with(&needle) {
                    self.selected = idx;
                    return;
                }
            }
        }
    }

    /// Keep the selection inside a list viewport of `rows` lines.
    pub fn scroll_into_view(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + rows {
            self.offset = self.selected + 1 - rows;
        }
    }
}

// ───────────────────────────────────────── save-as prompt ────

/// Path prompt shown when saving without a current file (or on "Save As").
///
/// Carries the value validated when the save was requested, so the text is
/// written exactly as it was checked.
#[derive(Debug, Clone)]
pub struct SaveAsState {
    /// Directory relative paths are resolved against.
    pub dir: PathBuf,
    pub input: String,
    pub value: Value,
    /// Target that already exists and is waiting for a second confirm.
    pub confirm_overwrite: Option<PathBuf>,
}

impl SaveAsState {
    pub fn new(dir: PathBuf, value: Value) -> Self {
        Self {
            dir,
            input: String::new(),
            value,
            confirm_overwrite: None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.confirm_overwrite = None;
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
        self.confirm_overwrite = None;
    }

    /// The path the current input resolves to, or `None` when it is blank.
    pub fn target(&self) -> Option<PathBuf> {
        let input = self.input.trim();
        if input.is_empty() {
            return None;
        }
        Some(crate::core::document::with_default_extension(
            &self.dir.join(input),
        ))
    }
}
