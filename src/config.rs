//! User configuration: keybindings and formatting options, persisted to disk.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/json-edit/config.toml` (default `~/.config/json-edit/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::json::DEFAULT_INDENT;

/// Indent widths offered by the settings menu.
pub const INDENT_CHOICES: &[usize] = &[2, 4, 8];

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the editor view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Open,
    Save,
    SaveAs,
    Format,
    Undo,
    Redo,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the controls menu).
    pub const ALL: &[Action] = &[
        Action::Open,
        Action::Save,
        Action::SaveAs,
        Action::Format,
        Action::Undo,
        Action::Redo,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::Open => "Open File",
            Action::Save => "Save",
            Action::SaveAs => "Save As",
            Action::Format => "Format (Prettify)",
            Action::Undo => "Undo",
            Action::Redo => "Redo",
            Action::OpenSettings => "Open Settings",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::Open => "open",
            Action::Save => "save",
            Action::SaveAs => "save_as",
            Action::Format => "format",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared (platform-specific modifiers like SUPER are ignored).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Create a binding from a raw key event (used during rebinding).
    pub fn from_key_event(event: KeyEvent) -> Self {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        Self {
            code: event.code,
            modifiers: event.modifiers & mask,
        }
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Ctrl+s"`, `"F2"`).
    pub fn display(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => key_name(other),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Alt+s"`, `"Ctrl+o"`).
    fn to_config_string(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Delete => "Delete".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            other => key_name(other),
        });
        s
    }

    /// Parse a key string like `"Ctrl+s"`, `"Alt+Up"`, `"F5"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Spaces per nesting level when pretty-printing.
    pub indent_width: usize,
    /// Show the line-number gutter in the editor.
    pub line_numbers: bool,
    /// Double-click detection window for the open dialog.
    pub double_click_ms: u64,
    /// File `save` writes to.  `None` keeps changes in memory only.
    pub path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            indent_width: DEFAULT_INDENT,
            line_numbers: true,
            double_click_ms: 250,
            path: None,
        }
    }
}

impl AppConfig {
    /// Built-in bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let alt = KeyModifiers::ALT;
        let mut m = HashMap::new();

        m.insert(Open, vec![KeyBind::new(Char('o'), ctrl)]);
        m.insert(Save, vec![KeyBind::new(Char('s'), ctrl)]);
        m.insert(SaveAs, vec![KeyBind::new(Char('s'), alt)]);
        m.insert(Format, vec![KeyBind::new(Char('f'), ctrl), KeyBind::new(F(5), n)]);
        m.insert(Undo, vec![KeyBind::new(Char('z'), ctrl)]);
        m.insert(Redo, vec![KeyBind::new(Char('y'), ctrl)]);
        m.insert(OpenSettings, vec![KeyBind::new(F(2), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), ctrl)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match (shouldn't happen after conflict resolution), the one with
    /// the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Add a binding for `action`.  Removes this key from any other action
    /// to prevent conflicts, then appends it to `action`'s bindings.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for (_, binds) in self.bindings.iter_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    /// Restore all bindings to the built-in defaults.
    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// Format the binding list for a given action (e.g. `"Ctrl+f/F5"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for toolbar hints).
    pub fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Next value in [`INDENT_CHOICES`] after the current indent width.
    pub fn cycle_indent(&mut self) {
        let idx = INDENT_CHOICES
            .iter()
            .position(|&w| w == self.indent_width)
            .unwrap_or(0);
        self.indent_width = INDENT_CHOICES[(idx + 1) % INDENT_CHOICES.len()];
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load the user's config file, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from `path`; later saves go back to the same file.
    pub fn load_from(path: &Path) -> Self {
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(e) => {
                tracing::debug!("no config at {}: {e}", path.display());
                Self::default()
            }
        };
        config.path = Some(path.to_path_buf());
        config
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        tracing::debug!("config written to {}", path.display());
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Editor settings.
            match key {
                "indent_width" => {
                    if let Ok(v) = value.parse::<usize>() {
                        config.indent_width = v.clamp(1, 16);
                    }
                    continue;
                }
                "line_numbers" => {
                    config.line_numbers = value == "true";
                    continue;
                }
                "double_click_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        // Keep this bounded for predictable UX.
                        config.double_click_ms = v.clamp(100, 2000);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            // An empty value is an action the user unbound on purpose.
            if !parsed.is_empty() || value.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# json-edit configuration".to_string(),
            String::new(),
            "# Editor settings".to_string(),
            format!("indent_width = {}", self.indent_width),
            format!("line_numbers = {}", self.line_numbers),
            format!("double_click_ms = {}", self.double_click_ms),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// `$XDG_CONFIG_HOME/json-edit`, falling back to `~/.config/json-edit`.
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    base.join("json-edit")
}

fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Log file used when `RUST_LOG` is set but no `--log` was given.
pub fn default_log_path() -> PathBuf {
    config_dir().join("json-edit.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn defaults_match_common_shortcuts() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Action::Save)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('s'), KeyModifiers::ALT)),
            Some(Action::SaveAs)
        );
        assert_eq!(config.match_key(key(KeyCode::F(5), KeyModifiers::NONE)), Some(Action::Format));
        assert_eq!(config.match_key(key(KeyCode::Char('s'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn parse_reads_settings_and_bindings() {
        let config = AppConfig::parse_config(
            "# comment\n\
             indent_width = 2\n\
             line_numbers = false\n\
             double_click_ms = 5\n\
             format = Alt+p, F9\n\
             bogus = Ctrl+x\n",
        );
        assert_eq!(config.indent_width, 2);
        assert!(!config.line_numbers);
        assert_eq!(config.double_click_ms, 100);
        assert_eq!(config.display_bindings(Action::Format), "Alt+p/F9");
        // Untouched actions keep their defaults.
        assert_eq!(config.display_bindings(Action::Open), "Ctrl+o");
    }

    #[test]
    fn serialise_then_parse_preserves_config() {
        let mut config = AppConfig::default();
        config.indent_width = 8;
        config.add_binding(Action::Redo, KeyBind::new(KeyCode::Char('Z'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));

        let reparsed = AppConfig::parse_config(&config.serialise());
        assert_eq!(reparsed.indent_width, 8);
        assert_eq!(reparsed.bindings, config.bindings);
    }

    #[test]
    fn load_from_missing_file_then_save_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::load_from(&path);
        assert_eq!(config.indent_width, DEFAULT_INDENT);
        config.line_numbers = false;
        config.save().unwrap();

        let reloaded = AppConfig::load_from(&path);
        assert!(!reloaded.line_numbers);
        assert_eq!(reloaded.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn cleared_bindings_stay_cleared_after_reload() {
        let mut config = AppConfig::default();
        config.bindings.insert(Action::Quit, Vec::new());
        let reparsed = AppConfig::parse_config(&config.serialise());
        assert_eq!(reparsed.display_bindings(Action::Quit), "unbound");
        assert_eq!(reparsed.display_bindings(Action::Save), "Ctrl+s");
    }

    #[test]
    fn save_without_path_writes_nothing() {
        assert!(AppConfig::default().save().is_ok());
    }

    #[test]
    fn add_binding_steals_key_from_other_action() {
        let mut config = AppConfig::default();
        config.add_binding(Action::Format, KeyBind::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(
            config.match_key(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Action::Format)
        );
        assert_eq!(config.display_bindings(Action::Save), "unbound");
    }

    #[test]
    fn indent_cycles_through_choices() {
        let mut config = AppConfig::default();
        assert_eq!(config.indent_width, 4);
        config.cycle_indent();
        assert_eq!(config.indent_width, 8);
        config.cycle_indent();
        assert_eq!(config.indent_width, 2);
    }
}
