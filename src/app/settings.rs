//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::{ActiveView, AppState};

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Boolean toggle, read and written through `AppState` accessors.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. }
            | Self::Toggle { label, .. }
            | Self::Cycle { label, .. } => label,
        }
    }

    /// Current value as shown next to the label (empty for submenus).
    pub fn value_text(&self, state: &AppState) -> String {
        match self {
            Self::Submenu { .. } => String::new(),
            Self::Toggle { get, .. } => if get(state) { "ON" } else { "OFF" }.to_string(),
            Self::Cycle { value, .. } => value(state),
        }
    }
}

/// Write the config back, logging rather than failing on I/O errors.
fn persist(s: &AppState) {
    if let Err(e) = s.config.save() {
        tracing::warn!("could not save config: {e}");
    }
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Cycle {
        label: "Indent Width",
        value: |s| format!("{} spaces", s.config.indent_width),
        cycle: |s| {
            s.config.cycle_indent();
            persist(s);
            s.status_message = format!("Indent width: {}", s.config.indent_width);
        },
    },
    SettingsItem::Toggle {
        label: "Line Numbers",
        get: |s| s.config.line_numbers,
        set: |s, v| {
            s.config.line_numbers = v;
            persist(s);
        },
    },
    SettingsItem::Cycle {
        label: "Double-click Window",
        value: |s| format!("{}ms", s.config.double_click_ms),
        cycle: |s| {
            const WINDOWS: &[u64] = &[150, 200, 250, 300, 400, 500];
            let current = s.config.double_click_ms;
            let idx = WINDOWS.iter().position(|&w| w == current).unwrap_or(2);
            let next = WINDOWS[(idx + 1) % WINDOWS.len()];
            s.config.double_click_ms = next;
            persist(s);
            s.status_message = format!("Double-click window: {}ms", next);
        },
    },
];
