//! Input handling: maps key/mouse events to state mutations.

use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::{Action, KeyBind};
use crate::core::fs::DialogEntry;
use crate::ui::editor_widget::{scroll_for_track_click, EditorGeometry};
use crate::ui::layout::{point_in_rect, AppLayout};
use crate::ui::{popup, toolbar};

use super::actions;
use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState};

/// Rows moved per mouse-wheel notch.
const WHEEL_ROWS: isize = 3;

/// Total selectable rows in the controls submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Editor geometry for the current terminal size.
pub fn editor_geometry(state: &AppState) -> EditorGeometry {
    let layout = AppLayout::from_area(state.terminal_area);
    EditorGeometry::compute(
        layout.editor_area,
        state.buffer.line_count(),
        state.config.line_numbers,
    )
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Release events (reported by some terminals) would double every press.
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    // A message box swallows everything until it is dismissed.
    if state.message.is_some() {
        if matches!(
            key.code,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q')
        ) {
            state.dismiss_message();
        }
        return;
    }

    match state.active_view {
        ActiveView::Editor => handle_editor_key(state, key),
        ActiveView::OpenDialog => handle_open_dialog_key(state, key),
        ActiveView::SaveAsPrompt => handle_save_as_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::ControlsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

/// Insert pasted text into the editor or the save-as prompt.
pub fn handle_paste(state: &mut AppState, text: &str) {
    if state.message.is_some() {
        return;
    }
    match state.active_view {
        ActiveView::Editor => {
            let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
            state.buffer.insert_str(&normalized);
        }
        ActiveView::SaveAsPrompt => {
            if let Some(prompt) = state.save_as.as_mut() {
                text.chars()
                    .filter(|c| !c.is_control())
                    .for_each(|c| prompt.push_char(c));
            }
        }
        _ => {}
    }
}

/// Run a configurable action (from a key binding or a toolbar button).
pub fn run_action(state: &mut AppState, action: Action) {
    match action {
        Action::Open => actions::request_open(state),
        Action::Save => actions::save_file(state),
        Action::SaveAs => actions::save_as(state),
        Action::Format => actions::format_json(state),
        Action::Undo => actions::undo(state),
        Action::Redo => actions::redo(state),
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::Quit => state.should_quit = true,
    }
}

// ── Editor (configurable bindings, then text editing) ───────────

fn handle_editor_key(state: &mut AppState, key: KeyEvent) {
    if let Some(action) = state.config.match_key(key) {
        run_action(state, action);
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let page = (editor_geometry(state).text.height as usize).max(1);
    let buffer = &mut state.buffer;

    match key.code {
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            buffer.insert_char(c);
        }
        KeyCode::Enter => buffer.insert_newline(),
        KeyCode::Tab => {
            let indent = " ".repeat(state.config.indent_width);
            buffer.insert_str(&indent);
        }
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Up => buffer.move_up(1),
        KeyCode::Down => buffer.move_down(1),
        KeyCode::PageUp => buffer.move_up(page),
        KeyCode::PageDown => buffer.move_down(page),
        KeyCode::Home if ctrl => buffer.move_doc_start(),
        KeyCode::End if ctrl => buffer.move_doc_end(),
        KeyCode::Home => buffer.move_line_start(),
        KeyCode::End => buffer.move_line_end(),
        _ => {}
    }
}

// ── Open dialog (hardcoded keys) ────────────────────────────────

fn handle_open_dialog_key(state: &mut AppState, key: KeyEvent) {
    let rows = popup::open_dialog_geometry(state.terminal_area).list.height as usize;
    let Some(dialog) = state.open_dialog.as_mut() else {
        state.active_view = ActiveView::Editor;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            actions::cancel_open(state);
            return;
        }
        KeyCode::Enter | KeyCode::Right => {
            activate_dialog_selection(state);
            return;
        }
        KeyCode::Up => dialog.select_prev(1),
        KeyCode::Down => dialog.select_next(1),
        KeyCode::PageUp => dialog.select_prev(rows.max(1)),
        KeyCode::PageDown => dialog.select_next(rows.max(1)),
        KeyCode::Home => dialog.select_first(),
        KeyCode::End => dialog.select_last(),
        KeyCode::Backspace | KeyCode::Left => dialog.go_parent(),
        KeyCode::Tab => dialog.toggle_filter(),
        KeyCode::Char('h') if key.modifiers.contains(KeyModifiers::ALT) => dialog.toggle_hidden(),
        KeyCode::Char(c) if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
            dialog.jump_to_char(c);
        }
        _ => {}
    }
    dialog.scroll_into_view(rows);
}

/// Enter a directory, or open the selected file and close the dialog.
fn activate_dialog_selection(state: &mut AppState) {
    let Some(dialog) = state.open_dialog.as_mut() else {
        return;
    };
    let Some(entry) = dialog.selected_entry().cloned() else {
        return;
    };
    match entry {
        DialogEntry::Parent(_) => dialog.go_parent(),
        DialogEntry::Entry(meta) if meta.is_dir => dialog.enter_dir(&meta.path),
        DialogEntry::Entry(meta) => {
            actions::cancel_open(state);
            actions::open_file(state, &meta.path);
        }
    }
}

// ── Save-as prompt (hardcoded keys) ─────────────────────────────

fn handle_save_as_key(state: &mut AppState, key: KeyEvent) {
    let Some(prompt) = state.save_as.as_mut() else {
        state.active_view = ActiveView::Editor;
        return;
    };

    match key.code {
        KeyCode::Esc => actions::cancel_save_as(state),
        KeyCode::Enter => actions::confirm_save_as(state),
        KeyCode::Backspace => prompt.pop_char(),
        KeyCode::Char(c)
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            prompt.push_char(c);
        }
        _ => {}
    }
}

// ── Settings menu (hardcoded keys) ──────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(2) => {
            state.active_view = ActiveView::Editor;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected < SETTINGS_ITEMS.len() - 1 {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Submenu { view, .. } => {
                        state.active_view = *view;
                        state.controls_selected = 0;
                    }
                    SettingsItem::Toggle { get, set, .. } => {
                        let current = get(state);
                        set(state, !current);
                    }
                    SettingsItem::Cycle { cycle, .. } => {
                        cycle(state);
                    }
                }
            }
        }
        _ => {}
    }
}

// ── Controls submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Editor;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected < item_count - 1 {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Action::ALL.len() {
                // Start rebinding the selected action.
                state.awaiting_rebind = true;
            } else {
                // "Reset to defaults" item.
                state.config.reset_defaults();
                persist_config(state);
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            // Clear all bindings for the selected action.
            if state.controls_selected < Action::ALL.len() {
                let action = Action::ALL[state.controls_selected];
                state.config.bindings.insert(action, Vec::new());
                persist_config(state);
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    // Only process Press events (ignore Release/Repeat on supported terminals).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Esc cancels rebinding.
    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }

    let action = Action::ALL[state.controls_selected];
    let bind = KeyBind::from_key_event(key);
    state.config.add_binding(action, bind);
    persist_config(state);
    state.awaiting_rebind = false;
}

fn persist_config(state: &AppState) {
    if let Err(e) = state.config.save() {
        tracing::warn!("could not save config: {e}");
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if let Some(message) = &state.message {
        if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
            let rect = popup::message_rect(state.terminal_area, message);
            if point_in_rect(popup::ok_button_rect(rect), mouse.column, mouse.row) {
                state.dismiss_message();
            }
        }
        return;
    }

    match state.active_view {
        ActiveView::Editor => handle_editor_mouse(state, mouse),
        ActiveView::OpenDialog => handle_open_dialog_mouse(state, mouse),
        _ => {}
    }
}

fn handle_editor_mouse(state: &mut AppState, mouse: MouseEvent) {
    let layout = AppLayout::from_area(state.terminal_area);
    let geo = editor_geometry(state);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(action) = toolbar::button_at(layout.toolbar_area, mouse.column, mouse.row) {
                run_action(state, action);
                return;
            }
            if point_in_rect(geo.scrollbar, mouse.column, mouse.row) {
                let row = scroll_for_track_click(
                    geo.scrollbar,
                    mouse.row,
                    state.buffer.line_count(),
                    geo.text.height as usize,
                );
                state.buffer.scroll_to_row(row);
                return;
            }
            if let Some((line, x)) =
                geo.position_at(mouse.column, mouse.row, state.buffer.scroll())
            {
                state.buffer.set_cursor_at_cell(line, x);
            }
        }
        MouseEventKind::ScrollUp => state.buffer.scroll_rows(-WHEEL_ROWS),
        MouseEventKind::ScrollDown => state.buffer.scroll_rows(WHEEL_ROWS),
        _ => {}
    }
}

fn handle_open_dialog_mouse(state: &mut AppState, mouse: MouseEvent) {
    let geo = popup::open_dialog_geometry(state.terminal_area);
    let rows = geo.list.height as usize;
    let double_click = Duration::from_millis(state.config.double_click_ms);
    let Some(dialog) = state.open_dialog.as_mut() else {
        return;
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !point_in_rect(geo.list, mouse.column, mouse.row) {
                state.last_left_click = None;
                return;
            }
            let clicked = dialog.offset + (mouse.row - geo.list.y) as usize;
            if clicked >= dialog.entries.len() {
                state.last_left_click = None;
                return;
            }
            dialog.selected = clicked;

            let now = Instant::now();
            let is_repeat_click = state
                .last_left_click
                .map(|(last, at)| last == clicked && now.duration_since(at) <= double_click)
                .unwrap_or(false);
            if is_repeat_click {
                state.last_left_click = None;
                activate_dialog_selection(state);
            } else {
                state.last_left_click = Some((clicked, now));
            }
        }
        MouseEventKind::ScrollUp => {
            dialog.select_prev(1);
            dialog.scroll_into_view(rows);
        }
        MouseEventKind::ScrollDown => {
            dialog.select_next(1);
            dialog.scroll_into_view(rows);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;
    use tempfile::tempdir;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn type_str(state: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(state, press(KeyCode::Char(c)));
        }
    }

    fn new_state(dir: &std::path::Path) -> AppState {
        let mut state = AppState::new(dir.to_path_buf(), AppConfig::default());
        state.terminal_area = Rect::new(0, 0, 100, 30);
        state
    }

    #[test]
    fn typing_and_format_shortcut() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        type_str(&mut state, "{\"a\":1}");
        handle_key(&mut state, ctrl('f'));
        assert_eq!(state.buffer.text(), "{\n    \"a\": 1\n}");

        handle_key(&mut state, ctrl('z'));
        assert_eq!(state.buffer.text(), "{\"a\":1}");
        handle_key(&mut state, ctrl('y'));
        assert_eq!(state.buffer.text(), "{\n    \"a\": 1\n}");
    }

    #[test]
    fn release_events_are_ignored() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        let mut release = press(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        release.state = KeyEventState::NONE;
        handle_key(&mut state, release);
        assert_eq!(state.buffer.text(), "");
    }

    #[test]
    fn message_box_blocks_other_input() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        type_str(&mut state, "[");
        handle_key(&mut state, ctrl('s'));
        assert_eq!(state.message.as_ref().unwrap().title, "Save Error");

        type_str(&mut state, "1]");
        assert_eq!(state.buffer.text(), "[");

        handle_key(&mut state, press(KeyCode::Enter));
        assert!(state.message.is_none());
        type_str(&mut state, "1]");
        assert_eq!(state.buffer.text(), "[1]");
    }

    #[test]
    fn ok_button_click_dismisses_message() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        state.show_info("Success", "File saved successfully!");
        handle_mouse(&mut state, click(0, 0));
        assert!(state.message.is_some());

        let message = state.message.clone().unwrap();
        let ok = popup::ok_button_rect(popup::message_rect(state.terminal_area, &message));
        handle_mouse(&mut state, click(ok.x + 1, ok.y));
        assert!(state.message.is_none());
    }

    #[test]
    fn toolbar_buttons_trigger_actions() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        type_str(&mut state, "[1,2]");

        // "Format (Prettify)" is the third button.
        let (_, rect) = toolbar::button_rects(AppLayout::from_area(state.terminal_area).toolbar_area)[2];
        handle_mouse(&mut state, click(rect.x + 2, rect.y + 1));
        assert_eq!(state.buffer.text(), "[\n    1,\n    2\n]");

        let (_, open) = toolbar::button_rects(AppLayout::from_area(state.terminal_area).toolbar_area)[0];
        handle_mouse(&mut state, click(open.x + 1, open.y));
        assert_eq!(state.active_view, ActiveView::OpenDialog);
    }

    #[test]
    fn click_in_text_moves_cursor() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        state.buffer.load("{\n    \"key\": true\n}");
        let geo = editor_geometry(&state);
        handle_mouse(&mut state, click(geo.text.x + 6, geo.text.y + 1));
        assert_eq!(state.buffer.cursor().line, 1);
        assert_eq!(state.buffer.cursor().col, 6);
    }

    #[test]
    fn click_after_wide_glyphs_hits_the_right_char() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        state.buffer.load("[\"日本\", 1]");
        let geo = editor_geometry(&state);
        // Cells: [ " 日日 本本 " , space 1 ]
        handle_mouse(&mut state, click(geo.text.x + 9, geo.text.y));
        assert_eq!(state.buffer.cursor().col, 7);
        handle_mouse(&mut state, click(geo.text.x + 4, geo.text.y));
        assert_eq!(state.buffer.cursor().col, 3);
    }

    #[test]
    fn open_dialog_keyboard_flow() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("data.json"), "{\"ok\":true}").unwrap();
        std::fs::write(dir.path().join("skip.txt"), "x").unwrap();

        let mut state = new_state(dir.path());
        handle_key(&mut state, ctrl('o'));
        assert_eq!(state.active_view, ActiveView::OpenDialog);

        // ["../", "data.json"] with the JSON filter.
        assert_eq!(state.open_dialog.as_ref().unwrap().entries.len(), 2);
        handle_key(&mut state, press(KeyCode::Tab));
        assert_eq!(state.open_dialog.as_ref().unwrap().entries.len(), 3);
        handle_key(&mut state, press(KeyCode::Tab));

        handle_key(&mut state, press(KeyCode::Char('d')));
        handle_key(&mut state, press(KeyCode::Enter));

        assert_eq!(state.active_view, ActiveView::Editor);
        assert!(state.open_dialog.is_none());
        assert_eq!(state.buffer.text(), "{\n    \"ok\": true\n}");
        assert_eq!(state.current_file, Some(dir.path().join("data.json")));
    }

    #[test]
    fn open_dialog_escape_changes_nothing() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        type_str(&mut state, "42");
        handle_key(&mut state, ctrl('o'));
        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(state.active_view, ActiveView::Editor);
        assert_eq!(state.buffer.text(), "42");
        assert_eq!(state.status_message, crate::app::state::READY_STATUS);
    }

    #[test]
    fn double_click_opens_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "[]").unwrap();
        let mut state = new_state(dir.path());
        handle_key(&mut state, ctrl('o'));

        let list = popup::open_dialog_geometry(state.terminal_area).list;
        // Row 0 is "../", row 1 is "a.json".
        handle_mouse(&mut state, click(list.x + 2, list.y + 1));
        assert_eq!(state.active_view, ActiveView::OpenDialog);
        handle_mouse(&mut state, click(list.x + 2, list.y + 1));
        assert_eq!(state.active_view, ActiveView::Editor);
        assert_eq!(state.buffer.text(), "[]");
    }

    #[test]
    fn save_as_prompt_typing_and_cancel() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        type_str(&mut state, "{}");
        handle_key(&mut state, ctrl('s'));
        assert_eq!(state.active_view, ActiveView::SaveAsPrompt);

        type_str(&mut state, "outx");
        handle_key(&mut state, press(KeyCode::Backspace));
        assert_eq!(state.save_as.as_ref().unwrap().input, "out");

        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(state.active_view, ActiveView::Editor);
        assert!(!dir.path().join("out.json").exists());
    }

    #[test]
    fn save_as_prompt_enter_writes_file() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        type_str(&mut state, "[null]");
        handle_key(&mut state, ctrl('s'));
        type_str(&mut state, "out");
        handle_key(&mut state, press(KeyCode::Enter));

        let path = dir.path().join("out.json");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[\n    null\n]");
        assert_eq!(state.message.as_ref().unwrap().title, "Success");
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        handle_paste(&mut state, "{\r\n\"a\": 1\r\n}");
        assert_eq!(state.buffer.text(), "{\n\"a\": 1\n}");
        assert_eq!(state.buffer.cursor().line, 2);
    }

    #[test]
    fn ctrl_c_quits_even_under_a_message() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        state.show_error("Error", "boom");
        handle_key(&mut state, ctrl('c'));
        assert!(state.should_quit);
    }

    /// State whose config saves into `dir/config.toml`.
    fn persisted_state(dir: &std::path::Path) -> AppState {
        let mut state = new_state(dir);
        state.config.path = Some(dir.join("config.toml"));
        state
    }

    fn saved_config(dir: &std::path::Path) -> String {
        std::fs::read_to_string(dir.join("config.toml")).unwrap()
    }

    #[test]
    fn indent_cycle_changes_format_output() {
        let dir = tempdir().unwrap();
        let mut state = persisted_state(dir.path());
        handle_key(&mut state, press(KeyCode::F(2)));
        handle_key(&mut state, press(KeyCode::Down));
        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(state.config.indent_width, 8);
        assert!(saved_config(dir.path()).contains("indent_width = 8"));

        handle_key(&mut state, press(KeyCode::Esc));
        type_str(&mut state, "[1]");
        handle_key(&mut state, ctrl('f'));
        assert_eq!(state.buffer.text(), "[\n        1\n]");
    }

    #[test]
    fn line_number_toggle_persists() {
        let dir = tempdir().unwrap();
        let mut state = persisted_state(dir.path());
        assert!(state.config.line_numbers);
        handle_key(&mut state, press(KeyCode::F(2)));
        handle_key(&mut state, press(KeyCode::Down));
        handle_key(&mut state, press(KeyCode::Down));
        handle_key(&mut state, press(KeyCode::Enter));
        assert!(!state.config.line_numbers);
        assert!(saved_config(dir.path()).contains("line_numbers = false"));
    }

    /// Settings -> Controls, with the first action ("Open File") selected.
    fn open_controls(state: &mut AppState) {
        handle_key(state, press(KeyCode::F(2)));
        handle_key(state, press(KeyCode::Enter));
        assert_eq!(state.active_view, ActiveView::ControlsSubmenu);
        assert_eq!(state.controls_selected, 0);
    }

    #[test]
    fn rebind_captures_next_key() {
        let dir = tempdir().unwrap();
        let mut state = persisted_state(dir.path());
        open_controls(&mut state);

        handle_key(&mut state, press(KeyCode::Enter));
        assert!(state.awaiting_rebind);
        handle_key(&mut state, press(KeyCode::F(9)));
        assert!(!state.awaiting_rebind);
        assert_eq!(state.config.display_bindings(Action::Open), "Ctrl+o/F9");
        assert!(saved_config(dir.path()).contains("F9"));

        handle_key(&mut state, press(KeyCode::Esc));
        handle_key(&mut state, press(KeyCode::F(9)));
        assert_eq!(state.active_view, ActiveView::OpenDialog);
    }

    #[test]
    fn escape_cancels_rebind() {
        let dir = tempdir().unwrap();
        let mut state = persisted_state(dir.path());
        open_controls(&mut state);

        handle_key(&mut state, press(KeyCode::Enter));
        handle_key(&mut state, press(KeyCode::Esc));
        assert!(!state.awaiting_rebind);
        assert_eq!(state.active_view, ActiveView::ControlsSubmenu);
        assert_eq!(state.config.display_bindings(Action::Open), "Ctrl+o");
        assert!(!dir.path().join("config.toml").exists());
    }

    #[test]
    fn delete_clears_bindings_and_reset_restores_them() {
        let dir = tempdir().unwrap();
        let mut state = persisted_state(dir.path());
        open_controls(&mut state);

        handle_key(&mut state, press(KeyCode::Delete));
        assert_eq!(state.config.display_bindings(Action::Open), "unbound");
        assert!(saved_config(dir.path()).lines().any(|l| l.trim_end() == "open ="));

        // The last row is "Reset to defaults".
        for _ in 0..controls_item_count() {
            handle_key(&mut state, press(KeyCode::Down));
        }
        assert_eq!(state.controls_selected, Action::ALL.len());
        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(state.config.display_bindings(Action::Open), "Ctrl+o");
        assert!(saved_config(dir.path()).contains("open = Ctrl+o"));

        handle_key(&mut state, press(KeyCode::Esc));
        handle_key(&mut state, ctrl('o'));
        assert_eq!(state.active_view, ActiveView::OpenDialog);
    }

    #[test]
    fn settings_menu_opens_and_closes() {
        let dir = tempdir().unwrap();
        let mut state = new_state(dir.path());
        handle_key(&mut state, press(KeyCode::F(2)));
        assert_eq!(state.active_view, ActiveView::SettingsMenu);
        handle_key(&mut state, press(KeyCode::Down));
        assert_eq!(state.settings_selected, 1);
        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(state.active_view, ActiveView::Editor);
    }
}
