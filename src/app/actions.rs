//! The editor's commands: open, format, save.
//!
//! Each one is a straight call-through into `core::json` / `core::document`
//! with a single failure branch that raises a modal message.

use std::path::Path;

use serde_json::Value;

use crate::core::{document, json};

use super::dialog::{OpenDialogState, SaveAsState};
use super::state::{ActiveView, AppState};

/// Show the open-file dialog.
pub fn request_open(state: &mut AppState) {
    state.open_dialog = Some(OpenDialogState::new(state.dialog_dir()));
    state.active_view = ActiveView::OpenDialog;
}

/// Close the open-file dialog without opening anything.
pub fn cancel_open(state: &mut AppState) {
    state.open_dialog = None;
    state.active_view = ActiveView::Editor;
}

/// Read, parse and pretty-print `path` into the editor.
pub fn open_file(state: &mut AppState, path: &Path) {
    match document::read_document(path, state.config.indent_width) {
        Ok(text) => {
            state.buffer.load(&text);
            state.current_file = Some(path.to_path_buf());
            state.status_message = format!("Editing: {}", path.display());
            tracing::info!("opened {}", path.display());
        }
        Err(e) => {
            if e.is_invalid_json() {
                tracing::warn!("{} is not valid JSON: {e}", path.display());
            } else {
                tracing::warn!("open failed: {e}");
            }
            state.show_error("Error", format!("Could not read file: {e}"));
        }
    }
}

/// Start editing a file that does not exist yet; the first save creates it.
pub fn start_new_file(state: &mut AppState, path: &Path) {
    state.buffer.load("");
    state.current_file = Some(path.to_path_buf());
    state.status_message = format!("New file: {}", path.display());
}

/// Validate the buffer and replace it with its pretty-printed form.
/// A blank buffer is left alone.
pub fn format_json(state: &mut AppState) {
    let raw = state.buffer.text();
    if raw.trim().is_empty() {
        return;
    }
    let t0 = std::time::Instant::now();
    match json::reformat(&raw, state.config.indent_width) {
        Ok(formatted) => {
            state.buffer.set_text(&formatted);
            state.status_message = "JSON Formatted Successfully".to_string();
            tracing::debug!("format: {:.2?} ({} bytes)", t0.elapsed(), formatted.len());
        }
        Err(e) => {
            tracing::debug!("format rejected: {e}");
            state.show_error("Invalid JSON", format!("Syntax Error: {e}"));
        }
    }
}

/// Save to the current file, asking for a path when there is none.
pub fn save_file(state: &mut AppState) {
    save(state, false);
}

/// Save under a new path.
pub fn save_as(state: &mut AppState) {
    save(state, true);
}

fn save(state: &mut AppState, always_prompt: bool) {
    let value = match json::parse(state.buffer.text().trim()) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("save refused: {e}");
            state.show_error(
                "Save Error",
                format!("Cannot save! Invalid JSON syntax:\n{e}"),
            );
            return;
        }
    };

    match state.current_file.clone() {
        Some(path) if !always_prompt => write_to(state, &path, &value),
        _ => {
            state.save_as = Some(SaveAsState::new(state.dialog_dir(), value));
            state.active_view = ActiveView::SaveAsPrompt;
        }
    }
}

/// Enter pressed in the save-as prompt.
///
/// A blank input cancels.  An existing target needs a second confirm.
pub fn confirm_save_as(state: &mut AppState) {
    let Some(prompt) = state.save_as.as_mut() else {
        return;
    };
    let Some(target) = prompt.target() else {
        cancel_save_as(state);
        return;
    };
    if target.exists() && prompt.confirm_overwrite.as_ref() != Some(&target) {
        prompt.confirm_overwrite = Some(target);
        return;
    }

    let Some(prompt) = state.save_as.take() else {
        return;
    };
    state.active_view = ActiveView::Editor;
    write_to(state, &target, &prompt.value);
}

pub fn cancel_save_as(state: &mut AppState) {
    state.save_as = None;
    state.active_view = ActiveView::Editor;
}

fn write_to(state: &mut AppState, path: &Path, value: &Value) {
    match document::write_document(path, value, state.config.indent_width) {
        Ok(()) => {
            state.current_file = Some(path.to_path_buf());
            state.buffer.mark_saved();
            state.status_message = format!("Saved: {}", path.display());
            tracing::info!("saved {}", path.display());
            state.show_info("Success", "File saved successfully!");
        }
        Err(e) => {
            tracing::warn!("save failed: {e}");
            state.show_error("Error", format!("Could not save file: {e}"));
        }
    }
}

/// Step back through the buffer's history.
pub fn undo(state: &mut AppState) {
    if !state.buffer.undo() {
        state.status_message = "Nothing to undo".to_string();
    }
}

pub fn redo(state: &mut AppState) {
    if !state.buffer.redo() {
        state.status_message = "Nothing to redo".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{MessageKind, READY_STATUS};
    use crate::config::AppConfig;
    use tempfile::tempdir;

    fn state_in(dir: &Path) -> AppState {
        AppState::new(dir.to_path_buf(), AppConfig::default())
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.buffer.insert_char(c);
        }
    }

    #[test]
    fn open_pretty_prints_and_tracks_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"a":[1,2]}"#).unwrap();

        let mut state = state_in(dir.path());
        assert_eq!(state.status_message, READY_STATUS);
        open_file(&mut state, &path);

        assert_eq!(state.buffer.text(), "{\n    \"a\": [\n        1,\n        2\n    ]\n}");
        assert_eq!(state.current_file.as_deref(), Some(path.as_path()));
        assert_eq!(state.status_message, format!("Editing: {}", path.display()));
        assert!(state.message.is_none());
        assert!(!state.buffer.is_modified());
    }

    #[test]
    fn open_malformed_file_keeps_previous_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1,").unwrap();

        let mut state = state_in(dir.path());
        type_text(&mut state, "keep");
        open_file(&mut state, &path);

        let msg = state.message.clone().unwrap();
        assert_eq!(msg.kind, MessageKind::Error);
        assert_eq!(msg.title, "Error");
        assert!(msg.body.starts_with("Could not read file: "));
        assert_eq!(state.buffer.text(), "keep");
        assert!(state.current_file.is_none());
    }

    #[test]
    fn format_replaces_buffer_and_is_undoable() {
        let dir = tempdir().unwrap();
        let mut state = state_in(dir.path());
        type_text(&mut state, r#"  {"k": true}  "#);

        format_json(&mut state);
        assert_eq!(state.buffer.text(), "{\n    \"k\": true\n}");
        assert_eq!(state.status_message, "JSON Formatted Successfully");

        undo(&mut state);
        assert_eq!(state.buffer.text(), r#"  {"k": true}  "#);
    }

    #[test]
    fn format_respects_configured_indent() {
        let dir = tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.config.indent_width = 2;
        type_text(&mut state, "[1]");
        format_json(&mut state);
        assert_eq!(state.buffer.text(), "[\n  1\n]");
    }

    #[test]
    fn format_blank_buffer_is_noop() {
        let dir = tempdir().unwrap();
        let mut state = state_in(dir.path());
        type_text(&mut state, "  \n ");
        format_json(&mut state);
        assert!(state.message.is_none());
        assert_eq!(state.status_message, READY_STATUS);
    }

    #[test]
    fn format_invalid_json_raises_dialog() {
        let dir = tempdir().unwrap();
        let mut state = state_in(dir.path());
        type_text(&mut state, "{oops}");
        format_json(&mut state);

        let msg = state.message.unwrap();
        assert_eq!(msg.title, "Invalid JSON");
        assert!(msg.body.starts_with("Syntax Error: "));
        assert_eq!(state.buffer.text(), "{oops}");
    }

    #[test]
    fn save_writes_pretty_form_without_touching_buffer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{}").unwrap();

        let mut state = state_in(dir.path());
        open_file(&mut state, &path);
        state.buffer.load("{\"x\":1}");
        state.buffer.insert_char(' ');

        save_file(&mut state);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\n    \"x\": 1\n}");
        assert_eq!(state.buffer.text(), " {\"x\":1}");
        assert_eq!(state.status_message, format!("Saved: {}", path.display()));
        assert!(!state.buffer.is_modified());

        let msg = state.message.unwrap();
        assert_eq!(msg.kind, MessageKind::Info);
        assert_eq!(msg.title, "Success");
        assert_eq!(msg.body, "File saved successfully!");
    }

    #[test]
    fn save_invalid_json_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "[1]").unwrap();

        let mut state = state_in(dir.path());
        open_file(&mut state, &path);
        state.buffer.load("[1,");
        save_file(&mut state);

        let msg = state.message.unwrap();
        assert_eq!(msg.title, "Save Error");
        assert!(msg.body.starts_with("Cannot save! Invalid JSON syntax:\n"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1]");
        assert_eq!(state.active_view, ActiveView::Editor);
    }

    #[test]
    fn save_without_path_prompts_then_writes() {
        let dir = tempdir().unwrap();
        let mut state = state_in(dir.path());
        type_text(&mut state, "[true]");

        save_file(&mut state);
        assert_eq!(state.active_view, ActiveView::SaveAsPrompt);
        assert!(state.message.is_none());

        for c in "fresh".chars() {
            state.save_as.as_mut().unwrap().push_char(c);
        }
        confirm_save_as(&mut state);

        let expected = dir.path().join("fresh.json");
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "[\n    true\n]");
        assert_eq!(state.current_file.as_deref(), Some(expected.as_path()));
        assert_eq!(state.active_view, ActiveView::Editor);
        assert!(state.save_as.is_none());
    }

    #[test]
    fn blank_save_as_input_cancels() {
        let dir = tempdir().unwrap();
        let mut state = state_in(dir.path());
        type_text(&mut state, "1");
        save_file(&mut state);
        confirm_save_as(&mut state);

        assert_eq!(state.active_view, ActiveView::Editor);
        assert!(state.current_file.is_none());
        assert!(state.message.is_none());
    }

    #[test]
    fn existing_target_needs_second_confirm() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("taken.json");
        std::fs::write(&path, "0").unwrap();

        let mut state = state_in(dir.path());
        type_text(&mut state, "2");
        save_as(&mut state);
        state.save_as.as_mut().unwrap().input = "taken.json".into();

        confirm_save_as(&mut state);
        assert_eq!(state.active_view, ActiveView::SaveAsPrompt);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0");

        confirm_save_as(&mut state);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2");
    }

    #[test]
    fn failed_write_keeps_current_path() {
        let dir = tempdir().unwrap();
        let mut state = state_in(dir.path());
        type_text(&mut state, "{}");
        save_file(&mut state);
        state.save_as.as_mut().unwrap().input = "no/such/dir/out.json".into();
        confirm_save_as(&mut state);

        let msg = state.message.unwrap();
        assert_eq!(msg.title, "Error");
        assert!(msg.body.starts_with("Could not save file: "));
        assert!(state.current_file.is_none());
    }

    #[test]
    fn new_file_is_created_on_first_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("later.json");
        let mut state = state_in(dir.path());
        start_new_file(&mut state, &path);
        type_text(&mut state, "{\"n\":null}");

        save_file(&mut state);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\n    \"n\": null\n}");
    }
}
