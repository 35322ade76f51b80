//! Popup overlay widgets: message box, file dialogs, settings and controls.

use std::time::SystemTime;

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::app::dialog::{OpenDialogState, SaveAsState};
use crate::app::settings::SETTINGS_ITEMS;
use crate::app::state::{AppState, Message, MessageKind};
use crate::config::{Action, AppConfig};
use crate::core::fs::DialogEntry;
use crate::ui::layout::centered_fixed;
use crate::ui::theme::Theme;

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(Theme::popup_title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::popup_border_style())
}

// ───────────────────────────────────────── message box ───────

const OK_LABEL: &str = "[ OK ]";

/// Rows the body of `message` needs when wrapped to `text_w` columns.
fn body_rows(message: &Message, text_w: usize) -> usize {
    message
        .body
        .lines()
        .map(|l| l.chars().count().max(1).div_ceil(text_w.max(1)))
        .sum::<usize>()
        .max(1)
}

/// Where the message box for `message` lands inside `area`.
pub fn message_rect(area: Rect, message: &Message) -> Rect {
    let longest = message
        .body
        .lines()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(message.title.chars().count() + 4);
    let width = (longest as u16).saturating_add(6).clamp(30, 72);
    let rows = body_rows(message, width.saturating_sub(4) as usize) as u16;
    // border + blank + body + blank + button + border
    centered_fixed(width, rows.saturating_add(5), area)
}

/// The OK button inside a message box.
pub fn ok_button_rect(popup: Rect) -> Rect {
    let w = OK_LABEL.len() as u16;
    Rect::new(
        popup.x + popup.width.saturating_sub(w) / 2,
        popup.y + popup.height.saturating_sub(2),
        w.min(popup.width),
        1,
    )
}

/// Blocking message box (errors and confirmations).
pub struct MessagePopup<'a> {
    pub message: &'a Message,
}

impl<'a> Widget for MessagePopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = message_rect(area, self.message);
        Clear.render(popup, buf);

        let (title_style, border_style) = match self.message.kind {
            MessageKind::Error => (Theme::error_title_style(), Theme::error_border_style()),
            MessageKind::Info => (Theme::popup_title_style(), Theme::popup_border_style()),
        };
        let block = Block::default()
            .title(format!(" {} ", self.message.title))
            .title_style(title_style)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        block.render(popup, buf);

        let body_area = Rect::new(
            popup.x + 2,
            popup.y + 2,
            popup.width.saturating_sub(4),
            popup.height.saturating_sub(5),
        );
        Paragraph::new(self.message.body.as_str())
            .wrap(Wrap { trim: false })
            .render(body_area, buf);

        Paragraph::new(Line::from(Span::styled(OK_LABEL, Theme::selected_style())))
            .render(ok_button_rect(popup), buf);
    }
}

// ───────────────────────────────────────── open dialog ───────

/// Regions of the open dialog.
pub struct OpenDialogGeometry {
    pub popup: Rect,
    pub list: Rect,
}

pub fn open_dialog_geometry(area: Rect) -> OpenDialogGeometry {
    let width = (area.width.saturating_mul(3) / 4).max(50);
    let height = (area.height.saturating_mul(3) / 4).max(10);
    let popup = centered_fixed(width, height, area);
    let inner = popup_block("").inner(popup);
    // header row, then the list, then filter + hint rows
    let list = Rect::new(
        inner.x,
        inner.y.saturating_add(1),
        inner.width,
        inner.height.saturating_sub(3),
    );
    OpenDialogGeometry { popup, list }
}

pub struct OpenDialogPopup<'a> {
    pub dialog: &'a OpenDialogState,
}

impl<'a> Widget for OpenDialogPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let geo = open_dialog_geometry(area);
        Clear.render(geo.popup, buf);
        let block = popup_block("Open File");
        let inner = block.inner(geo.popup);
        block.render(geo.popup, buf);
        if inner.height < 4 {
            return;
        }

        Paragraph::new(Line::from(vec![
            Span::styled("Look in: ", Theme::hint_style()),
            Span::styled(self.dialog.dir.display().to_string(), Theme::title_style()),
        ]))
        .render(Rect::new(inner.x, inner.y, inner.width, 1), buf);

        if let Some(err) = &self.dialog.error {
            Paragraph::new(Line::from(Span::styled(err.as_str(), Theme::error_title_style())))
                .render(Rect::new(geo.list.x, geo.list.y, geo.list.width, 1), buf);
        } else if self.dialog.entries.is_empty() {
            Paragraph::new(Line::from(Span::styled("(empty)", Theme::hint_style())))
                .render(Rect::new(geo.list.x, geo.list.y, geo.list.width, 1), buf);
        }

        let rows = geo.list.height as usize;
        for (i, entry) in self
            .dialog
            .entries
            .iter()
            .enumerate()
            .skip(self.dialog.offset)
            .take(rows)
        {
            let selected = i == self.dialog.selected;
            let style = if selected {
                Theme::selected_style()
            } else if entry.is_dir() {
                Theme::dir_style()
            } else {
                Theme::file_style()
            };
            let marker = if selected { " ▸ " } else { "   " };
            let details = entry_details(entry);
            let name_w = (geo.list.width as usize)
                .saturating_sub(details.chars().count() + marker.chars().count());
            let name = truncate(&entry.display_name(), name_w);
            let text = format!("{marker}{name:<name_w$}{details}");
            let y = geo.list.y + (i - self.dialog.offset) as u16;
            Paragraph::new(Line::from(Span::styled(text, style)))
                .render(Rect::new(geo.list.x, y, geo.list.width, 1), buf);
        }

        let filter_y = inner.y + inner.height - 2;
        let hidden = if self.dialog.show_hidden { "[x]" } else { "[ ]" };
        Paragraph::new(Line::from(vec![
            Span::styled("Files of type: ", Theme::hint_style()),
            Span::styled(self.dialog.filter.label(), Theme::key_style()),
            Span::styled(format!("   {hidden} hidden"), Theme::hint_style()),
        ]))
        .render(Rect::new(inner.x, filter_y, inner.width, 1), buf);

        Paragraph::new(Line::from(Span::styled(
            "Enter: open  Bksp: up  Tab: file type  Alt+h: hidden  Esc: cancel",
            Theme::hint_style(),
        )))
        .render(Rect::new(inner.x, filter_y + 1, inner.width, 1), buf);
    }
}

/// Size and modification time column for a dialog row.
fn entry_details(entry: &DialogEntry) -> String {
    match entry {
        DialogEntry::Parent(_) => String::new(),
        DialogEntry::Entry(meta) if meta.is_dir => {
            format!("{:>18} ", meta.modified.map(format_ts).unwrap_or_default())
        }
        DialogEntry::Entry(meta) => format!(
            "{:>9} {:>18} ",
            format_size(meta.size),
            meta.modified.map(format_ts).unwrap_or_default()
        ),
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "K", "M", "G", "T"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

fn format_ts(t: SystemTime) -> String {
    use chrono::{DateTime, Local};
    let dt: DateTime<Local> = t.into();
    dt.format("%Y/%m/%d %H:%M").to_string()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".chars().take(max_chars).collect();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

// ───────────────────────────────────────── save-as prompt ────

const SAVE_LABEL: &str = "File name: ";

fn save_as_rect(area: Rect) -> Rect {
    centered_fixed(64, 8, area)
}

/// Terminal cursor position at the end of the prompt's input.
pub fn save_as_cursor(area: Rect, prompt: &SaveAsState) -> Position {
    let popup = save_as_rect(area);
    let inner = popup_block("").inner(popup);
    let typed = (SAVE_LABEL.len() + prompt.input.chars().count()) as u16;
    Position::new(
        (inner.x + typed).min(inner.x + inner.width.saturating_sub(1)),
        inner.y + 2,
    )
}

pub struct SaveAsPopup<'a> {
    pub prompt: &'a SaveAsState,
}

impl<'a> Widget for SaveAsPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = save_as_rect(area);
        Clear.render(popup, buf);
        let block = popup_block("Save As");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let line = |y: u16| Rect::new(inner.x, inner.y + y, inner.width, 1);
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Save in: ", Theme::hint_style()),
                Span::styled(self.prompt.dir.display().to_string(), Theme::title_style()),
            ]),
            Line::raw(""),
            Line::from(vec![
                Span::raw(SAVE_LABEL),
                Span::styled(self.prompt.input.as_str(), Theme::command_input_style()),
            ]),
            Line::from(Span::styled(
                "Save as type: JSON files (*.json)",
                Theme::hint_style(),
            )),
        ];
        if let Some(target) = &self.prompt.confirm_overwrite {
            lines.push(Line::from(Span::styled(
                format!("{} exists. Enter again to replace it.", target.display()),
                Theme::warning_style(),
            )));
        } else {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            "Enter: save  Esc: cancel",
            Theme::hint_style(),
        )));

        for (i, l) in lines.into_iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            Paragraph::new(l).render(line(i as u16), buf);
        }
    }
}

// ───────────────────────────────────────── settings popup ────

/// Settings menu popup overlay.
pub struct SettingsPopup<'a> {
    pub state: &'a AppState,
}

impl<'a> Widget for SettingsPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (SETTINGS_ITEMS.len() as u16) + 6;
        let popup = centered_fixed(44, height, area);
        Clear.render(popup, buf);

        let block = popup_block("Settings");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = Vec::new();
        lines.push(Line::raw(""));
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let (prefix, style) = if i == self.state.settings_selected {
                (" ▸ ", Theme::selected_style())
            } else {
                ("   ", Theme::file_style())
            };

            let value = item.value_text(self.state);
            if value.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("{prefix}{}", item.label()),
                    style,
                )));
            } else {
                let value_style = if value == "OFF" {
                    Theme::hint_style()
                } else {
                    Theme::on_style()
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{prefix}{:<22}", item.label()), style),
                    Span::styled(format!("[{value}]"), value_style),
                ]));
            }
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter/Space: change  Esc: close",
            Theme::hint_style(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── controls popup ────

/// Interactive controls / keybinding popup overlay.
pub struct ControlsPopup<'a> {
    pub config: &'a AppConfig,
    pub selected: usize,
    pub awaiting_rebind: bool,
}

impl<'a> Widget for ControlsPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // actions + 2 blanks + reset + hint + 2 border + 1 spare
        let height = (Action::ALL.len() as u16) + 7;
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let block = popup_block("Controls");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = Vec::new();
        lines.push(Line::raw(""));

        // ── Action rows ─────────────────────────────────────────
        for (i, &action) in Action::ALL.iter().enumerate() {
            let is_selected = i == self.selected;
            let prefix = if is_selected { " ▸ " } else { "   " };

            let keys_display = if is_selected && self.awaiting_rebind {
                "Press a key…".to_string()
            } else {
                self.config.display_bindings(action)
            };

            let (base_style, key_style) = if is_selected {
                (Theme::selected_style(), Theme::selected_style().fg(Color::Yellow))
            } else {
                (Theme::file_style(), Theme::key_style())
            };

            // Fixed-width columns: label left-aligned, keys right-aligned.
            let label_col = format!("{prefix}{:<22}", action.label());
            let keys_width = (inner.width as usize)
                .saturating_sub(label_col.chars().count())
                .max(1);
            let keys_col = format!("{keys_display:>keys_width$}");

            lines.push(Line::from(vec![
                Span::styled(label_col, base_style),
                Span::styled(keys_col, key_style),
            ]));
        }

        // ── Reset option ────────────────────────────────────────
        let is_reset_selected = self.selected == Action::ALL.len();
        lines.push(Line::raw(""));
        let (reset_prefix, reset_style) = if is_reset_selected {
            (" ▸ ", Theme::selected_style())
        } else {
            ("   ", Theme::file_style())
        };
        lines.push(Line::from(Span::styled(
            format!("{reset_prefix}⟳ Reset to defaults"),
            reset_style,
        )));

        // ── Hint bar ────────────────────────────────────────────
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter: add key  Del: clear  Esc: back",
            Theme::hint_style(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> Message {
        Message {
            kind: MessageKind::Error,
            title: "Invalid JSON".into(),
            body: body.into(),
        }
    }

    #[test]
    fn message_box_grows_with_body() {
        let area = Rect::new(0, 0, 100, 40);
        let short = message_rect(area, &message("Syntax Error: x"));
        assert_eq!(short.width, 30);
        assert_eq!(short.height, 6);

        let two_lines = message_rect(area, &message("Cannot save! Invalid JSON syntax:\nEOF"));
        assert_eq!(two_lines.height, 7);
    }

    #[test]
    fn ok_button_sits_on_second_to_last_row() {
        let popup = Rect::new(10, 10, 30, 6);
        assert_eq!(ok_button_rect(popup), Rect::new(22, 14, 6, 1));
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(2048), "2.0 K");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 M");
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-name.json", 8), "a-very-…");
    }

    #[test]
    fn message_popup_shows_title_body_and_button() {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let msg = message("Syntax Error: expected value");
        MessagePopup { message: &msg }.render(area, &mut buf);

        let popup = message_rect(area, &msg);
        let row = |y: u16| -> String {
            (popup.x..popup.x + popup.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(popup.y).contains("Invalid JSON"));
        assert!(row(popup.y + 2).contains("Syntax Error: expected value"));
        assert!(row(popup.y + popup.height - 2).contains(OK_LABEL));
    }
}
