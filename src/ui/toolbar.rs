//! Toolbar with the three command buttons.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use crate::config::{Action, AppConfig};
use crate::ui::theme::Theme;

/// Buttons in display order, with the action each one triggers.
pub const BUTTONS: &[(&str, Action)] = &[
    ("Open File", Action::Open),
    ("Save", Action::Save),
    ("Format (Prettify)", Action::Format),
];

/// Horizontal gap between buttons.
const GAP: u16 = 1;

/// Screen rectangles of each button inside the toolbar `area`.
///
/// Buttons that do not fit are dropped.
pub fn button_rects(area: Rect) -> Vec<(Action, Rect)> {
    let mut out = Vec::with_capacity(BUTTONS.len());
    let right = area.x.saturating_add(area.width);
    let mut x = area.x.saturating_add(GAP);
    for &(label, action) in BUTTONS {
        let width = label.chars().count() as u16 + 4; // borders + padding
        if x.saturating_add(width) > right {
            break;
        }
        out.push((action, Rect::new(x, area.y, width, area.height.min(3))));
        x = x.saturating_add(width + GAP);
    }
    out
}

/// The button under (`col`, `row`), if any.
pub fn button_at(area: Rect, col: u16, row: u16) -> Option<Action> {
    button_rects(area)
        .into_iter()
        .find(|(_, r)| crate::ui::layout::point_in_rect(*r, col, row))
        .map(|(action, _)| action)
}

pub struct ToolbarWidget<'a> {
    pub config: &'a AppConfig,
}

impl<'a> Widget for ToolbarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rects = button_rects(area);
        let mut used_right = area.x;
        for ((label, _), (_, rect)) in BUTTONS.iter().zip(rects.iter()) {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::button_border_style());
            Paragraph::new(Line::from(Span::styled(*label, Theme::button_style())))
                .alignment(Alignment::Center)
                .block(block)
                .render(*rect, buf);
            used_right = rect.x + rect.width;
        }

        // Shortcut hint on the right-hand side, if there is room.
        let hint = format!(
            "{}: settings  {}: quit ",
            self.config.short_binding(Action::OpenSettings),
            self.config.short_binding(Action::Quit),
        );
        let hint_w = hint.chars().count() as u16;
        let right = area.x + area.width;
        if area.height >= 2 && right.saturating_sub(hint_w) > used_right + GAP {
            let hint_area = Rect::new(right - hint_w, area.y + area.height / 2, hint_w, 1);
            Paragraph::new(Line::from(Span::styled(hint, Theme::hint_style())))
                .render(hint_area, buf);
        }
    }
}
