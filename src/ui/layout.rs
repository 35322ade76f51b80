//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: toolbar on top, editor, status bar at the bottom.
pub struct AppLayout {
    pub toolbar_area: Rect,
    pub editor_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // toolbar buttons
                Constraint::Min(3),    // editor (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            toolbar_area: chunks[0],
            editor_area: chunks[1],
            status_area: chunks[2],
        }
    }
}

/// Is the cell at (`col`, `row`) inside `area`?
pub fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
