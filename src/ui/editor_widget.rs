//! Text area: line-number gutter, visible slice of the buffer, scrollbar.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::core::buffer::{cell_width, Scroll, TextBuffer};
use crate::ui::theme::Theme;

/// Where each part of the editor lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorGeometry {
    pub gutter: Rect,
    pub text: Rect,
    pub scrollbar: Rect,
}

impl EditorGeometry {
    /// Split the bordered editor `area` for a document of `line_count` lines.
    pub fn compute(area: Rect, line_count: usize, line_numbers: bool) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let gutter_w = if line_numbers {
            (digits(line_count) as u16 + 1).min(inner.width)
        } else {
            0
        };
        let scrollbar_w = u16::from(inner.width > gutter_w);
        let text_w = inner.width - gutter_w - scrollbar_w;

        Self {
            gutter: Rect::new(inner.x, inner.y, gutter_w, inner.height),
            text: Rect::new(inner.x + gutter_w, inner.y, text_w, inner.height),
            scrollbar: Rect::new(inner.x + gutter_w + text_w, inner.y, scrollbar_w, inner.height),
        }
    }

    /// Line and cell column under a screen cell inside the text region.
    pub fn position_at(&self, col: u16, row: u16, scroll: Scroll) -> Option<(usize, usize)> {
        if !crate::ui::layout::point_in_rect(self.text, col, row) {
            return None;
        }
        let line = scroll.row + (row - self.text.y) as usize;
        let column = scroll.col + (col - self.text.x) as usize;
        Some((line, column))
    }

    /// Screen cell of the buffer's cursor, or `None` when it is scrolled
    /// out of view.
    pub fn cursor_position(&self, buffer: &TextBuffer) -> Option<Position> {
        let cursor = buffer.cursor();
        let scroll = buffer.scroll();
        let x = buffer.display_col(cursor.line, cursor.col);
        if cursor.line < scroll.row || x < scroll.col {
            return None;
        }
        let dy = cursor.line - scroll.row;
        let dx = x - scroll.col;
        if dy >= self.text.height as usize || dx >= self.text.width as usize {
            return None;
        }
        Some(Position::new(self.text.x + dx as u16, self.text.y + dy as u16))
    }
}

fn digits(mut n: usize) -> usize {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}

pub struct EditorWidget<'a> {
    pub buffer: &'a TextBuffer,
    pub block: Block<'a>,
    pub line_numbers: bool,
}

impl<'a> Widget for EditorWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let geo = EditorGeometry::compute(area, self.buffer.line_count(), self.line_numbers);
        self.block.render(area, buf);
        if geo.text.width == 0 || geo.text.height == 0 {
            return;
        }

        let scroll = self.buffer.scroll();
        let cursor_line = self.buffer.cursor().line;
        let total = self.buffer.line_count();
        let visible = geo.text.height as usize;

        for row in 0..visible {
            let line_idx = scroll.row + row;
            if line_idx >= total {
                break;
            }
            let y = geo.text.y + row as u16;

            if geo.gutter.width > 0 {
                let style = if line_idx == cursor_line {
                    Theme::current_line_number_style()
                } else {
                    Theme::gutter_style()
                };
                let w = geo.gutter.width.saturating_sub(1) as usize;
                let number = format!("{:>w$} ", line_idx + 1);
                Paragraph::new(Line::from(Span::styled(number, style)))
                    .render(Rect::new(geo.gutter.x, y, geo.gutter.width, 1), buf);
            }

            let text = visible_cells(&self.buffer.line(line_idx), scroll.col, geo.text.width as usize);
            Paragraph::new(Line::from(Span::styled(text, Theme::text_style())))
                .render(Rect::new(geo.text.x, y, geo.text.width, 1), buf);
        }

        render_scrollbar(geo.scrollbar, total, scroll.row, visible, buf);
    }
}

/// The part of `line` between cells `first` and `first + width`.
///
/// A wide glyph cut by either edge is dropped; on the left its remaining
/// cells are padded so later glyphs stay aligned.
fn visible_cells(line: &str, first: usize, width: usize) -> String {
    let end = first + width;
    let mut out = String::new();
    let mut x = 0;
    for c in line.chars() {
        if x >= end {
            break;
        }
        let w = cell_width(c);
        if x < first {
            if x + w > first {
                out.extend(std::iter::repeat(' ').take(x + w - first));
            }
        } else if x + w > end {
            break;
        } else {
            out.push(if c == '\t' { ' ' } else { c });
        }
        x += w;
    }
    out
}

/// Scroll offset for a click at `row` on the scrollbar track.
pub fn scroll_for_track_click(track: Rect, row: u16, total: usize, visible: usize) -> usize {
    if track.height == 0 || total <= visible {
        return 0;
    }
    let rel = row.saturating_sub(track.y).min(track.height - 1) as f64;
    let frac = if track.height > 1 {
        rel / (track.height - 1) as f64
    } else {
        0.0
    };
    (frac * total.saturating_sub(visible) as f64).round() as usize
}

fn render_scrollbar(area: Rect, total: usize, offset: usize, visible: usize, buf: &mut Buffer) {
    if total <= visible || area.height < 2 || area.width == 0 {
        return;
    }
    let x = area.x + area.width.saturating_sub(1);
    let h = area.height as f64;
    let thumb_sz = ((visible as f64 / total as f64) * h).ceil().max(1.0) as u16;
    let max_off = total.saturating_sub(visible) as f64;
    let thumb_pos = if max_off > 0.0 {
        ((offset.min(max_off as usize) as f64 / max_off) * (h - thumb_sz as f64)).round() as u16
    } else {
        0
    };

    for row in 0..area.height {
        let y = area.y + row;
        let is_thumb = row >= thumb_pos && row < thumb_pos + thumb_sz;
        let (ch, fg) = if is_thumb {
            ('█', Theme::scrollbar_thumb())
        } else {
            ('│', Theme::scrollbar_track())
        };
        if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
            cell.set_char(ch).set_fg(fg);
        }
    }
}
