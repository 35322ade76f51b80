//! Rope-backed text buffer behind the editor widget.
//!
//! Provides the editing primitives the widget needs (insert, delete, cursor
//! motion, scrolling) plus a snapshot-based undo/redo history.  Snapshots are
//! cheap because `Rope` clones share their nodes.

use ropey::Rope;
use unicode_width::UnicodeWidthChar;

/// Maximum number of undo steps retained.
const MAX_HISTORY: usize = 500;

/// Cursor position as (line, column), both counted in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

/// First visible row and first visible screen column of the viewport.
///
/// `col` counts terminal cells, not chars: a wide glyph takes two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scroll {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Insert,
    Delete,
    Replace,
}

#[derive(Debug, Clone)]
struct Snapshot {
    rope: Rope,
    cursor: Cursor,
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
    cursor: Cursor,
    /// Column the cursor tries to return to on vertical motion.
    preferred_col: Option<usize>,
    scroll: Scroll,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Kind of the edit that last extended the current undo group.
    last_edit: Option<EditKind>,
    /// Set when the cursor moved and the viewport should follow it.
    reveal_pending: bool,
    modified: bool,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            cursor: Cursor::default(),
            preferred_col: None,
            scroll: Scroll::default(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            last_edit: None,
            reveal_pending: false,
            modified: false,
        }
    }

    // ── content ─────────────────────────────────────────────────

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Contents of `line` without its line terminator.
    pub fn line(&self, line: usize) -> String {
        if line >= self.rope.len_lines() {
            return String::new();
        }
        let mut s = self.rope.line(line).to_string();
        while s.ends_with('\n') || s.ends_with('\r') {
            s.pop();
        }
        s
    }

    fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        while len > 0 {
            let c = slice.char(len - 1);
            if c == '\n' || c == '\r' {
                len -= 1;
            } else {
                break;
            }
        }
        len
    }

    /// Screen cells taken by the first `col` chars of `line`.
    pub fn display_col(&self, line: usize, col: usize) -> usize {
        self.line(line).chars().take(col).map(cell_width).sum()
    }

    /// Char column of the glyph covering screen cell `x` on `line`.
    fn col_at_cell(&self, line: usize, x: usize) -> usize {
        let mut start = 0;
        for (i, c) in self.line(line).chars().enumerate() {
            let w = cell_width(c);
            if x < start + w {
                return i;
            }
            start += w;
        }
        self.line_len(line)
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Load a fresh document: replaces the text and forgets all history.
    pub fn load(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::default();
        self.preferred_col = None;
        self.scroll = Scroll::default();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.last_edit = None;
        self.reveal_pending = true;
        self.modified = false;
    }

    /// Replace the whole text as a single undoable edit.
    pub fn set_text(&mut self, text: &str) {
        self.begin_edit(EditKind::Replace);
        self.rope = Rope::from_str(text);
        self.cursor = Cursor::default();
        self.preferred_col = None;
        self.scroll = Scroll::default();
        self.reveal_pending = true;
    }

    // ── cursor ──────────────────────────────────────────────────

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn scroll(&self) -> Scroll {
        self.scroll
    }

    fn char_idx(&self) -> usize {
        self.rope.line_to_char(self.cursor.line) + self.cursor.col
    }

    fn place_at_char(&mut self, idx: usize) {
        let idx = idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        let col = idx - self.rope.line_to_char(line);
        self.cursor = Cursor {
            line,
            col: col.min(self.line_len(line)),
        };
    }

    fn moved(&mut self) {
        self.last_edit = None;
        self.reveal_pending = true;
    }

    /// Place the cursor, clamping to the document bounds.
    pub fn set_cursor(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        self.cursor = Cursor {
            line,
            col: col.min(self.line_len(line)),
        };
        self.preferred_col = None;
        self.moved();
    }

    /// Place the cursor on the glyph under screen cell `x` of `line`.
    pub fn set_cursor_at_cell(&mut self, line: usize, x: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let col = self.col_at_cell(line, x);
        self.set_cursor(line, col);
    }

    pub fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.col = self.line_len(self.cursor.line);
        }
        self.preferred_col = None;
        self.moved();
    }

    pub fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.col += 1;
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.col = 0;
        }
        self.preferred_col = None;
        self.moved();
    }

    pub fn move_up(&mut self, rows: usize) {
        let want = self.preferred_col.unwrap_or(self.cursor.col);
        self.cursor.line = self.cursor.line.saturating_sub(rows);
        self.cursor.col = want.min(self.line_len(self.cursor.line));
        self.preferred_col = Some(want);
        self.moved();
    }

    pub fn move_down(&mut self, rows: usize) {
        let want = self.preferred_col.unwrap_or(self.cursor.col);
        let last = self.line_count().saturating_sub(1);
        self.cursor.line = (self.cursor.line + rows).min(last);
        self.cursor.col = want.min(self.line_len(self.cursor.line));
        self.preferred_col = Some(want);
        self.moved();
    }

    pub fn move_line_start(&mut self) {
        self.cursor.col = 0;
        self.preferred_col = None;
        self.moved();
    }

    pub fn move_line_end(&mut self) {
        self.cursor.col = self.line_len(self.cursor.line);
        self.preferred_col = None;
        self.moved();
    }

    pub fn move_doc_start(&mut self) {
        self.set_cursor(0, 0);
    }

    pub fn move_doc_end(&mut self) {
        let last = self.line_count().saturating_sub(1);
        self.set_cursor(last, usize::MAX);
    }

    // ── editing ─────────────────────────────────────────────────

    /// Record an undo point unless this edit continues the current group.
    fn begin_edit(&mut self, kind: EditKind) {
        let continues = kind != EditKind::Replace && self.last_edit == Some(kind);
        if !continues {
            self.undo_stack.push(Snapshot {
                rope: self.rope.clone(),
                cursor: self.cursor,
            });
            if self.undo_stack.len() > MAX_HISTORY {
                self.undo_stack.remove(0);
            }
        }
        self.redo_stack.clear();
        self.last_edit = Some(kind);
        self.modified = true;
    }

    pub fn insert_char(&mut self, c: char) {
        self.begin_edit(EditKind::Insert);
        let idx = self.char_idx();
        self.rope.insert_char(idx, c);
        self.place_at_char(idx + 1);
        self.preferred_col = None;
        self.reveal_pending = true;
    }

    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.begin_edit(EditKind::Insert);
        let idx = self.char_idx();
        self.rope.insert(idx, s);
        self.place_at_char(idx + s.chars().count());
        self.preferred_col = None;
        self.reveal_pending = true;
    }

    /// Break the line, carrying over the current line's leading whitespace.
    pub fn insert_newline(&mut self) {
        let indent: String = self
            .line(self.cursor.line)
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .take(self.cursor.col)
            .collect();
        self.insert_str(&format!("\n{indent}"));
    }

    pub fn backspace(&mut self) {
        let idx = self.char_idx();
        if idx == 0 {
            return;
        }
        self.begin_edit(EditKind::Delete);
        self.rope.remove(idx - 1..idx);
        self.place_at_char(idx - 1);
        self.preferred_col = None;
        self.reveal_pending = true;
    }

    pub fn delete(&mut self) {
        let idx = self.char_idx();
        if idx >= self.rope.len_chars() {
            return;
        }
        self.begin_edit(EditKind::Delete);
        self.rope.remove(idx..idx + 1);
        self.place_at_char(idx);
        self.preferred_col = None;
        self.reveal_pending = true;
    }

    // ── history ─────────────────────────────────────────────────

    /// Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.undo_stack.pop() else {
            return false;
        };
        let current = Snapshot {
            rope: std::mem::replace(&mut self.rope, prev.rope),
            cursor: self.cursor,
        };
        self.redo_stack.push(current);
        self.restore_cursor(prev.cursor);
        true
    }

    /// Returns `false` when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = Snapshot {
            rope: std::mem::replace(&mut self.rope, next.rope),
            cursor: self.cursor,
        };
        self.undo_stack.push(current);
        self.restore_cursor(next.cursor);
        true
    }

    fn restore_cursor(&mut self, cursor: Cursor) {
        self.set_cursor(cursor.line, cursor.col);
        self.modified = true;
    }

    // ── viewport ────────────────────────────────────────────────

    /// Scroll by `delta` rows without moving the cursor.
    pub fn scroll_rows(&mut self, delta: isize) {
        let max = self.line_count().saturating_sub(1);
        self.scroll.row = self.scroll.row.saturating_add_signed(delta).min(max);
        self.reveal_pending = false;
    }

    /// Jump the viewport so `row` is the first visible line.
    pub fn scroll_to_row(&mut self, row: usize) {
        self.scroll.row = row.min(self.line_count().saturating_sub(1));
        self.reveal_pending = false;
    }

    /// Adjust the scroll offsets so the cursor is inside a viewport of
    /// `rows` × `cols`, if a cursor move asked for it.
    pub fn reveal_cursor(&mut self, rows: usize, cols: usize) {
        if !self.reveal_pending || rows == 0 || cols == 0 {
            return;
        }
        self.reveal_pending = false;

        if self.cursor.line < self.scroll.row {
            self.scroll.row = self.cursor.line;
        } else if self.cursor.line >= self.scroll.row + rows {
            self.scroll.row = self.cursor.line + 1 - rows;
        }

        let x = self.display_col(self.cursor.line, self.cursor.col);
        let w = self
            .rope
            .line(self.cursor.line)
            .chars()
            .nth(self.cursor.col)
            .map(cell_width)
            .unwrap_or(1)
            .clamp(1, cols);
        if x < self.scroll.col {
            self.scroll.col = x;
        } else if x + w > self.scroll.col + cols {
            self.scroll.col = x + w - cols;
        }
    }
}

/// Terminal cells a char occupies.  Tabs are drawn as a single space.
pub fn cell_width(c: char) -> usize {
    if c == '\t' {
        1
    } else {
        c.width().unwrap_or(0)
    }
}
