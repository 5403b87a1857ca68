use std::collections::VecDeque;

use ratatui::widgets::{ListItem, ListState, ScrollbarState};

use crate::commands::Direction;

/// Bounded list of rendered lines with its scroll position.
pub struct ScrollableList {
    max_items: usize,
    pub list_items: VecDeque<ListItem<'static>>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
}

impl ScrollableList {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            list_items: VecDeque::with_capacity(max_items),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.list_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list_items.is_empty()
    }

    /// Append an item and follow it. The oldest item is dropped when full.
    pub fn push(&mut self, item: ListItem<'static>) {
        if self.list_items.len() == self.max_items {
            self.list_items.pop_front();
        }
        self.list_items.push_back(item);
        self.scroll_state = self.scroll_state.content_length(self.list_items.len());
        self.jump_to_last();
    }

    pub fn move_up(&mut self) {
        let idx = self.list_state.selected().unwrap_or(0).saturating_sub(1);
        self.select(idx);
    }

    pub fn move_down(&mut self) {
        let idx = self.list_state.selected().map_or(0, |idx| idx + 1);
        self.select(idx.min(self.list_items.len().saturating_sub(1)));
    }

    pub fn jump_to_first(&mut self) {
        self.select(0);
    }

    pub fn jump_to_last(&mut self) {
        self.select(self.list_items.len().saturating_sub(1));
    }

    fn select(&mut self, idx: usize) {
        self.list_state.select(Some(idx));
        self.scroll_state = self.scroll_state.position(idx);
    }
}

/// Multi-line text buffer with a character cursor.
///
/// Backs the roster editor panel. Columns count characters, not bytes.
#[derive(Clone, Debug, Default)]
pub struct TextArea {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl TextArea {
    /// Start with `text`, cursor at the end.
    pub fn new(text: &str) -> Self {
        let mut area = Self::default();
        area.set_text(text);
        area.row = area.lines.len() - 1;
        area.col = area.line_len(area.row);
        area
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (row, column).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Replace the contents, keeping the cursor where it still fits.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(String::from).collect();
        self.row = self.row.min(self.lines.len() - 1);
        self.col = self.col.min(self.line_len(self.row));
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.row, self.col);
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    pub fn newline(&mut self) {
        let at = self.byte_offset(self.row, self.col);
        let rest = self.lines[self.row].split_off(at);
        self.row += 1;
        self.col = 0;
        self.lines.insert(self.row, rest);
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_offset(self.row, self.col);
            self.lines[self.row].remove(at);
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let at = self.byte_offset(self.row, self.col);
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Up if self.row > 0 => {
                self.row -= 1;
                self.col = self.col.min(self.line_len(self.row));
            }
            Direction::Down if self.row + 1 < self.lines.len() => {
                self.row += 1;
                self.col = self.col.min(self.line_len(self.row));
            }
            Direction::Left if self.col > 0 => self.col -= 1,
            Direction::Left if self.row > 0 => {
                self.row -= 1;
                self.col = self.line_len(self.row);
            }
            Direction::Right if self.col < self.line_len(self.row) => self.col += 1,
            Direction::Right if self.row + 1 < self.lines.len() => {
                self.row += 1;
                self.col = 0;
            }
            _ => {}
        }
    }

    pub fn jump_to_first(&mut self) {
        self.col = 0;
    }

    pub fn jump_to_last(&mut self) {
        self.col = self.line_len(self.row);
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_offset(&self, row: usize, col: usize) -> usize {
        self.lines[row]
            .char_indices()
            .nth(col)
            .map_or(self.lines[row].len(), |(idx, _)| idx)
    }
}
