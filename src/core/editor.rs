//! # Input Editor
//!
//! The message being typed, painted into the input region with a 2-D cursor.
//!
//! ```text
//! col:  0 1 2 3 4 ...                 width-2  width-1
//!       │   > h e l l o   w o r l d ... x      │      ← prompt row
//!       │       c o n t i n u e d _            │      ← wrapped row
//!           ▲   ▲                     ▲
//!   PROMPT_COL  col_start             last column written before wrapping
//! ```
//!
//! Every row of a message holds `capacity` characters starting at
//! `col_start`, so the cursor is a pure function of the buffer length and the
//! row the prompt was printed on. When the cursor would leave the last
//! writable row the region scrolls up and the prompt row moves up with it (it
//! may go above row 1); deleting back past the top row scrolls down again and
//! repaints the row that had scrolled off.
//!
//! Only printable ASCII is accepted, so byte offsets and character offsets
//! into the buffer are the same thing.

use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use super::commands::Submission;
use super::layout::Region;
use super::surface::Surface;
use crate::chat::MAX_MESSAGE_SIZE;

/// Column the prompt is printed at.
pub const PROMPT_COL: u16 = 2;

pub const DEFAULT_PROMPT: &str = "> ";

/// Input-bound errors. The display text is what the status line shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Maximum Message Length")]
    Full,
    #[error("Unknown Key: 0x{0:x}")]
    NotPrintable(u32),
}

pub fn is_printable(ch: char) -> bool {
    matches!(ch, ' '..='~')
}

pub struct InputEditor {
    buffer: String,
    max_len: usize,
    prompt: String,
    col_start: u16,
    last_col: u16,
    last_line: u16,
    /// Characters per row
    capacity: usize,
    /// Row the current message's prompt sits on; below 1 once scrolled off
    prompt_row: i32,
    surface: Surface,
}

impl InputEditor {
    pub fn new(region: Region, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        let prompt_width = u16::try_from(prompt.width()).unwrap_or(u16::MAX);
        let col_start = PROMPT_COL.saturating_add(prompt_width);
        let mut editor = Self {
            buffer: String::new(),
            max_len: MAX_MESSAGE_SIZE - 1,
            prompt,
            col_start,
            last_col: col_start,
            last_line: 1,
            capacity: 1,
            prompt_row: 1,
            surface: Surface::new(region.height),
        };
        editor.fit(region);
        editor.paint_prompt();
        editor
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn col_start(&self) -> u16 {
        self.col_start
    }

    /// `(line, col)` where the next character will be written.
    pub fn cursor(&self) -> (u16, u16) {
        let index = self.buffer.len();
        (self.row_of(index).max(0) as u16, self.col_of(index))
    }

    pub fn insert_printable(&mut self, ch: char) -> Result<(), EditError> {
        if !is_printable(ch) {
            return Err(EditError::NotPrintable(ch as u32));
        }
        if self.buffer.len() >= self.max_len {
            return Err(EditError::Full);
        }

        let (line, col) = self.cursor();
        self.surface.put_char(line, col, ch);
        self.buffer.push(ch);

        if self.row_of(self.buffer.len()) > i32::from(self.last_line) {
            self.surface.scroll_up(1, self.last_line);
            self.prompt_row -= 1;
        }
        Ok(())
    }

    pub fn delete_backward(&mut self) {
        if self.buffer.pop().is_none() {
            return;
        }

        let index = self.buffer.len();
        if self.row_of(index) < 1 {
            self.surface.scroll_down(1, self.last_line);
            self.prompt_row += 1;
            self.paint_segment(index / self.capacity);
        }
        let (line, col) = self.cursor();
        self.surface.put_char(line, col, ' ');
    }

    /// Take the buffer as a classified submission and print a fresh prompt on
    /// the next row. Returns `None` for an empty buffer.
    pub fn submit(&mut self, escape: char) -> Option<Submission> {
        if self.buffer.is_empty() {
            return None;
        }

        let (line, _) = self.cursor();
        if line < self.last_line {
            self.prompt_row = i32::from(line) + 1;
        } else {
            self.surface.scroll_up(1, self.last_line);
            self.prompt_row = i32::from(self.last_line);
        }

        let line = std::mem::take(&mut self.buffer);
        self.paint_prompt();
        Some(Submission::classify(line, escape))
    }

    /// Erase the region and the buffer; the prompt goes back to row 1.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.surface.clear();
        self.prompt_row = 1;
        self.paint_prompt();
    }

    /// Fit to a new region and reflow the message being typed.
    pub fn resize(&mut self, region: Region) {
        let first = self.prompt_row.max(1) as u16;
        for row in first..=self.last_line {
            self.surface.clear_row(row);
        }

        self.fit(region);

        let used = (self.buffer.len() / self.capacity) as i32;
        let top = self.prompt_row.max(1);
        let prompt_row = top.min(i32::from(self.last_line) - used);
        let bottom = self.surface.height().saturating_sub(1);
        for _ in prompt_row..top {
            self.surface.scroll_up(1, bottom);
        }
        self.surface.set_height(region.height);
        self.prompt_row = prompt_row;

        for segment in 0..=self.buffer.len() / self.capacity {
            self.paint_segment(segment);
        }
    }

    fn fit(&mut self, region: Region) {
        self.last_col = region.width.saturating_sub(2).max(self.col_start);
        self.last_line = region.last_writable_row();
        self.capacity = usize::from(self.last_col - self.col_start) + 1;
    }

    fn row_of(&self, index: usize) -> i32 {
        self.prompt_row + (index / self.capacity) as i32
    }

    fn col_of(&self, index: usize) -> u16 {
        self.col_start + (index % self.capacity) as u16
    }

    fn paint_prompt(&mut self) {
        if self.prompt_row >= 1 {
            self.surface
                .put_str(self.prompt_row as u16, PROMPT_COL, &self.prompt);
        }
    }

    /// Repaint one row's worth of the buffer (segment 0 includes the prompt).
    fn paint_segment(&mut self, segment: usize) {
        let start = segment * self.capacity;
        let row = self.row_of(start);
        if row < 1 || start > self.buffer.len() {
            return;
        }
        if segment == 0 {
            self.paint_prompt();
        }
        let end = (start + self.capacity).min(self.buffer.len());
        self.surface
            .put_str(row as u16, self.col_start, &self.buffer[start..end]);
    }
}
