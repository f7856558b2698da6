//! # Transcript
//!
//! The scrolling chat log in the top region. Lines are written at a row cursor
//! that advances until it reaches the last writable row; from then on each new
//! line is written there and the region scrolls up one row, discarding the
//! oldest visible line.

use chrono::{DateTime, Local};

use super::layout::Region;
use super::surface::Surface;

/// Column where transcript lines start (one cell of padding after the border).
const TEXT_COL: u16 = 2;

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M:%S %Y-%m-%d";

pub struct Transcript {
    surface: Surface,
    /// Next row to write, in `1..=last_row`
    cursor: u16,
    last_row: u16,
    timestamp_format: String,
}

impl Transcript {
    pub fn new(region: Region, timestamp_format: impl Into<String>) -> Self {
        Self {
            surface: Surface::new(region.height),
            cursor: 1,
            last_row: region.last_writable_row(),
            timestamp_format: timestamp_format.into(),
        }
    }

    pub fn cursor(&self) -> u16 {
        self.cursor
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Append a line stamped with the current local time.
    pub fn append(&mut self, author: &str, body: &str) {
        self.append_at(Local::now(), author, body);
    }

    pub fn append_at(&mut self, at: DateTime<Local>, author: &str, body: &str) {
        let line = format!("{} {}: {}", at.format(&self.timestamp_format), author, body);
        self.surface.put_str(self.cursor, TEXT_COL, &line);
        if self.cursor < self.last_row {
            self.cursor += 1;
        } else {
            self.surface.scroll_up(1, self.last_row);
        }
    }

    pub fn clear(&mut self) {
        self.surface.clear();
        self.cursor = 1;
    }

    /// Fit the transcript to a new region. If the cursor no longer fits, the
    /// content scrolls up so the newest lines stay visible and the cursor is
    /// pinned to the new last row.
    pub fn resize(&mut self, region: Region) {
        let last_row = region.last_writable_row();
        if self.cursor > last_row {
            for _ in last_row..self.cursor {
                self.surface.scroll_up(1, self.last_row);
            }
            self.cursor = last_row;
        }
        self.surface.set_height(region.height);
        self.last_row = last_row;
    }
}
