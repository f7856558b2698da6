//! # Layout
//!
//! Splits the terminal into three stacked regions:
//!
//! ```text
//! row 0            ┌──────────── transcript ────────────┐
//!                  │                                    │  height = rows - 9
//!                  └────────────────────────────────────┘
//! rows - 9         ┌────────────── input ───────────────┐
//!                  │ > _                                │  height = 8
//!                  └────────────────────────────────────┘
//! rows - 1          Status: ...                             height = 1
//! ```
//!
//! Every region spans the full width and starts at column 0. On a terminal too
//! short for the fixed heights, status keeps its row first, then input, and the
//! transcript gets whatever is left (possibly nothing). Nothing here can fail.

/// Fixed height of the input region, borders included.
pub const INPUT_HEIGHT: u16 = 8;
/// Fixed height of the status line.
pub const STATUS_HEIGHT: u16 = 1;

/// A rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub origin_row: u16,
    pub origin_col: u16,
    pub height: u16,
    pub width: u16,
}

impl Region {
    /// Last row inside the top/bottom border that text may be written to.
    ///
    /// Never below 1, so a degenerate region still has a (clipped) cursor row.
    pub fn last_writable_row(&self) -> u16 {
        self.height.saturating_sub(2).max(1)
    }
}

/// The three regions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub transcript: Region,
    pub input: Region,
    pub status: Region,
}

impl Geometry {
    /// Compute the regions for a terminal of `rows` × `cols` cells.
    pub fn compute(rows: u16, cols: u16) -> Self {
        let status_height = STATUS_HEIGHT.min(rows);
        let input_height = INPUT_HEIGHT.min(rows - status_height);
        let transcript_height = rows - status_height - input_height;

        let transcript = Region {
            origin_row: 0,
            origin_col: 0,
            height: transcript_height,
            width: cols,
        };
        let input = Region {
            origin_row: transcript_height,
            origin_col: 0,
            height: input_height,
            width: cols,
        };
        let status = Region {
            origin_row: transcript_height + input_height,
            origin_col: 0,
            height: status_height,
            width: cols,
        };

        Self {
            transcript,
            input,
            status,
        }
    }

    /// Total terminal rows covered by the three regions.
    pub fn rows(&self) -> u16 {
        self.transcript.height + self.input.height + self.status.height
    }
}
