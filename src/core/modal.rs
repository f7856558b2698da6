//! # Modal Surfaces
//!
//! HELP, LIST and PEERLIST take the keyboard until a key is pressed. Each runs
//! a nested loop on the caller's stack:
//!
//! ```text
//! loop {
//!     modal = build(state)        // rebuilt every tick (PEERLIST refreshes)
//!     screen.draw_modal(modal)
//!     match poll_key(100ms) {
//!         None         => continue,
//!         Some(Resize) => return Resize,   // outer loop recomputes geometry
//!         Some(_)      => return Success,
//!     }
//! }
//! ```

use std::time::Duration;

use log::warn;

use super::commands::{CommandContext, CommandStatus};
use super::layout::Region;
use super::screen::Keystroke;
use super::state::UiState;

pub const MODAL_FOOTER: &str = "Press any key to continue...";

const MODAL_POLL: Duration = Duration::from_millis(100);

/// Where a modal sits on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalExtent {
    /// Half the terminal in each direction, centered
    Centered,
    /// Everything but a one-cell margin
    Full,
}

impl ModalExtent {
    pub fn area(&self, rows: u16, cols: u16) -> Region {
        match self {
            ModalExtent::Centered => Region {
                origin_row: rows / 4,
                origin_col: cols / 4,
                height: rows / 2,
                width: cols / 2,
            },
            ModalExtent::Full => Region {
                origin_row: 1.min(rows),
                origin_col: 1.min(cols),
                height: rows.saturating_sub(2),
                width: cols.saturating_sub(2),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalBody {
    /// Paragraphs, wrapped by the renderer
    Text(Vec<String>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        /// Column widths in percent of the modal width
        widths: Vec<u16>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub title: String,
    pub extent: ModalExtent,
    pub body: ModalBody,
}

/// Show a modal until a key arrives. `build` runs on every poll tick.
pub fn run_modal(
    ctx: &mut CommandContext<'_>,
    mut build: impl FnMut(&UiState) -> Modal,
) -> CommandStatus {
    loop {
        let modal = build(ctx.state);
        if let Err(e) = ctx.screen.draw_modal(ctx.state, &modal) {
            warn!("Failed to draw modal {}: {}", modal.title, e);
            return CommandStatus::Failure;
        }

        match ctx.screen.poll_key(MODAL_POLL) {
            Ok(None) => continue,
            Ok(Some(Keystroke::Resize)) => return CommandStatus::Resize,
            Ok(Some(_)) => return CommandStatus::Success,
            Err(e) => {
                warn!("Input error in modal {}: {}", modal.title, e);
                return CommandStatus::Failure;
            }
        }
    }
}
