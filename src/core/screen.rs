//! The engine's view of the terminal: keystrokes in, frames out.
//!
//! The TUI adapter implements [`Screen`] over crossterm and ratatui; tests
//! implement it with a scripted key queue.

use std::io;
use std::time::Duration;

use super::modal::Modal;
use super::state::UiState;

/// One unit of keyboard input, already decoded by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keystroke {
    /// Any character, printable or not (control keys arrive as `\u{1}` etc.)
    Char(char),
    Backspace,
    Enter,
    /// The terminal changed size
    Resize,
    /// A key with no character, by name (`Up`, `F5`, ...)
    Other(String),
}

pub trait Screen {
    /// Current terminal size as `(rows, cols)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Wait up to `timeout` for one keystroke.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Keystroke>>;

    /// Paint the three regions.
    fn draw(&mut self, state: &UiState) -> io::Result<()>;

    /// Paint the regions with `modal` on top.
    fn draw_modal(&mut self, state: &UiState, modal: &Modal) -> io::Result<()>;
}
