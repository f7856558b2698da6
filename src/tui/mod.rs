//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, paints what the core keeps
//! in its surfaces, and turns crossterm events into core `Keystroke`s.
//!
//! This is the only module that knows about ratatui and crossterm; the core
//! only sees the `Screen` trait.
//!
//! ```text
//!   crossterm events ──► event::translate ──► Keystroke ──┐
//!                                                         ▼
//!                                             core::event_loop::run
//!                                                         │
//!   terminal ◄── ui::draw_ui / ui::draw_modal ◄── &UiState┘
//! ```
//!
//! ## Redraw Strategy
//!
//! The core redraws after every poll tick (100ms) whether or not a key
//! arrived, so inbound chat lines appear without input. ratatui diffs each
//! frame against the last, so an idle tick writes nothing to the terminal.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{error, info};
use std::io::{self, stdout};
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::chat::ChatSession;
use crate::chat::multicast::MulticastSession;
use crate::core::config::ResolvedConfig;
use crate::core::event_loop;
use crate::core::modal::Modal;
use crate::core::screen::{Keystroke, Screen};
use crate::core::state::UiState;

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(
            stdout(),
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), SetCursorStyle::DefaultUserShape, Hide);
        info!("Terminal modes restored");
    }
}

/// `Screen` over a real terminal.
pub struct RatatuiScreen {
    terminal: DefaultTerminal,
}

impl RatatuiScreen {
    pub fn new(terminal: DefaultTerminal) -> Self {
        Self { terminal }
    }
}

impl Screen for RatatuiScreen {
    fn size(&self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.height, size.width))
    }

    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Keystroke>> {
        event::poll_key(timeout)
    }

    fn draw(&mut self, state: &UiState) -> io::Result<()> {
        self.terminal.draw(|frame| ui::draw_ui(frame, state))?;
        Ok(())
    }

    fn draw_modal(&mut self, state: &UiState, modal: &Modal) -> io::Result<()> {
        self.terminal
            .draw(|frame| ui::draw_modal(frame, state, modal))?;
        Ok(())
    }
}

/// Join the chat network, take over the terminal and run until QUIT.
///
/// `startup_warning` (a config problem, usually) is shown as a status message
/// that stays up until replaced.
pub fn run(config: &ResolvedConfig, startup_warning: Option<String>) -> io::Result<()> {
    // Fail before touching the terminal so the error prints normally
    let session = MulticastSession::open(&config.network()).map_err(|e| {
        error!("Failed to open chat session: {}", e);
        io::Error::other(e)
    })?;

    let terminal = ratatui::init();
    let result = run_in_terminal(terminal, config, Box::new(session), startup_warning);
    ratatui::restore();
    result
}

fn run_in_terminal(
    terminal: DefaultTerminal,
    config: &ResolvedConfig,
    session: Box<dyn ChatSession>,
    startup_warning: Option<String>,
) -> io::Result<()> {
    let _terminal_mode_guard = TerminalModeGuard::new()?;
    let mut screen = RatatuiScreen::new(terminal);

    let (rows, cols) = screen.size()?;
    let mut state = UiState::new(config, session, rows, cols);
    if let Some(warning) = startup_warning {
        state.status.set_urgent(warning, true, true);
    }

    let result = event_loop::run(&mut state, &mut screen);
    if let Err(e) = &result {
        error!("Event loop stopped: {}", e);
    }
    state.shutdown();
    result
}
