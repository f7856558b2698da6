//! # Event Loop
//!
//! One iteration, single-threaded:
//!
//! ```text
//! ┌─▶ poll one keystroke (≤100ms) ──▶ editor / dispatcher / status
//! │   poll one inbound message    ──▶ transcript
//! │   repaint all regions
//! └── while state.running
//! ```
//!
//! The loop itself never fails on user input; only terminal I/O errors
//! escape, and they end the program.

use std::io;
use std::time::Duration;

use log::info;

use super::screen::Screen;
use super::state::UiState;

/// How long one iteration waits for a keystroke.
pub const KEY_POLL: Duration = Duration::from_millis(100);

/// Drive `state` until a command clears `running`.
pub fn run(state: &mut UiState, screen: &mut dyn Screen) -> io::Result<()> {
    info!("Event loop started");
    screen.draw(state)?;
    while state.running {
        step(state, screen)?;
    }
    info!("Event loop finished");
    Ok(())
}

/// A single iteration.
pub fn step(state: &mut UiState, screen: &mut dyn Screen) -> io::Result<()> {
    if let Some(key) = screen.poll_key(KEY_POLL)? {
        state.handle_key(key, screen)?;
    }
    state.poll_inbound();
    screen.draw(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::InboundMessage;
    use crate::core::screen::Keystroke;
    use crate::test_support::{ScriptedScreen, test_state, transcript_text};

    fn keys(text: &str) -> Vec<Option<Keystroke>> {
        let mut keys: Vec<Option<Keystroke>> =
            text.chars().map(|c| Some(Keystroke::Char(c))).collect();
        keys.push(Some(Keystroke::Enter));
        keys
    }

    #[test]
    fn test_quit_ends_loop() {
        let (mut state, _) = test_state();
        let mut screen = ScriptedScreen::new(keys("\\quit"));

        run(&mut state, &mut screen).unwrap();

        assert!(!state.running);
        // initial frame plus one per iteration
        assert_eq!(screen.frames, 1 + "\\quit".len() + 1);
    }

    #[test]
    fn test_idle_iteration_delivers_inbound() {
        let (mut state, chat) = test_state();
        chat.borrow_mut().inbound.push_back(InboundMessage {
            nickname: "ana".into(),
            body: "ping".into(),
        });
        let mut screen = ScriptedScreen::new(vec![None]);

        step(&mut state, &mut screen).unwrap();

        assert!(transcript_text(&state).contains("ana: ping"));
        assert_eq!(screen.frames, 1);
    }

    #[test]
    fn test_terminal_error_escapes() {
        let (mut state, _) = test_state();
        let mut screen = ScriptedScreen::new(vec![]);
        assert!(run(&mut state, &mut screen).is_err());
    }

    #[test]
    fn test_resize_from_modal_reaches_layout() {
        let (mut state, _) = test_state();
        let mut script = keys("\\list");
        script.push(Some(Keystroke::Resize));
        script.extend(keys("\\quit"));
        let mut screen = ScriptedScreen::new(script);
        screen.rows = 30;
        screen.cols = 100;

        run(&mut state, &mut screen).unwrap();

        assert_eq!(state.geometry.status.origin_row, 29);
        assert_eq!(state.geometry.input.width, 100);
    }
}
