use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::screen::Keystroke;

/// Poll for one keystroke, waiting at most `timeout`.
pub fn poll_key(timeout: Duration) -> io::Result<Option<Keystroke>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(translate(event::read()?))
}

/// Map a crossterm event onto what the core understands. Mouse, focus and
/// paste events, and key releases, are dropped.
pub fn translate(event: Event) -> Option<Keystroke> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => translate_key(key),
        Event::Resize(_, _) => Some(Keystroke::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Keystroke> {
    log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Ctrl+J / Ctrl+M are LF / CR, Ctrl+H is the old backspace
        KeyCode::Char('j' | 'm') if ctrl => Some(Keystroke::Enter),
        KeyCode::Char('h') if ctrl => Some(Keystroke::Backspace),
        KeyCode::Char(c) if ctrl && c.is_ascii_alphabetic() => {
            Some(Keystroke::Char(char::from(c.to_ascii_lowercase() as u8 & 0x1f)))
        }
        KeyCode::Char(c) => Some(Keystroke::Char(c)),
        KeyCode::Backspace => Some(Keystroke::Backspace),
        KeyCode::Enter => Some(Keystroke::Enter),
        KeyCode::Tab => Some(Keystroke::Char('\t')),
        KeyCode::Esc => Some(Keystroke::Char('\u{1b}')),
        KeyCode::Modifier(_) | KeyCode::Null => None,
        code => Some(Keystroke::Other(code.to_string())),
    }
}
