//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crate::chat::{
    ChatError, ChatSession, DEFAULT_CHANNEL, InboundMessage, Peer, validate_channel,
    validate_nickname,
};
use crate::core::config::ResolvedConfig;
use crate::core::modal::Modal;
use crate::core::screen::{Keystroke, Screen};
use crate::core::state::UiState;

/// What a [`FakeSession`] has been asked to do, and what it will answer.
#[derive(Debug, Default)]
pub struct FakeChat {
    pub nickname: String,
    pub channel: Option<String>,
    pub sent: Vec<String>,
    pub inbound: VecDeque<InboundMessage>,
    pub peers: Vec<Peer>,
    pub fail_connect: bool,
    pub closed: bool,
}

pub type FakeHandle = Rc<RefCell<FakeChat>>;

/// An in-memory chat session. Tests keep the handle to inspect it.
pub struct FakeSession(FakeHandle);

impl ChatSession for FakeSession {
    fn send(&mut self, text: &str) -> Result<(), ChatError> {
        let mut chat = self.0.borrow_mut();
        if chat.channel.is_none() {
            return Err(ChatError::NotConnected);
        }
        chat.sent.push(text.to_string());
        Ok(())
    }

    fn poll_receive(&mut self) -> Option<InboundMessage> {
        self.0.borrow_mut().inbound.pop_front()
    }

    fn nickname(&self) -> String {
        self.0.borrow().nickname.clone()
    }

    fn set_nickname(&mut self, nickname: &str) -> Result<(), ChatError> {
        validate_nickname(nickname)?;
        self.0.borrow_mut().nickname = nickname.to_string();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.0.borrow().channel.is_some()
    }

    fn channel(&self) -> Option<String> {
        self.0.borrow().channel.clone()
    }

    fn connect(&mut self, channel: Option<&str>) -> Result<(), ChatError> {
        let channel = channel.unwrap_or(DEFAULT_CHANNEL);
        validate_channel(channel)?;
        let mut chat = self.0.borrow_mut();
        if chat.fail_connect {
            return Err(ChatError::Io(io::Error::other("network unreachable")));
        }
        if let Some(current) = &chat.channel {
            return Err(ChatError::AlreadyConnected(current.clone()));
        }
        chat.channel = Some(channel.to_string());
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ChatError> {
        self.0
            .borrow_mut()
            .channel
            .take()
            .map(|_| ())
            .ok_or(ChatError::NotConnected)
    }

    fn peers(&self) -> Vec<Peer> {
        self.0.borrow().peers.clone()
    }

    fn close(&mut self) {
        self.0.borrow_mut().closed = true;
    }
}

/// A fresh fake session for `nickname` and the handle to inspect it.
pub fn fake_session(nickname: &str) -> (Box<dyn ChatSession>, FakeHandle) {
    let handle = Rc::new(RefCell::new(FakeChat {
        nickname: nickname.to_string(),
        ..Default::default()
    }));
    (Box::new(FakeSession(handle.clone())), handle)
}

/// A 24×80 state for nickname `tester` with default settings.
pub fn test_state() -> (UiState, FakeHandle) {
    let (session, handle) = fake_session("tester");
    let state = UiState::new(&ResolvedConfig::default(), session, 24, 80);
    (state, handle)
}

/// All transcript rows joined with newlines.
pub fn transcript_text(state: &UiState) -> String {
    state.transcript.surface().lines().collect::<Vec<_>>().join("\n")
}

/// A screen that replays a fixed key script and records what it was asked
/// to draw. Polling past the end of the script is an I/O error.
pub struct ScriptedScreen {
    keys: VecDeque<Option<Keystroke>>,
    pub rows: u16,
    pub cols: u16,
    pub frames: usize,
    pub modal_frames: Vec<Modal>,
}

impl ScriptedScreen {
    pub fn new(keys: Vec<Option<Keystroke>>) -> Self {
        Self {
            keys: keys.into(),
            rows: 24,
            cols: 80,
            frames: 0,
            modal_frames: Vec::new(),
        }
    }
}

impl Screen for ScriptedScreen {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.rows, self.cols))
    }

    fn poll_key(&mut self, _timeout: Duration) -> io::Result<Option<Keystroke>> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::other("key script exhausted"))
    }

    fn draw(&mut self, _state: &UiState) -> io::Result<()> {
        self.frames += 1;
        Ok(())
    }

    fn draw_modal(&mut self, _state: &UiState, modal: &Modal) -> io::Result<()> {
        self.modal_frames.push(modal.clone());
        Ok(())
    }
}
