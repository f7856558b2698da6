//! # Chat Session Boundary
//!
//! The UI engine never talks to the network directly. Everything it needs from
//! the chat/transport layer goes through the [`ChatSession`] trait: connect and
//! disconnect, send a line, poll for one inbound line, nickname and channel
//! queries, and the list of peers seen on the network.
//!
//! Implementations may receive in the background, but `poll_receive` must never
//! block: the event loop calls it once per iteration.
//!
//! [`MulticastSession`] is the bundled LAN implementation.

pub mod multicast;
pub mod wire;

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use multicast::{MulticastSession, NetworkConfig};

/// Largest message (including terminator) the protocol carries.
pub const MAX_MESSAGE_SIZE: usize = 512;
/// Longest nickname accepted by `set_nickname`.
pub const MAX_NICKNAME_SIZE: usize = 32;
/// Longest channel name accepted by `connect`.
pub const MAX_CHANNEL_NAME_SIZE: usize = 64;
/// Channel joined when `connect` is given no name.
pub const DEFAULT_CHANNEL: &str = "#mchat";

/// Errors reported by a chat session. None of them are fatal to the UI.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("not connected to a channel")]
    NotConnected,
    #[error("already connected to {0}")]
    AlreadyConnected(String),
    #[error("invalid nickname: {0}")]
    InvalidNickname(String),
    #[error("invalid channel name: {0}")]
    InvalidChannel(String),
    #[error("message exceeds {MAX_MESSAGE_SIZE} bytes")]
    MessageTooLong,
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A chat line received from another peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub nickname: String,
    pub body: String,
}

/// A peer observed on the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Peer {
    pub nickname: String,
    /// Channel the peer last announced (None if it is not in one)
    pub channel: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub source: IpAddr,
}

/// The chat/transport collaborator consumed by the UI engine.
///
/// Opening a session is the implementation's constructor; closing it is
/// [`ChatSession::close`].
pub trait ChatSession {
    /// Send a line to the joined channel.
    fn send(&mut self, text: &str) -> Result<(), ChatError>;

    /// Return at most one pending inbound message without blocking.
    fn poll_receive(&mut self) -> Option<InboundMessage>;

    fn nickname(&self) -> String;

    fn set_nickname(&mut self, nickname: &str) -> Result<(), ChatError>;

    fn is_connected(&self) -> bool;

    /// The joined channel, if connected.
    fn channel(&self) -> Option<String>;

    /// Join `channel`, or [`DEFAULT_CHANNEL`] when `None`.
    fn connect(&mut self, channel: Option<&str>) -> Result<(), ChatError>;

    fn disconnect(&mut self) -> Result<(), ChatError>;

    /// Snapshot of every peer seen so far.
    fn peers(&self) -> Vec<Peer>;

    /// Release the session. Further calls are not expected.
    fn close(&mut self);
}

/// Checks a nickname against the protocol limits.
pub fn validate_nickname(nickname: &str) -> Result<(), ChatError> {
    if nickname.is_empty() || nickname.len() > MAX_NICKNAME_SIZE {
        return Err(ChatError::InvalidNickname(nickname.to_string()));
    }
    Ok(())
}

/// Checks a channel name: leading `#`, bounded length, no whitespace.
pub fn validate_channel(channel: &str) -> Result<(), ChatError> {
    let valid = channel.starts_with('#')
        && channel.len() > 1
        && channel.len() <= MAX_CHANNEL_NAME_SIZE
        && !channel.chars().any(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(ChatError::InvalidChannel(channel.to_string()))
    }
}
