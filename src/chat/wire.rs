//! Datagram format for the multicast session.
//!
//! Each UDP datagram carries one JSON object tagged by `kind`:
//!
//! ```text
//! {"kind":"chat","sender":"<uuid>","nickname":"sean","channel":"#mchat","body":"hi"}
//! {"kind":"presence","sender":"<uuid>","nickname":"sean","channel":"#mchat"}
//! ```
//!
//! `channel` is `null` in a presence datagram from a peer that has not joined.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ChatError, MAX_MESSAGE_SIZE};

/// Upper bound on an encoded datagram (body plus envelope).
pub const MAX_DATAGRAM_SIZE: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Packet {
    Chat {
        sender: Uuid,
        nickname: String,
        channel: String,
        body: String,
    },
    Presence {
        sender: Uuid,
        nickname: String,
        channel: Option<String>,
    },
}

impl Packet {
    pub fn sender(&self) -> Uuid {
        match self {
            Packet::Chat { sender, .. } | Packet::Presence { sender, .. } => *sender,
        }
    }

    pub fn nickname(&self) -> &str {
        match self {
            Packet::Chat { nickname, .. } | Packet::Presence { nickname, .. } => nickname,
        }
    }

    /// The channel the sender is in, if any.
    pub fn channel(&self) -> Option<&str> {
        match self {
            Packet::Chat { channel, .. } => Some(channel),
            Packet::Presence { channel, .. } => channel.as_deref(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, ChatError> {
        if let Packet::Chat { body, .. } = self
            && body.len() >= MAX_MESSAGE_SIZE
        {
            return Err(ChatError::MessageTooLong);
        }
        let bytes = serde_json::to_vec(self)?;
        if bytes.len() > MAX_DATAGRAM_SIZE {
            return Err(ChatError::MessageTooLong);
        }
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ChatError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
