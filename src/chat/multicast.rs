//! # Multicast Session
//!
//! LAN chat over UDP/IPv4 multicast. Every client joins the same group and
//! port; channels are a field in the datagram, not separate groups.
//!
//! ```text
//! UI thread                        tokio runtime
//! ─────────                        ─────────────
//! send() ── try_send_to ──────────▶ group:port
//!                                   receive task ── record() ──▶ peer table
//! poll_receive() ◀── mpsc ──────────────────────┘ (chat for our channel)
//!                                   heartbeat task ── presence every 5s
//! ```
//!
//! The UI thread never awaits: sends use the non-blocking `try_send_to` and
//! receipt is drained with `try_recv`.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::mpsc::{self, TrySendError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, warn};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::wire::{MAX_DATAGRAM_SIZE, Packet};
use super::{
    ChatError, ChatSession, InboundMessage, MAX_MESSAGE_SIZE, Peer, validate_channel,
    validate_nickname,
};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
/// Peers silent for this long (four missed heartbeats) are forgotten.
const PEER_TIMEOUT_SECS: i64 = 20;
/// Inbound chat lines waiting for the UI; more than this are dropped.
const INBOUND_QUEUE: usize = 256;

/// Where and as whom to open a session.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    pub group: Ipv4Addr,
    pub port: u16,
    pub default_channel: String,
    pub nickname: String,
}

/// State shared between the UI thread and the background tasks.
struct Shared {
    nickname: String,
    channel: Option<String>,
    peers: HashMap<Uuid, Peer>,
}

impl Shared {
    fn new(nickname: String) -> Self {
        Self {
            nickname,
            channel: None,
            peers: HashMap::new(),
        }
    }

    /// Update the peer table from a received packet and return the chat line
    /// to surface, if it belongs to our channel.
    fn record(
        &mut self,
        packet: Packet,
        source: IpAddr,
        own_id: Uuid,
        now: DateTime<Utc>,
    ) -> Option<InboundMessage> {
        if packet.sender() == own_id {
            return None;
        }
        self.expire(now);

        self.peers.insert(
            packet.sender(),
            Peer {
                nickname: packet.nickname().to_string(),
                channel: packet.channel().map(str::to_string),
                last_seen: now,
                source,
            },
        );

        match packet {
            Packet::Chat {
                nickname,
                channel,
                body,
                ..
            } if self.channel.as_deref() == Some(channel.as_str()) => {
                Some(InboundMessage { nickname, body })
            }
            _ => None,
        }
    }

    /// Drop peers not heard from within [`PEER_TIMEOUT_SECS`].
    fn expire(&mut self, now: DateTime<Utc>) {
        let timeout = TimeDelta::seconds(PEER_TIMEOUT_SECS);
        self.peers.retain(|id, peer| {
            let alive = now - peer.last_seen <= timeout;
            if !alive {
                debug!("Forgetting peer {} ({})", peer.nickname, id);
            }
            alive
        });
    }

    fn presence(&self, sender: Uuid) -> Packet {
        Packet::Presence {
            sender,
            nickname: self.nickname.clone(),
            channel: self.channel.clone(),
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct MulticastSession {
    id: Uuid,
    socket: Arc<UdpSocket>,
    destination: SocketAddr,
    default_channel: String,
    shared: Arc<Mutex<Shared>>,
    inbound: mpsc::Receiver<InboundMessage>,
    tasks: Vec<JoinHandle<()>>,
}

impl MulticastSession {
    /// Bind the group port, join the multicast group and start the background
    /// tasks. Must be called from inside a tokio runtime.
    pub fn open(config: &NetworkConfig) -> Result<Self, ChatError> {
        validate_nickname(&config.nickname)?;

        let std_socket =
            std::net::UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.port))?;
        std_socket.join_multicast_v4(&config.group, &Ipv4Addr::UNSPECIFIED)?;
        std_socket.set_multicast_loop_v4(true)?;
        std_socket.set_nonblocking(true)?;
        let socket = Arc::new(UdpSocket::from_std(std_socket)?);

        let id = Uuid::new_v4();
        let destination = SocketAddr::V4(SocketAddrV4::new(config.group, config.port));
        let shared = Arc::new(Mutex::new(Shared::new(config.nickname.clone())));
        let (tx, inbound) = mpsc::sync_channel(INBOUND_QUEUE);

        let tasks = vec![
            tokio::spawn(receive_loop(socket.clone(), shared.clone(), id, tx)),
            tokio::spawn(heartbeat_loop(socket.clone(), shared.clone(), id, destination)),
        ];

        info!(
            "Opened multicast session {} on {} as {}",
            id, destination, config.nickname
        );

        Ok(Self {
            id,
            socket,
            destination,
            default_channel: config.default_channel.clone(),
            shared,
            inbound,
            tasks,
        })
    }

    fn transmit(&self, packet: &Packet) -> Result<(), ChatError> {
        let bytes = packet.encode()?;
        self.socket.try_send_to(&bytes, self.destination)?;
        Ok(())
    }
}

impl ChatSession for MulticastSession {
    fn send(&mut self, text: &str) -> Result<(), ChatError> {
        if text.len() >= MAX_MESSAGE_SIZE {
            return Err(ChatError::MessageTooLong);
        }
        let packet = {
            let shared = lock(&self.shared);
            let channel = shared.channel.clone().ok_or(ChatError::NotConnected)?;
            Packet::Chat {
                sender: self.id,
                nickname: shared.nickname.clone(),
                channel,
                body: text.to_string(),
            }
        };
        self.transmit(&packet)
    }

    fn poll_receive(&mut self) -> Option<InboundMessage> {
        self.inbound.try_recv().ok()
    }

    fn nickname(&self) -> String {
        lock(&self.shared).nickname.clone()
    }

    fn set_nickname(&mut self, nickname: &str) -> Result<(), ChatError> {
        validate_nickname(nickname)?;
        lock(&self.shared).nickname = nickname.to_string();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        lock(&self.shared).channel.is_some()
    }

    fn channel(&self) -> Option<String> {
        lock(&self.shared).channel.clone()
    }

    fn connect(&mut self, channel: Option<&str>) -> Result<(), ChatError> {
        let channel = channel.unwrap_or(self.default_channel.as_str()).to_string();
        validate_channel(&channel)?;

        let announce = {
            let mut shared = lock(&self.shared);
            if let Some(current) = &shared.channel {
                return Err(ChatError::AlreadyConnected(current.clone()));
            }
            shared.channel = Some(channel.clone());
            shared.presence(self.id)
        };

        if let Err(e) = self.transmit(&announce) {
            lock(&self.shared).channel = None;
            return Err(e);
        }
        info!("Joined {}", channel);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ChatError> {
        let announce = {
            let mut shared = lock(&self.shared);
            let left = shared.channel.take().ok_or(ChatError::NotConnected)?;
            info!("Left {}", left);
            shared.presence(self.id)
        };
        if let Err(e) = self.transmit(&announce) {
            warn!("Failed to announce disconnect: {}", e);
        }
        Ok(())
    }

    fn peers(&self) -> Vec<Peer> {
        let mut shared = lock(&self.shared);
        shared.expire(Utc::now());
        let mut peers: Vec<Peer> = shared.peers.values().cloned().collect();
        drop(shared);
        peers.sort_by(|a, b| a.nickname.cmp(&b.nickname));
        peers
    }

    fn close(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        info!("Closed multicast session {}", self.id);
    }
}

impl Drop for MulticastSession {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

async fn receive_loop(
    socket: Arc<UdpSocket>,
    shared: Arc<Mutex<Shared>>,
    own_id: Uuid,
    tx: mpsc::SyncSender<InboundMessage>,
) {
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
    loop {
        let (len, from) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                warn!("Multicast receive failed: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };

        let packet = match Packet::decode(&buf[..len]) {
            Ok(packet) => packet,
            Err(e) => {
                debug!("Dropping malformed datagram from {}: {}", from, e);
                continue;
            }
        };

        let inbound = lock(&shared).record(packet, from.ip(), own_id, Utc::now());
        let Some(message) = inbound else { continue };
        match tx.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => {
                warn!("Inbound queue full, dropping line from {}", message.nickname);
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("Inbound receiver dropped, stopping receive task");
                return;
            }
        }
    }
}

async fn heartbeat_loop(
    socket: Arc<UdpSocket>,
    shared: Arc<Mutex<Shared>>,
    own_id: Uuid,
    destination: SocketAddr,
) {
    let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);
    loop {
        interval.tick().await;
        let packet = lock(&shared).presence(own_id);
        match packet.encode() {
            Ok(bytes) => {
                if let Err(e) = socket.send_to(&bytes, destination).await {
                    warn!("Presence heartbeat failed: {}", e);
                }
            }
            Err(e) => warn!("Could not encode presence: {}", e),
        }
    }
}
