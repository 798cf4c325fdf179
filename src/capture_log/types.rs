//! Common data types used across the capture_log subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::net::SocketAddr;
use uuid::Uuid;

/// Which of the two bait endpoints produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    Http,
    Ftp,
}

impl Protocol {
    /// Short tag used in log lines, matching the operator-facing console output.
    pub fn tag(&self) -> &'static str {
        match self {
            Protocol::Http => "WEB",
            Protocol::Ftp => "FTP",
        }
    }
}

/// Direction of a captured chunk relative to this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Bytes received from the peer (commands, or exfiltrated content).
    Received,
    /// Bytes we wrote back to the peer.
    Sent,
}

impl Direction {
    pub fn tag(&self) -> &'static str {
        match self {
            Direction::Received => "RECV",
            Direction::Sent => "SENT",
        }
    }
}

/// One record per meaningful network interaction.
///
/// Created the instant bytes cross the wire on an accepted connection and
/// immutable afterwards. Both inbound commands and outbound responses are
/// recorded so an analyst can reconstruct the full transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExfiltrationEvent {
    /// Correlates all events of one connection.
    pub session_id: Uuid,
    pub peer_addr: SocketAddr,
    pub protocol: Protocol,
    pub direction: Direction,
    pub timestamp: DateTime<Utc>,
    /// Raw bytes as seen on the wire (may be empty).
    pub payload: Vec<u8>,
}

impl ExfiltrationEvent {
    pub fn received(session_id: Uuid, peer_addr: SocketAddr, protocol: Protocol, payload: &[u8]) -> Self {
        Self {
            session_id,
            peer_addr,
            protocol,
            direction: Direction::Received,
            timestamp: Utc::now(),
            payload: payload.to_vec(),
        }
    }

    pub fn sent(session_id: Uuid, peer_addr: SocketAddr, protocol: Protocol, payload: &[u8]) -> Self {
        Self {
            session_id,
            peer_addr,
            protocol,
            direction: Direction::Sent,
            timestamp: Utc::now(),
            payload: payload.to_vec(),
        }
    }

    /// Payload rendered for human-readable output.
    pub fn payload_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}
