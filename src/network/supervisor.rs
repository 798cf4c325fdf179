//! # Listener Supervisor
//!
//! Owns process-wide startup and shutdown for the listener pair. The
//! supervisor binds the HTTP bait responder and the fake FTP responder on
//! all interfaces, renders the bait payload exactly once, then accepts
//! connections on both listeners concurrently, spawning one task per
//! connection.
//!
//! ```text
//! ┌──────────────┐   accept    ┌────────────────────┐   spawn   ┌───────────────┐
//! │ :8888 (HTTP) │────────────▶│ ListenerSupervisor │──────────▶│ BaitResponder │
//! │ :2121 (FTP)  │────────────▶│                    │──────────▶│ FtpResponder  │
//! └──────────────┘             └────────────────────┘           └───────────────┘
//!                                        │ shared
//!                                        ▼
//!                                  ┌────────────┐
//!                                  │ CaptureLog │
//!                                  └────────────┘
//! ```
//!
//! No work happens on the accept path beyond dispatch; a blocked or slow
//! client on one connection never stalls the others. On operator interrupt
//! the supervisor stops accepting and gives in-flight connections one read
//! timeout to finish before returning.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::net::TcpListener;
use tokio::task::JoinSet;

use crate::capture_log::CaptureLog;
use crate::configuration::config::Config;
use crate::error_handling::types::NetworkError;
use crate::responders::{BaitPayload, BaitResponder, FtpResponder};

pub struct ListenerSupervisor {
    http_listener: TcpListener,
    ftp_listener: TcpListener,
    http_responder: Arc<BaitResponder>,
    ftp_responder: Arc<FtpResponder>,
    read_timeout: Duration,
}

impl ListenerSupervisor {
    /// Binds both listeners and renders the bait payload.
    ///
    /// A bind failure is fatal and names the failing port: a half-started
    /// listener pair is useless, since an XXE target needs both channels to
    /// complete its round trip.
    pub async fn bind(config: &Config, log: Arc<CaptureLog>) -> Result<Self, NetworkError> {
        // Substituted once, immutable for the process lifetime.
        let payload = Arc::new(BaitPayload::render(
            config.callback_host.trim(),
            config.ftp_port,
        ));

        let http_listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.http_port))
            .await
            .map_err(|e| NetworkError::BindFail(config.http_port, e))?;
        let ftp_listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.ftp_port))
            .await
            .map_err(|e| NetworkError::BindFail(config.ftp_port, e))?;

        Ok(Self {
            http_listener,
            ftp_listener,
            http_responder: Arc::new(BaitResponder::new(payload, Arc::clone(&log))),
            ftp_responder: Arc::new(FtpResponder::with_timeout(log, config.read_timeout())),
            read_timeout: config.read_timeout(),
        })
    }

    /// Actual bound address of the HTTP listener.
    pub fn http_addr(&self) -> std::io::Result<SocketAddr> {
        self.http_listener.local_addr()
    }

    /// Actual bound address of the FTP listener.
    pub fn ftp_addr(&self) -> std::io::Result<SocketAddr> {
        self.ftp_listener.local_addr()
    }

    /// Accepts connections on both listeners until an operator interrupt.
    ///
    /// Accept errors are transient (per-connection) and only logged; the
    /// loop itself runs until Ctrl-C. After the interrupt, in-flight
    /// connection tasks get one read timeout's worth of grace to finish.
    pub async fn run(self) -> Result<(), NetworkError> {
        if let Ok(addr) = self.http_addr() {
            info!("[WEB] Listening on {}", addr);
        }
        if let Ok(addr) = self.ftp_addr() {
            info!("[FTP] Listening on {}", addr);
        }

        let mut connections: JoinSet<()> = JoinSet::new();
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                res = self.http_listener.accept() => match res {
                    Ok((stream, peer_addr)) => {
                        let responder = Arc::clone(&self.http_responder);
                        connections.spawn(async move {
                            responder.handle(stream, peer_addr).await;
                        });
                    }
                    Err(e) => warn!("[WEB] accept failed: {}", e),
                },
                res = self.ftp_listener.accept() => match res {
                    Ok((stream, peer_addr)) => {
                        let responder = Arc::clone(&self.ftp_responder);
                        connections.spawn(async move {
                            responder.handle(stream, peer_addr).await;
                        });
                    }
                    Err(e) => warn!("[FTP] accept failed: {}", e),
                },
                // Reap finished connection tasks so the set stays small.
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                _ = &mut shutdown => {
                    info!("Interrupt received, no longer accepting connections");
                    break;
                }
            }
        }

        // Listeners drop here; give in-flight connections their timeout to
        // finish naturally instead of aborting mid-read.
        drop(self.http_listener);
        drop(self.ftp_listener);
        if !connections.is_empty() {
            info!("Waiting for {} in-flight connection(s)", connections.len());
            let drain = async {
                while connections.join_next().await.is_some() {}
            };
            if tokio::time::timeout(self.read_timeout + Duration::from_secs(1), drain)
                .await
                .is_err()
            {
                warn!("In-flight connections did not finish in time, shutting down anyway");
            }
        }

        Ok(())
    }
}
