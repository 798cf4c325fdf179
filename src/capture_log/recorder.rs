//! Connection log facade shared by all connection tasks.
//!
//! `CaptureLog` is the single write path for exfiltration events: every chunk
//! received from or sent to a peer goes through [`CaptureLog::record`], which
//! echoes a human-readable line to the operator console and appends the event
//! to the configured [`CaptureSink`].
//!
//! Losing a log entry must never abort an active exfiltration capture, so
//! `record` never fails the caller: a sink write failure is reported on the
//! diagnostic channel and otherwise swallowed.

use std::sync::Arc;

use log::{error, info};

use super::sink::CaptureSink;
use super::types::{Direction, ExfiltrationEvent};

pub struct CaptureLog {
    sink: Arc<dyn CaptureSink>,
}

impl CaptureLog {
    pub fn new(sink: Arc<dyn CaptureSink>) -> Self {
        Self { sink }
    }

    /// Appends an event to the sink and echoes it to the console.
    ///
    /// Entries appear in the order `record` was called; the sink serializes
    /// concurrent appends so entries from different connections may
    /// interleave but are never corrupted mid-write.
    pub fn record(&self, event: ExfiltrationEvent) {
        let verb = match event.direction {
            Direction::Received => "received",
            Direction::Sent => "sent",
        };
        info!(
            "[{}] {} {} {} byte(s): {}",
            event.protocol.tag(),
            event.peer_addr,
            verb,
            event.payload.len(),
            event.payload_lossy()
        );

        if let Err(e) = self.sink.append(&event) {
            error!("Dropping capture log entry for {}: {}", event.peer_addr, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture_log::sink::MemSink;
    use crate::capture_log::types::Protocol;
    use crate::error_handling::types::LogError;
    use std::net::SocketAddr;
    use uuid::Uuid;

    struct FailSink;

    impl CaptureSink for FailSink {
        fn append(&self, _event: &ExfiltrationEvent) -> Result<(), LogError> {
            Err(LogError::WriteFailed(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }
    }

    fn peer() -> SocketAddr {
        "203.0.113.9:51515".parse().unwrap()
    }

    #[test]
    fn test_record_preserves_order() {
        let sink = Arc::new(MemSink::new());
        let log = CaptureLog::new(sink.clone());
        let id = Uuid::new_v4();

        log.record(ExfiltrationEvent::received(id, peer(), Protocol::Ftp, b"first"));
        log.record(ExfiltrationEvent::received(id, peer(), Protocol::Ftp, b"second"));

        let events = sink.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].payload, b"first");
        assert_eq!(events[1].payload, b"second");
    }

    #[test]
    fn test_record_never_fails_on_sink_error() {
        let log = CaptureLog::new(Arc::new(FailSink));
        // Must not panic or propagate; the entry is reported and dropped.
        log.record(ExfiltrationEvent::received(
            Uuid::new_v4(),
            peer(),
            Protocol::Http,
            b"GET /",
        ));
    }
}
