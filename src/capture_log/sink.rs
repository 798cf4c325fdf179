use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::info;

use crate::error_handling::types::LogError;

use super::types::ExfiltrationEvent;

/// Persistence backend for exfiltration events.
///
/// Implementations must be safe for concurrent append from multiple
/// connection tasks; the provided [`FileSink`] serializes writes through a
/// mutex so interleaved entries are never corrupted mid-write.
pub trait CaptureSink: Send + Sync {
    fn append(&self, event: &ExfiltrationEvent) -> Result<(), LogError>;
}

/// Append-only, line-oriented capture file for operator triage.
///
/// One line per event: `timestamp | protocol | direction | peer | payload`.
/// Payloads are rendered lossy-UTF8; raw bytes stay available in memory on
/// the event itself for the duration of the session.
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(LogError::OpenFailed)?;
        info!("Capture log opened at {}", path.display());
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl CaptureSink for FileSink {
    fn append(&self, event: &ExfiltrationEvent) -> Result<(), LogError> {
        let line = format!(
            "{} | {} | {} | {} | {}\n",
            event.timestamp.to_rfc3339(),
            event.protocol.tag(),
            event.direction.tag(),
            event.peer_addr,
            event.payload_lossy()
        );
        let mut file = match self.file.lock() {
            Ok(f) => f,
            Err(poisoned) => poisoned.into_inner(),
        };
        file.write_all(line.as_bytes())
            .map_err(LogError::WriteFailed)
    }
}

#[cfg(test)]
pub(crate) struct MemSink {
    pub(crate) events: Mutex<Vec<ExfiltrationEvent>>,
}

#[cfg(test)]
impl MemSink {
    pub(crate) fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<ExfiltrationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl CaptureSink for MemSink {
    fn append(&self, event: &ExfiltrationEvent) -> Result<(), LogError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
