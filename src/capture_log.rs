pub mod recorder;
pub mod sink;
pub mod types;

pub use recorder::CaptureLog;
pub use sink::{CaptureSink, FileSink};
pub use types::{Direction, ExfiltrationEvent, Protocol};
