pub mod ftp;
pub mod http;
pub mod payload;

pub use ftp::{FtpCommand, FtpResponder, FtpSession};
pub use http::BaitResponder;
pub use payload::BaitPayload;
