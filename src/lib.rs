pub mod capture_log;
pub use capture_log::*;

pub mod configuration;
pub use configuration::*;

pub mod error_handling;

pub mod network;
pub use network::*;

pub mod responders;
pub use responders::*;
