use std::sync::Arc;

use appat::capture_log::{CaptureLog, FileSink};
use appat::configuration::config::Config;
use appat::network::supervisor::ListenerSupervisor;
use log::{error, info};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    println!(
        "
 █████╗ ██████╗ ██████╗  █████╗ ████████╗
██╔══██╗██╔══██╗██╔══██╗██╔══██╗╚══██╔══╝
███████║██████╔╝██████╔╝███████║   ██║
██╔══██║██╔═══╝ ██╔═══╝ ██╔══██║   ██║
██║  ██║██║     ██║     ██║  ██║   ██║
╚═╝  ╚═╝╚═╝     ╚═╝     ╚═╝  ╚═╝   ╚═╝
=========================================
 XXE out-of-band exfiltration listener
=========================================
"
    );

    let config = Config::from_args();

    if let Err(e) = config.validate() {
        error!("[-] {}", e);
        std::process::exit(1);
    }

    let sink = FileSink::create(&config.log_file).unwrap_or_else(|e| {
        error!(
            "[-] Unable to open capture log {}: {}",
            config.log_file.display(),
            e
        );
        std::process::exit(1);
    });
    let log = Arc::new(CaptureLog::new(Arc::new(sink)));

    info!(
        "[WEB] Starting webserver on 0.0.0.0:{}...",
        config.http_port
    );
    info!("[FTP] Starting FTP server on 0.0.0.0:{}...", config.ftp_port);

    let supervisor = match ListenerSupervisor::bind(&config, log).await {
        Ok(s) => s,
        Err(e) => {
            error!("[-] {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = supervisor.run().await {
        error!("[-] Supervisor error: {}", e);
        std::process::exit(1);
    }

    info!("[+] Server shutting down.");
}
