use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    MissingCallbackHost(String),
    BadCallbackHost(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingCallbackHost(e) => write!(f, "Callback host error: {}", e),
            ConfigError::BadCallbackHost(e) => write!(f, "Callback host error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum LogError {
    OpenFailed(std::io::Error),
    WriteFailed(std::io::Error),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::OpenFailed(e) => write!(f, "Capture log open failed: {}", e),
            LogError::WriteFailed(e) => write!(f, "Capture log write failed: {}", e),
        }
    }
}

impl std::error::Error for LogError {}

#[derive(Debug)]
pub enum NetworkError {
    BindFail(u16, std::io::Error),
    AcceptFailed(std::io::Error),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::BindFail(port, e) => write!(f, "Bind failed on port {}: {}", port, e),
            NetworkError::AcceptFailed(e) => write!(f, "Accept failed: {}", e),
        }
    }
}

impl std::error::Error for NetworkError {}

#[derive(Debug)]
pub enum SupervisorError {
    Config(ConfigError),
    Network(NetworkError),
    Log(LogError),
}

impl fmt::Display for SupervisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupervisorError::Config(e) => write!(f, "Configuration error: {}", e),
            SupervisorError::Network(e) => write!(f, "Network error: {}", e),
            SupervisorError::Log(e) => write!(f, "Log error: {}", e),
        }
    }
}

impl std::error::Error for SupervisorError {}

impl From<ConfigError> for SupervisorError {
    fn from(err: ConfigError) -> Self {
        SupervisorError::Config(err)
    }
}

impl From<NetworkError> for SupervisorError {
    fn from(err: NetworkError) -> Self {
        SupervisorError::Network(err)
    }
}

impl From<LogError> for SupervisorError {
    fn from(err: LogError) -> Self {
        SupervisorError::Log(err)
    }
}
