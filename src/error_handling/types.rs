use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    InvalidLogLevel(String),
    NotInRange(String),
    LoggingInit(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::InvalidLogLevel(e) => write!(f, "Invalid log level: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
            ConfigError::LoggingInit(e) => write!(f, "Logger initialization failed: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

/// Negative outcomes of a session lookup or data request.
///
/// None of these are fatal: the web layer turns every one of them into a
/// 4xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No session is stored under the given id.
    NotFound,
    /// The session exists but was opened for another PSN.
    PsnMismatch,
    /// The session matches but its status is not `Ready` yet (or was denied).
    NotReady,
    /// The session was superseded or outlived its ttl.
    AlreadyExpired,
    /// The data source holds nothing for this PSN, so no session is opened.
    NoData,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotFound => write!(f, "Session not found"),
            SessionError::PsnMismatch => write!(f, "Session belongs to another PSN"),
            SessionError::NotReady => write!(f, "Session not ready"),
            SessionError::AlreadyExpired => write!(f, "Session expired"),
            SessionError::NoData => write!(f, "No data available for this citizen"),
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Debug)]
pub enum DataSourceError {
    Unavailable(String),
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::Unavailable(e) => write!(f, "Data source unavailable: {}", e),
        }
    }
}

impl std::error::Error for DataSourceError {}

#[derive(Debug)]
pub enum WebError {
    InvalidAddress(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::InvalidAddress(e) => write!(f, "Invalid listen address: {}", e),
        }
    }
}

impl std::error::Error for WebError {}

#[derive(Debug)]
pub enum ControllerError {
    ConfigurationError(ConfigError),
    WebError(WebError),
    SignalError(String),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ConfigurationError(e) => write!(f, "Configuration error: {}", e),
            ControllerError::WebError(e) => write!(f, "Web server error: {}", e),
            ControllerError::SignalError(e) => write!(f, "Signal handling error: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<ConfigError> for ControllerError {
    fn from(err: ConfigError) -> Self {
        ControllerError::ConfigurationError(err)
    }
}

impl From<WebError> for ControllerError {
    fn from(err: WebError) -> Self {
        ControllerError::WebError(err)
    }
}
