use super::types::*;
use crate::error_handling::types::ConfigError;
use crate::session_management::consent_process::ConsentTiming;
use clap::Parser;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_SESSION_TTL_MINUTES: u64 = 30;
pub const MAX_SESSION_TTL_MINUTES: u64 = 525_600;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECONDS: u64 = 60;
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: usize = 10;
pub const DEFAULT_CONSENT_DELAY_MS: u64 = 2000;
pub const DEFAULT_SLOW_PROCESSING_DELAY_MS: u64 = 5000;
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Application configuration structure that defines all runtime parameters.
///
/// Values come either from the command line (each flag also reads an
/// environment variable) or, when `--config <FILE>` is given, from a TOML
/// file in which every key is optional.
///
/// # Examples
///
/// ```no_run
/// use bankdata::configuration::Config;
///
/// let config = Config::load().expect("valid configuration");
/// println!("Listening on {}:{}", config.host, config.port);
/// ```
///
/// # Fields Overview
///
/// - `host`, `port`: where the HTTP API listens
/// - `log_level`, `log_format`, `log_file`: logger setup
/// - `session_ttl_minutes`: lifetime of a data request session
/// - `rate_limit_window_seconds`, `rate_limit_max_requests`: status polling limits
/// - `consent_delay_ms`, `slow_processing_delay_ms`: simulated consent latencies
/// - `cleanup_interval_secs`: period of the expired session sweep
#[derive(Parser, Deserialize, Debug, Clone, PartialEq)]
#[command(name = "bankdata")]
#[command(about = "Bank Data API: consent-gated access to citizen banking data")]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// TOML configuration file; replaces all other flags when given
    #[arg(long = "config", env = "BANKDATA_CONFIG")]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Log level (error, warn, info, debug, trace); refined by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Detailed)]
    pub log_format: LogFormat,

    /// Append logs to this file instead of stderr
    #[arg(long, env = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Lifetime of a session in minutes
    #[arg(long, env = "SESSION_TTL_MINUTES", default_value_t = DEFAULT_SESSION_TTL_MINUTES)]
    pub session_ttl_minutes: u64,

    #[arg(long, env = "RATE_LIMIT_WINDOW_SECONDS", default_value_t = DEFAULT_RATE_LIMIT_WINDOW_SECONDS)]
    pub rate_limit_window_seconds: u64,

    /// Status polls accepted per session within one window
    #[arg(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = DEFAULT_RATE_LIMIT_MAX_REQUESTS)]
    pub rate_limit_max_requests: usize,

    #[arg(long, env = "CONSENT_DELAY_MS", default_value_t = DEFAULT_CONSENT_DELAY_MS)]
    pub consent_delay_ms: u64,

    #[arg(long, env = "SLOW_PROCESSING_DELAY_MS", default_value_t = DEFAULT_SLOW_PROCESSING_DELAY_MS)]
    pub slow_processing_delay_ms: u64,

    #[arg(long, env = "CLEANUP_INTERVAL_SECS", default_value_t = DEFAULT_CLEANUP_INTERVAL_SECS)]
    pub cleanup_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_file: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::default(),
            log_file: None,
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
            rate_limit_window_seconds: DEFAULT_RATE_LIMIT_WINDOW_SECONDS,
            rate_limit_max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            consent_delay_ms: DEFAULT_CONSENT_DELAY_MS,
            slow_processing_delay_ms: DEFAULT_SLOW_PROCESSING_DELAY_MS,
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Builds the configuration from the process arguments and environment,
    /// switching to the TOML file when `--config` is present.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the file cannot be read or parsed, or if a
    /// value fails validation. Invalid command-line arguments make clap print
    /// its usage and exit.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::parse();
        match config.config_file {
            Some(ref path) => Config::from_file(path),
            None => {
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Reads and validates a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        config.config_file = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level_filter()?;

        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&self.session_ttl_minutes) {
            return Err(ConfigError::NotInRange(format!(
                "session_ttl_minutes must be between 1 and {}",
                MAX_SESSION_TTL_MINUTES
            )));
        }
        if self.rate_limit_window_seconds == 0 {
            return Err(ConfigError::NotInRange(
                "rate_limit_window_seconds must be at least 1".to_string(),
            ));
        }
        if self.rate_limit_max_requests == 0 {
            return Err(ConfigError::NotInRange(
                "rate_limit_max_requests must be at least 1".to_string(),
            ));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::NotInRange(
                "cleanup_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        let minutes = self.session_ttl_minutes.min(MAX_SESSION_TTL_MINUTES);
        chrono::Duration::minutes(minutes as i64)
    }

    pub fn consent_timing(&self) -> ConsentTiming {
        ConsentTiming {
            consent_delay: Duration::from_millis(self.consent_delay_ms),
            slow_processing_delay: Duration::from_millis(self.slow_processing_delay_ms),
        }
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_seconds)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}
