//! Logger setup.
//!
//! `env_logger` is the only backend; everything else logs through the `log`
//! macros. The configured level applies to every target and `RUST_LOG` may
//! refine it per module.

use std::fs::OpenOptions;
use std::io::Write;

use chrono::Local;
use log::Level;

use crate::configuration::{Config, LogFormat};
use crate::error_handling::types::ConfigError;

/// Renders one log line (without the trailing newline).
pub fn render_line(
    format: LogFormat,
    timestamp: &str,
    target: &str,
    level: Level,
    message: &str,
) -> String {
    match format {
        LogFormat::Simple => format!("{} - {}", level, message),
        LogFormat::Detailed => format!("{} - {} - {} - {}", timestamp, target, level, message),
        LogFormat::Json => serde_json::json!({
            "timestamp": timestamp,
            "logger": target,
            "level": level.as_str(),
            "message": message,
        })
        .to_string(),
    }
}

/// Installs the global logger. Must be called once, before any other module logs.
pub fn init_logging(config: &Config) -> Result<(), ConfigError> {
    let format = config.log_format;
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(config.level_filter()?)
        .parse_default_env()
        .format(move |buf, record| {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let line = render_line(
                format,
                &timestamp,
                record.target(),
                record.level(),
                &record.args().to_string(),
            );
            writeln!(buf, "{}", line)
        });

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| ConfigError::LoggingInit(e.to_string()))
}
