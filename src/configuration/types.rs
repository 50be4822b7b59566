use clap::ValueEnum;
use serde::Deserialize;

/// Layout of each log line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `LEVEL - message`
    Simple,
    /// `timestamp - target - LEVEL - message`
    #[default]
    Detailed,
    /// One JSON object per line
    Json,
}
