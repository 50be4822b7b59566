//! Data Source Trait
//!
//! Implementors answer four questions about a PSN. All methods take `&self`
//! and implementors must be safe to call from many consent tasks at once.

use crate::data_source::types::BankData;
use crate::error_handling::types::DataSourceError;

/// Read-only oracle consulted by the consent process.
pub trait DataSource: Send + Sync {
    /// Whether the bank knows anything about this PSN.
    fn has_data(&self, psn: &str) -> bool;

    /// Whether the citizen is going to refuse consent.
    fn will_deny_consent(&self, psn: &str) -> bool;

    /// Whether retrieval for this PSN takes the slow path.
    fn requires_slow_processing(&self, psn: &str) -> bool;

    /// Fetches the payload. `Ok(None)` means nothing is available.
    fn fetch_data(&self, psn: &str) -> Result<Option<BankData>, DataSourceError>;
}
