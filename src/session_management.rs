//! Session management core module.
//!
//! This module owns the lifecycle of data request sessions: the status model,
//! the store enforcing one live session per PSN, the background consent
//! process and the manager that ties them together for the web layer.

use serde::Serialize;
use std::fmt;

/// Submodule for the background consent simulation.
pub mod consent_process;
/// Submodule for session data structures and identifiers.
pub mod session;
/// Submodule for the service facade used by the web layer.
pub mod session_manager;
/// Submodule for the concurrency-safe session store.
pub mod session_store;
#[cfg(test)]
mod tests;

/// Represents the current status of a session.
///
/// Variants:
/// - `Pending`: consent or data retrieval is still in progress.
/// - `Ready`: data is available for download.
/// - `Expired`: superseded, out of ttl, or no data after consent.
/// - `Denied`: the citizen refused consent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    Pending,
    Ready,
    Expired,
    Denied,
}

impl SessionStatus {
    /// Whether the consent process may still write an outcome.
    ///
    /// Only `Pending` sessions accept updates; every other status is final
    /// apart from the time-driven move to `Expired`.
    pub fn accepts_update(self) -> bool {
        matches!(self, SessionStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Pending => "PENDING",
            SessionStatus::Ready => "READY",
            SessionStatus::Expired => "EXPIRED",
            SessionStatus::Denied => "DENIED",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
