use crate::data_source::{BankData, DataSource};
use crate::error_handling::types::SessionError;
use crate::session_management::consent_process::{ConsentProcess, ConsentTiming};
use crate::session_management::session::Session;
use crate::session_management::session_store::SessionStore;
use crate::SessionStatus;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// What a status poll can learn about a session.
///
/// An expired session is indistinguishable from one that never existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReport {
    NotFound,
    Pending,
    Ready,
    Denied,
}

impl From<SessionStatus> for StatusReport {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Pending => StatusReport::Pending,
            SessionStatus::Ready => StatusReport::Ready,
            SessionStatus::Denied => StatusReport::Denied,
            SessionStatus::Expired => StatusReport::NotFound,
        }
    }
}

/// The structure related to session management
///
/// This structure is the entry point of the web layer: it opens sessions,
/// starts their consent process and answers status and data queries.
///
/// # Fields Overview
///
/// - `store`: the shared session store
/// - `data_source`: the bank oracle, consulted before a session is opened
/// - `consent`: spawns one consent task per created session
pub struct SessionManager {
    store: Arc<SessionStore>,
    data_source: Arc<dyn DataSource>,
    consent: ConsentProcess,
}

impl SessionManager {
    pub fn new(
        store: Arc<SessionStore>,
        data_source: Arc<dyn DataSource>,
        timing: ConsentTiming,
    ) -> Self {
        let consent = ConsentProcess::new(store.clone(), data_source.clone(), timing);
        Self {
            store,
            data_source,
            consent,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Opens a session for `psn` and starts its consent process.
    ///
    /// Any session previously opened for the PSN is expired. Fails with
    /// [`SessionError::NoData`] when the bank knows nothing about the PSN.
    pub fn request_data(&self, psn: &str) -> Result<Session, SessionError> {
        if !self.data_source.has_data(psn) {
            debug!("No data available for PSN {}", psn);
            return Err(SessionError::NoData);
        }

        let session = self.store.create_session(psn);
        // Outcome travels through the store, the handle is not needed.
        drop(self.consent.spawn(session.id.clone(), session.psn.clone()));
        Ok(session)
    }

    pub fn session_status(&self, session_id: &str) -> StatusReport {
        self.store
            .get_session(session_id)
            .map_or(StatusReport::NotFound, |session| session.status.into())
    }

    /// Returns the payload of a ready session opened for `psn`.
    ///
    /// A session opened for another PSN is `PsnMismatch`; the web layer
    /// reports it like an unknown id.
    pub fn session_data(&self, psn: &str, session_id: &str) -> Result<BankData, SessionError> {
        let session = match self.store.get_session_for_psn_and_id(psn, session_id) {
            Some(session) => session,
            None if self.store.get_session(session_id).is_some() => {
                return Err(SessionError::PsnMismatch)
            }
            None => return Err(SessionError::NotFound),
        };

        match session.status {
            SessionStatus::Ready => session.data.ok_or(SessionError::NotReady),
            SessionStatus::Expired => Err(SessionError::AlreadyExpired),
            SessionStatus::Pending | SessionStatus::Denied => Err(SessionError::NotReady),
        }
    }

    pub fn cleanup_expired_sessions(&self) -> usize {
        self.store.cleanup_expired()
    }

    /// Periodically purges expired sessions until the runtime shuts down.
    pub fn spawn_cleanup_task(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let removed = manager.cleanup_expired_sessions();
                if removed > 0 {
                    info!("Cleanup pass removed {} session(s)", removed);
                }
            }
        })
    }
}
