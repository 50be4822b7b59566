//! Background consent simulation.
//!
//! One task is spawned per created session. It waits for the citizen's
//! consent, consults the [`DataSource`] and writes exactly one outcome back
//! through [`SessionStore::update_session_status`]. The task holds no other
//! link to the request that created the session.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::task::JoinHandle;

use crate::data_source::DataSource;
use crate::session_management::session::SessionId;
use crate::session_management::session_store::SessionStore;
use crate::SessionStatus;

/// Simulated latencies of the consent process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsentTiming {
    /// Time the citizen takes to answer the consent request.
    pub consent_delay: Duration,
    /// Extra time spent on PSNs flagged for slow processing.
    pub slow_processing_delay: Duration,
}

impl Default for ConsentTiming {
    fn default() -> Self {
        Self {
            consent_delay: Duration::from_secs(2),
            slow_processing_delay: Duration::from_secs(5),
        }
    }
}

#[derive(Clone)]
pub struct ConsentProcess {
    store: Arc<SessionStore>,
    data_source: Arc<dyn DataSource>,
    timing: ConsentTiming,
}

impl ConsentProcess {
    pub fn new(
        store: Arc<SessionStore>,
        data_source: Arc<dyn DataSource>,
        timing: ConsentTiming,
    ) -> Self {
        Self {
            store,
            data_source,
            timing,
        }
    }

    /// Starts the consent process for one session on the tokio runtime.
    ///
    /// The handle resolves to the status the task tried to write. Dropping it
    /// does not cancel the task.
    pub fn spawn(&self, session_id: SessionId, psn: String) -> JoinHandle<SessionStatus> {
        let process = self.clone();
        tokio::spawn(async move { process.run(&session_id, &psn).await })
    }

    pub async fn run(&self, session_id: &SessionId, psn: &str) -> SessionStatus {
        tokio::time::sleep(self.timing.consent_delay).await;

        if self.data_source.will_deny_consent(psn) {
            let applied = self.store.update_session_status(
                session_id.as_str(),
                SessionStatus::Denied,
                None,
            );
            if applied {
                info!("Consent denied for session {}", session_id);
            }
            return SessionStatus::Denied;
        }

        if self.data_source.requires_slow_processing(psn) {
            tokio::time::sleep(self.timing.slow_processing_delay).await;
        }

        let data = match self.data_source.fetch_data(psn) {
            Ok(data) => data,
            Err(e) => {
                warn!("Data lookup failed for session {}: {}", session_id, e);
                None
            }
        };

        match data {
            Some(data) => {
                let applied = self.store.update_session_status(
                    session_id.as_str(),
                    SessionStatus::Ready,
                    Some(data),
                );
                if applied {
                    info!("Data ready for session {}", session_id);
                }
                SessionStatus::Ready
            }
            None => {
                let applied = self.store.update_session_status(
                    session_id.as_str(),
                    SessionStatus::Expired,
                    None,
                );
                if applied {
                    info!("No data available, expired session {}", session_id);
                }
                SessionStatus::Expired
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::{BankData, MockBankDataSource};
    use crate::error_handling::types::DataSourceError;

    struct FailingBank;

    impl DataSource for FailingBank {
        fn has_data(&self, _psn: &str) -> bool {
            true
        }
        fn will_deny_consent(&self, _psn: &str) -> bool {
            false
        }
        fn requires_slow_processing(&self, _psn: &str) -> bool {
            false
        }
        fn fetch_data(&self, _psn: &str) -> Result<Option<BankData>, DataSourceError> {
            Err(DataSourceError::Unavailable("core banking offline".into()))
        }
    }

    fn process_with(data_source: Arc<dyn DataSource>) -> (Arc<SessionStore>, ConsentProcess) {
        let store = Arc::new(SessionStore::new(chrono::Duration::minutes(30)));
        let process = ConsentProcess::new(store.clone(), data_source, ConsentTiming::default());
        (store, process)
    }

    #[tokio::test(start_paused = true)]
    async fn denied_psn_ends_denied_without_data() {
        let (store, process) = process_with(Arc::new(MockBankDataSource::new()));
        let session = store.create_session("1111111111");

        let outcome = process.spawn(session.id.clone(), session.psn.clone()).await.unwrap();

        assert_eq!(outcome, SessionStatus::Denied);
        let stored = store.get_session(session.id.as_str()).unwrap();
        assert_eq!(stored.status, SessionStatus::Denied);
        assert!(stored.data.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn known_psn_becomes_ready_with_payload() {
        let (store, process) = process_with(Arc::new(MockBankDataSource::new()));
        let session = store.create_session("1234567890");

        let outcome = process.spawn(session.id.clone(), session.psn.clone()).await.unwrap();

        assert_eq!(outcome, SessionStatus::Ready);
        let stored = store.get_session(session.id.as_str()).unwrap();
        assert_eq!(stored.status, SessionStatus::Ready);
        assert_eq!(stored.data, Some(BankData::new(250000.0, 0.0, 45000.0, 5640.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn stays_pending_until_consent_delay_elapses() {
        let (store, process) = process_with(Arc::new(MockBankDataSource::new()));
        let session = store.create_session("1234567890");
        let handle = process.spawn(session.id.clone(), session.psn.clone());

        tokio::time::sleep(Duration::from_millis(1900)).await;
        assert_eq!(
            store.get_session(session.id.as_str()).unwrap().status,
            SessionStatus::Pending
        );

        handle.await.unwrap();
        assert_eq!(
            store.get_session(session.id.as_str()).unwrap().status,
            SessionStatus::Ready
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_psn_waits_for_the_extra_delay() {
        let (store, process) = process_with(Arc::new(MockBankDataSource::new()));
        let session = store.create_session("3333333333");
        let handle = process.spawn(session.id.clone(), session.psn.clone());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(
            store.get_session(session.id.as_str()).unwrap().status,
            SessionStatus::Pending
        );

        assert_eq!(handle.await.unwrap(), SessionStatus::Ready);
        assert!(store.get_session(session.id.as_str()).unwrap().data.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_failure_expires_the_session() {
        let (store, process) = process_with(Arc::new(FailingBank));
        let session = store.create_session("1234567890");

        let outcome = process.spawn(session.id.clone(), session.psn.clone()).await.unwrap();

        assert_eq!(outcome, SessionStatus::Expired);
        assert_eq!(
            store.get_session(session.id.as_str()).unwrap().status,
            SessionStatus::Expired
        );
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_runner_leaves_old_session_expired() {
        let (store, process) = process_with(Arc::new(MockBankDataSource::new()));
        let first = store.create_session("1234567890");
        let stale = process.spawn(first.id.clone(), first.psn.clone());
        let second = store.create_session("1234567890");
        let fresh = process.spawn(second.id.clone(), second.psn.clone());

        stale.await.unwrap();
        fresh.await.unwrap();

        assert_eq!(
            store.get_session(first.id.as_str()).unwrap().status,
            SessionStatus::Expired
        );
        assert_eq!(
            store.get_session(second.id.as_str()).unwrap().status,
            SessionStatus::Ready
        );
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_denied_runner_does_not_record_denial() {
        let (store, process) = process_with(Arc::new(MockBankDataSource::new()));
        let first = store.create_session("1111111111");
        let stale = process.spawn(first.id.clone(), first.psn.clone());
        let second = store.create_session("1111111111");

        assert_eq!(stale.await.unwrap(), SessionStatus::Denied);
        assert_eq!(
            store.get_session(first.id.as_str()).unwrap().status,
            SessionStatus::Expired
        );
        assert!(!store.update_session_status(first.id.as_str(), SessionStatus::Denied, None));
        assert_eq!(
            store.get_session(second.id.as_str()).unwrap().status,
            SessionStatus::Pending
        );
    }

    #[tokio::test(start_paused = true)]
    async fn purged_session_update_is_silent() {
        let (store, process) = process_with(Arc::new(MockBankDataSource::new()));
        let first = store.create_session("1234567890");
        let stale = process.spawn(first.id.clone(), first.psn.clone());
        store.create_session("1234567890");
        assert_eq!(store.cleanup_expired(), 1);

        stale.await.unwrap();

        assert!(store.get_session(first.id.as_str()).is_none());
        assert_eq!(store.len(), 1);
    }
}
