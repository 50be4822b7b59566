use std::sync::Arc;
use std::time::Duration;

use tokio_test::{assert_err, assert_ok};

use crate::data_source::{BankData, MockBankDataSource};
use crate::error_handling::types::SessionError;
use crate::session_management::consent_process::ConsentTiming;
use crate::session_management::session_manager::{SessionManager, StatusReport};
use crate::session_management::session_store::SessionStore;
use crate::SessionStatus;

// Helper building a manager over the mock bank with the default timings
fn manager() -> SessionManager {
    manager_with_ttl(chrono::Duration::minutes(30))
}

fn manager_with_ttl(ttl: chrono::Duration) -> SessionManager {
    SessionManager::new(
        Arc::new(SessionStore::new(ttl)),
        Arc::new(MockBankDataSource::new()),
        ConsentTiming::default(),
    )
}

// Long enough for the consent delay, short of the slow path
async fn wait_for_consent() {
    tokio::time::sleep(Duration::from_secs(3)).await;
}

#[tokio::test(start_paused = true)]
async fn denied_psn_reports_denied_and_serves_no_data() {
    let manager = manager();
    let session = assert_ok!(manager.request_data("1111111111"));

    assert_eq!(manager.session_status(session.id.as_str()), StatusReport::Pending);
    wait_for_consent().await;

    assert_eq!(manager.session_status(session.id.as_str()), StatusReport::Denied);
    assert_eq!(
        manager.session_data("1111111111", session.id.as_str()),
        Err(SessionError::NotReady)
    );
}

#[tokio::test(start_paused = true)]
async fn known_psn_serves_its_fixed_payload() {
    let manager = manager();
    let session = assert_ok!(manager.request_data("1234567890"));

    assert_eq!(
        manager.session_data("1234567890", session.id.as_str()),
        Err(SessionError::NotReady)
    );
    wait_for_consent().await;

    assert_eq!(manager.session_status(session.id.as_str()), StatusReport::Ready);
    assert_eq!(
        manager.session_data("1234567890", session.id.as_str()),
        Ok(BankData::new(250000.0, 0.0, 45000.0, 5640.0))
    );
}

#[tokio::test(start_paused = true)]
async fn zero_figures_are_still_ready() {
    let manager = manager();
    let session = assert_ok!(manager.request_data("5555555555"));
    wait_for_consent().await;

    assert_eq!(
        manager.session_data("5555555555", session.id.as_str()),
        Ok(BankData::new(0.0, 0.0, 0.0, 0.0))
    );
}

#[tokio::test(start_paused = true)]
async fn second_request_expires_the_first() {
    let manager = manager();
    let first = assert_ok!(manager.request_data("9876543210"));
    let second = assert_ok!(manager.request_data("9876543210"));

    assert_eq!(
        manager.store().get_session(first.id.as_str()).unwrap().status,
        SessionStatus::Expired
    );
    assert_eq!(manager.session_status(first.id.as_str()), StatusReport::NotFound);
    assert_eq!(manager.session_status(second.id.as_str()), StatusReport::Pending);

    wait_for_consent().await;

    assert_eq!(manager.session_status(first.id.as_str()), StatusReport::NotFound);
    assert_eq!(
        manager.session_data("9876543210", first.id.as_str()),
        Err(SessionError::AlreadyExpired)
    );
    assert_eq!(manager.session_status(second.id.as_str()), StatusReport::Ready);
}

#[tokio::test]
async fn unknown_psn_is_rejected_before_a_session_exists() {
    let manager = manager();

    assert_eq!(
        assert_err!(manager.request_data("0000000000")),
        SessionError::NoData
    );
    assert!(manager.store().is_empty());
}

#[tokio::test]
async fn unknown_session_id_is_not_found() {
    let manager = manager();
    let unknown = "6F9619FF-8B86-4D11-B42D-00C04FC964FF";

    assert_eq!(manager.session_status(unknown), StatusReport::NotFound);
    assert_eq!(
        manager.session_data("1234567890", unknown),
        Err(SessionError::NotFound)
    );
}

#[tokio::test(start_paused = true)]
async fn data_requires_the_matching_psn() {
    let manager = manager();
    let session = assert_ok!(manager.request_data("1234567890"));
    wait_for_consent().await;

    assert_eq!(
        manager.session_data("9876543210", session.id.as_str()),
        Err(SessionError::PsnMismatch)
    );
    assert!(manager
        .store()
        .get_session_for_psn_and_id("9876543210", session.id.as_str())
        .is_none());
    assert_eq!(
        manager.session_data("1234567890", session.id.as_str()),
        Ok(BankData::new(250000.0, 0.0, 45000.0, 5640.0))
    );
}

#[tokio::test]
async fn ttl_expiry_hides_the_session() {
    let manager = manager_with_ttl(chrono::Duration::milliseconds(20));
    let session = assert_ok!(manager.request_data("1234567890"));

    std::thread::sleep(Duration::from_millis(50));

    assert_eq!(manager.session_status(session.id.as_str()), StatusReport::NotFound);
    assert_eq!(
        manager.session_data("1234567890", session.id.as_str()),
        Err(SessionError::AlreadyExpired)
    );
}

#[tokio::test(start_paused = true)]
async fn cleanup_task_purges_superseded_sessions() {
    let manager = Arc::new(manager());
    assert_ok!(manager.request_data("1234567890"));
    assert_ok!(manager.request_data("1234567890"));
    assert_eq!(manager.store().len(), 2);

    let cleanup = manager.spawn_cleanup_task(Duration::from_secs(60));
    tokio::time::sleep(Duration::from_secs(61)).await;

    assert_eq!(manager.store().len(), 1);
    cleanup.abort();
}
