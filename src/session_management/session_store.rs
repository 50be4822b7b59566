//! In-memory session store.
//!
//! The store keeps two maps, sessions by id and the live session id of each
//! PSN, behind a single mutex. Every public operation takes the lock once and
//! finishes without awaiting, so callers on the request path and the consent
//! tasks never observe one map updated without the other.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use log::{debug, info};

use crate::data_source::BankData;
use crate::session_management::session::{Session, SessionId};
use crate::SessionStatus;

#[derive(Default)]
struct SessionMaps {
    sessions: HashMap<SessionId, Session>,
    by_psn: HashMap<String, SessionId>,
}

/// Concurrency-safe store enforcing one live session per PSN.
///
/// # Fields Overview
///
/// - `maps`: sessions by id and the PSN index, guarded together
/// - `ttl`: lifetime given to every new session
pub struct SessionStore {
    maps: Mutex<SessionMaps>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        info!("SessionStore initialized with TTL: {} minutes", ttl.num_minutes());
        Self {
            maps: Mutex::new(SessionMaps::default()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // A panic while holding the lock cannot leave the maps half-written, every
    // mutation below is a single insert/remove/assignment.
    fn lock(&self) -> MutexGuard<'_, SessionMaps> {
        self.maps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a new `Pending` session for `psn`.
    ///
    /// The session previously indexed for the PSN, if any, is forced to
    /// `Expired` and the index is repointed in the same critical section.
    pub fn create_session(&self, psn: &str) -> Session {
        let mut maps = self.lock();
        let now = Utc::now();

        if let Some(old_id) = maps.by_psn.get(psn).cloned() {
            debug_assert!(
                maps.sessions.contains_key(&old_id),
                "PSN index points at missing session {}",
                old_id
            );
            if let Some(old) = maps.sessions.get_mut(&old_id) {
                old.status = SessionStatus::Expired;
                info!("Expired previous session {} for PSN {}", old_id, psn);
            }
        }

        let session = Session {
            id: SessionId::generate(),
            psn: psn.to_string(),
            status: SessionStatus::Pending,
            created_at: now,
            expires_at: now + self.ttl,
            data: None,
        };

        maps.by_psn.insert(psn.to_string(), session.id.clone());
        maps.sessions.insert(session.id.clone(), session.clone());

        info!("Created new session {} for PSN {}", session.id, psn);
        session
    }

    /// Looks a session up by id, expiring it in place once its deadline passed.
    pub fn get_session(&self, id: &str) -> Option<Session> {
        let id = SessionId::normalize(id);
        let mut maps = self.lock();
        let session = maps.sessions.get_mut(&id)?;

        if session.status != SessionStatus::Expired && session.is_past_deadline(Utc::now()) {
            session.status = SessionStatus::Expired;
            info!("Session {} has expired", id);
        }

        debug!("Retrieved session {} ({})", id, session.status);
        Some(session.clone())
    }

    /// Like [`SessionStore::get_session`], but only if the session was opened
    /// for exactly this PSN.
    pub fn get_session_for_psn_and_id(&self, psn: &str, id: &str) -> Option<Session> {
        self.get_session(id).filter(|session| session.psn == psn)
    }

    /// Records the outcome of the consent process.
    ///
    /// Returns `false` when the id is unknown, when the session is already out
    /// of `Pending` (superseded, denied, ready or expired), or when its deadline
    /// has passed. A stale consent task therefore cannot bring a superseded
    /// session back to life.
    pub fn update_session_status(
        &self,
        id: &str,
        status: SessionStatus,
        data: Option<BankData>,
    ) -> bool {
        let id = SessionId::normalize(id);
        let mut maps = self.lock();
        let Some(session) = maps.sessions.get_mut(&id) else {
            debug!("Ignoring status update for unknown session {}", id);
            return false;
        };

        if session.is_past_deadline(Utc::now()) {
            session.status = SessionStatus::Expired;
        }

        if !session.status.accepts_update() {
            info!(
                "Ignoring status update {} for session {} (status: {})",
                status, id, session.status
            );
            return false;
        }

        session.status = status;
        if data.is_some() {
            session.data = data;
        }
        info!("Updated session {} status to {}", id, status);
        true
    }

    /// Removes sessions past their deadline or already `Expired`.
    ///
    /// Returns how many sessions were purged; a second call in a row purges
    /// nothing.
    pub fn cleanup_expired(&self) -> usize {
        let mut maps = self.lock();
        let now = Utc::now();

        let expired: Vec<SessionId> = maps
            .sessions
            .values()
            .filter(|s| s.status == SessionStatus::Expired || s.is_past_deadline(now))
            .map(|s| s.id.clone())
            .collect();

        for id in &expired {
            if let Some(session) = maps.sessions.remove(id) {
                if maps.by_psn.get(&session.psn) == Some(id) {
                    maps.by_psn.remove(&session.psn);
                }
                debug!("Cleaned up expired session {}", id);
            }
        }

        if !expired.is_empty() {
            info!("Removed {} expired session(s)", expired.len());
        }
        expired.len()
    }

    /// Id of the session currently indexed for `psn`.
    pub fn active_session_id(&self, psn: &str) -> Option<SessionId> {
        self.lock().by_psn.get(psn).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
