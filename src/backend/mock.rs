//! Scriptable in-memory backend for store tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{RecordBackend, Session};
use crate::errors::{AuthError, BackendError};

struct MockUser {
    password: String,
    user_id: String,
}

/// In-memory stand-in for the cloud backend.
///
/// Counts record and refresh calls so tests can assert that unauthenticated
/// operations never reach the backend, and exposes knobs for session
/// lifetime and refresh failures.
pub struct MockBackend {
    users: Mutex<HashMap<String, MockUser>>,
    records: Mutex<HashMap<String, HashMap<String, Value>>>,
    /// Lifetime (seconds) of sessions handed out; 0 issues stale sessions.
    session_ttl: AtomicI64,
    reject_refresh: AtomicBool,
    fail_refresh_network: AtomicBool,
    token_counter: AtomicUsize,
    pub record_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            records: Mutex::new(HashMap::new()),
            session_ttl: AtomicI64::new(3600),
            reject_refresh: AtomicBool::new(false),
            fail_refresh_network: AtomicBool::new(false),
            token_counter: AtomicUsize::new(0),
            record_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    /// Register a user directly, returning its backend id.
    pub fn add_user(&self, email: &str, password: &str) -> String {
        let mut users = self.users.lock().unwrap();
        let user_id = format!("user-{}", users.len() + 1);
        users.insert(
            email.to_string(),
            MockUser {
                password: password.to_string(),
                user_id: user_id.clone(),
            },
        );
        user_id
    }

    pub fn set_session_ttl(&self, secs: i64) {
        self.session_ttl.store(secs, Ordering::SeqCst);
    }

    pub fn reject_refresh(&self, flag: bool) {
        self.reject_refresh.store(flag, Ordering::SeqCst);
    }

    pub fn fail_refresh_network(&self, flag: bool) {
        self.fail_refresh_network.store(flag, Ordering::SeqCst);
    }

    pub fn record_count(&self, user_id: &str) -> usize {
        self.records
            .lock()
            .unwrap()
            .get(user_id)
            .map(|m| m.len())
            .unwrap_or(0)
    }

    pub fn raw_record(&self, user_id: &str, note_id: &str) -> Option<Value> {
        self.records
            .lock()
            .unwrap()
            .get(user_id)
            .and_then(|m| m.get(note_id))
            .cloned()
    }

    /// Plant a record without going through the store, e.g. junk entries.
    pub fn inject_raw(&self, user_id: &str, note_id: &str, value: Value) {
        self.records
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .insert(note_id.to_string(), value);
    }

    fn session_for(&self, user_id: &str) -> Session {
        let n = self.token_counter.fetch_add(1, Ordering::SeqCst);
        Session {
            user_id: user_id.to_string(),
            id_token: format!("token-{}", n),
            // Encodes the owner so refresh can find the account again.
            refresh_token: format!("refresh:{}", user_id),
            expires_at: chrono::Utc::now().timestamp() + self.session_ttl.load(Ordering::SeqCst),
        }
    }
}

#[async_trait]
impl RecordBackend for MockBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let users = self.users.lock().unwrap();
        match users.get(email) {
            Some(user) if user.password == password => Ok(self.session_for(&user.user_id)),
            Some(_) => Err(AuthError::InvalidCredentials),
            None => Err(AuthError::AccountNotFound),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if self.users.lock().unwrap().contains_key(email) {
            return Err(AuthError::AccountExists);
        }
        let user_id = self.add_user(email, password);
        Ok(self.session_for(&user_id))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh_network.load(Ordering::SeqCst) {
            return Err(AuthError::Network("connection refused".to_string()));
        }
        if self.reject_refresh.load(Ordering::SeqCst) {
            return Err(AuthError::Rejected("TOKEN_EXPIRED".to_string()));
        }
        match refresh_token.strip_prefix("refresh:") {
            Some(user_id) => Ok(self.session_for(user_id)),
            None => Err(AuthError::Rejected("INVALID_REFRESH_TOKEN".to_string())),
        }
    }

    async fn put_record(
        &self,
        session: &Session,
        note_id: &str,
        record: &Value,
    ) -> Result<(), BackendError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .entry(session.user_id.clone())
            .or_default()
            .insert(note_id.to_string(), record.clone());
        Ok(())
    }

    async fn list_records(&self, session: &Session) -> Result<Vec<Value>, BackendError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&session.user_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_record(&self, session: &Session, note_id: &str) -> Result<(), BackendError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(user_records) = self.records.lock().unwrap().get_mut(&session.user_id) {
            user_records.remove(note_id);
        }
        Ok(())
    }
}
