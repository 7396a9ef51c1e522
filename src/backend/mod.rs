//! Identity and record-storage backend seam.
//!
//! `NoteStore` talks to the cloud through [`RecordBackend`] so tests can
//! substitute an in-memory implementation. Records cross this seam as raw
//! JSON values; deciding what to do with ones that fail to deserialize is
//! the store's business, not the backend's.

pub mod firebase;
#[cfg(test)]
pub mod mock;

pub use firebase::FirebaseBackend;

use crate::errors::{AuthError, BackendError};
use async_trait::async_trait;

/// Authenticated-user context returned by sign-in, sign-up, and refresh.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    /// Bearer credential attached to record-storage requests.
    pub id_token: String,
    /// Credential used to mint a replacement `id_token`.
    pub refresh_token: String,
    /// Unix timestamp after which `id_token` is stale.
    pub expires_at: i64,
}

/// The identity service plus the per-user record store behind it.
///
/// Record operations are keyed under `users/{user_id}/notes/{note_id}`;
/// writes replace the whole record and deletes succeed whether or not the
/// key exists.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Sign an existing account in.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Exchange a refresh token for a fresh session.
    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError>;

    /// Upsert the full record at `users/{user_id}/notes/{note_id}`.
    async fn put_record(
        &self,
        session: &Session,
        note_id: &str,
        record: &serde_json::Value,
    ) -> Result<(), BackendError>;

    /// All records under `users/{user_id}/notes`, in backend order.
    async fn list_records(&self, session: &Session) -> Result<Vec<serde_json::Value>, BackendError>;

    /// Remove the record at `users/{user_id}/notes/{note_id}`, if present.
    async fn delete_record(&self, session: &Session, note_id: &str) -> Result<(), BackendError>;
}
