//! Error taxonomies for authentication, the record backend, and store operations.
//!
//! Every fallible surface in the crate returns one of these; transport and
//! serde failures are converted at the component boundary so callers only
//! ever see these variants.

use thiserror::Error;

/// Failures establishing or refreshing an authenticated session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("no account registered for this email")]
    AccountNotFound,

    #[error("an account already exists for this email")]
    AccountExists,

    #[error("password rejected: {0}")]
    WeakPassword(String),

    #[error("network error: {0}")]
    Network(String),

    /// Any other identity-service rejection, message carried verbatim.
    #[error("authentication rejected: {0}")]
    Rejected(String),
}

/// Failures from the record-storage backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Failures surfaced by `NoteStore` operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Operation attempted with no active session, or with a session the
    /// identity service refused to refresh.
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("backend error: {0}")]
    Backend(String),

    #[error("image upload failed: {0}")]
    Upload(String),

    #[error("image download failed: {0}")]
    Download(String),
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        Self::Backend(err.to_string())
    }
}
