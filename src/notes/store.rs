//! NoteStore: per-user note persistence and the image attachment workflow.
//!
//! Holds the authenticated session in an explicit cell (multiple isolated
//! stores can coexist), stamps ownership on every write, and tolerates
//! malformed backend records on read by skipping them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::{FirebaseBackend, RecordBackend, Session};
use crate::config::Config;
use crate::errors::{AuthError, StoreError};
use crate::image_client::ImageClient;
use crate::models::Note;

/// How many seconds before expiry to proactively refresh.
const REFRESH_MARGIN_SECS: i64 = 60;

pub struct NoteStore {
    backend: Arc<dyn RecordBackend>,
    images: ImageClient,
    session: RwLock<Option<Session>>,
}

impl NoteStore {
    pub fn new(backend: Arc<dyn RecordBackend>, images: ImageClient) -> Self {
        Self {
            backend,
            images,
            session: RwLock::new(None),
        }
    }

    /// Store wired to the production backends from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(FirebaseBackend::new(config)),
            ImageClient::new(&config.image_api_base_url, &config.downloads_dir),
        )
    }

    /// Establish a session with the identity service. Calling again simply
    /// replaces the current session.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let session = self.backend.sign_in(email, password).await?;
        log::info!("[NoteStore] Signed in as {}", session.user_id);
        *self.session.write().await = Some(session);
        Ok(())
    }

    /// Create a new account and leave it signed in.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let session = self.backend.sign_up(email, password).await?;
        log::info!("[NoteStore] Registered account {}", session.user_id);
        *self.session.write().await = Some(session);
        Ok(())
    }

    /// Active session's user id, or `None` when unauthenticated.
    /// Pure read: never refreshes, never touches the backend.
    pub async fn current_user_id(&self) -> Option<String> {
        self.session.read().await.as_ref().map(|s| s.user_id.clone())
    }

    /// Drop the session. Subsequent record operations fail with
    /// `StoreError::NotAuthenticated`.
    pub async fn sign_out(&self) {
        *self.session.write().await = None;
        log::info!("[NoteStore] Signed out");
    }

    /// Persist a note under the current user, replacing any record with the
    /// same id. An empty `note.id` gets a freshly generated one, and
    /// `note.user_id` is always overwritten with the session's user id.
    pub async fn save(&self, note: Note) -> Result<(), StoreError> {
        let session = self.active_session().await?;

        let mut note = note;
        if note.id.is_empty() {
            note.id = Uuid::new_v4().to_string();
        }
        note.user_id = session.user_id.clone();

        let record = serde_json::to_value(&note)
            .map_err(|e| StoreError::Backend(format!("Failed to encode note: {}", e)))?;

        self.backend.put_record(&session, &note.id, &record).await?;
        log::info!("[NoteStore] Saved note {} for {}", note.id, session.user_id);
        Ok(())
    }

    /// All of the current user's notes, in backend order. Records that fail
    /// to deserialize are skipped, not surfaced as errors.
    pub async fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        let session = self.active_session().await?;
        let raw = self.backend.list_records(&session).await?;

        let mut notes = Vec::with_capacity(raw.len());
        for value in raw {
            match serde_json::from_value::<Note>(value) {
                Ok(note) => notes.push(note),
                Err(e) => log::debug!("[NoteStore] Skipping malformed record: {}", e),
            }
        }

        log::info!("[NoteStore] Listed {} notes for {}", notes.len(), session.user_id);
        Ok(notes)
    }

    /// Delete a note by id. Deleting an id that does not exist succeeds.
    pub async fn delete_note(&self, note_id: &str) -> Result<(), StoreError> {
        let session = self.active_session().await?;
        self.backend.delete_record(&session, note_id).await?;
        log::info!("[NoteStore] Deleted note {} for {}", note_id, session.user_id);
        Ok(())
    }

    /// Upload a local image file, returning the hosted URL to attach to a
    /// note. Requires a signed-in store, though the image host itself never
    /// sees the token.
    pub async fn upload_image(&self, path: &Path) -> Result<String, StoreError> {
        self.require_session().await?;
        self.images.upload(path).await
    }

    /// Fetch an image URL into a new uniquely named local file.
    pub async fn download_image(&self, url: &str) -> Result<PathBuf, StoreError> {
        self.require_session().await?;
        self.images.download(url).await
    }

    /// Session presence check for operations that do not spend the token.
    /// No refresh: the image host is anonymous.
    async fn require_session(&self) -> Result<(), StoreError> {
        if self.session.read().await.is_some() {
            Ok(())
        } else {
            Err(StoreError::NotAuthenticated)
        }
    }

    /// Session for a record operation, refreshing it when close to expiry.
    async fn active_session(&self) -> Result<Session, StoreError> {
        // Fast path: read lock
        {
            let state = self.session.read().await;
            match state.as_ref() {
                None => return Err(StoreError::NotAuthenticated),
                Some(s) => {
                    let now = chrono::Utc::now().timestamp();
                    if now < s.expires_at - REFRESH_MARGIN_SECS {
                        return Ok(s.clone());
                    }
                }
            }
        }

        // Slow path: write lock, double-check, then refresh
        let mut state = self.session.write().await;
        let current = match state.as_ref() {
            Some(s) => s.clone(),
            None => return Err(StoreError::NotAuthenticated),
        };

        // Double-check: another task may have refreshed while we waited
        let now = chrono::Utc::now().timestamp();
        if now < current.expires_at - REFRESH_MARGIN_SECS {
            return Ok(current);
        }

        match self.backend.refresh(&current.refresh_token).await {
            Ok(fresh) => {
                log::info!("[NoteStore] Session refreshed for {}", fresh.user_id);
                let out = fresh.clone();
                *state = Some(fresh);
                Ok(out)
            }
            Err(AuthError::Network(e)) => {
                // Transport trouble: keep the session, a later call may succeed.
                Err(StoreError::Backend(format!("Session refresh failed: {}", e)))
            }
            Err(e) => {
                log::warn!("[NoteStore] Session refresh rejected: {}", e);
                *state = None;
                Err(StoreError::NotAuthenticated)
            }
        }
    }
}
