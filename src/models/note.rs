//! Note record as persisted in the realtime database.

use serde::{Deserialize, Serialize};

/// A user-owned note.
///
/// Serializes with the backend's camelCase field names. Every field is
/// defaulted so sparse records written by older clients still deserialize;
/// only structurally malformed entries fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Note {
    /// Unique within the owner's collection; empty means "not yet saved"
    /// and the store assigns one on save.
    pub id: String,
    pub title: String,
    pub content: String,
    /// URL previously returned by the image upload endpoint, if any.
    pub image_url: Option<String>,
    /// Owning user; stamped by the store on save, never trusted from input.
    pub user_id: String,
}

impl Note {
    /// New unsaved note. The store assigns `id` and `user_id` on save.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}
