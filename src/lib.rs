//! Data-access core for a cloud-synced note-taking app.
//!
//! Users authenticate against an identity service, keep their notes in a
//! per-user realtime database, and attach images hosted on a separate HTTP
//! upload endpoint. [`NoteStore`] ties the three together behind one async,
//! Result-returning surface; nothing in here panics across that boundary.

pub mod backend;
pub mod config;
pub mod errors;
pub mod http;
pub mod image_client;
pub mod models;
pub mod notes;

pub use errors::{AuthError, StoreError};
pub use models::Note;
pub use notes::NoteStore;
