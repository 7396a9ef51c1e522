//! Note persistence over the identity + record-storage backend.

pub mod store;

pub use store::NoteStore;
