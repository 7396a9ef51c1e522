//! Wire models for records kept in the realtime database.

pub mod note;

pub use note::Note;
