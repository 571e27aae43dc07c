//! Domain models

pub mod file;

pub use file::{CandidateFile, FileKind, StoredFile};
