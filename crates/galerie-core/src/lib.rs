//! Galerie Core Library
//!
//! This crate provides the domain models, error taxonomy, upload rules, and
//! candidate validation shared by all Galerie components.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::UploadRules;
pub use error::{GalleryError, LogLevel};
pub use models::{CandidateFile, FileKind, StoredFile};
pub use validation::{human_size, sanitize_filename, screen_candidates, Rejection, Screening};
