//! Validation modules

pub mod files;

pub use files::{
    human_size, sanitize_filename, screen_candidates, Rejection, Screening, MAX_FILENAME_LENGTH,
};
