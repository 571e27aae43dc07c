//! Test helpers
//!
//! In-memory `FileStore` and a recording `LinkOpener` so the gallery
//! components can be exercised without a server.

pub mod mock_store;

pub use mock_store::{MockFileStore, RecordingOpener};
