//! File-store abstraction trait
//!
//! All remote backends must implement this trait. The gallery layer works
//! against the trait only, so tests can substitute an in-memory store.

use async_trait::async_trait;
use galerie_core::{CandidateFile, GalleryError, StoredFile};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Progress callback invoked with an integer percent in 0..=100.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    #[error("Delete rejected: {0}")]
    DeleteRejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for GalleryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unauthorized(msg) => GalleryError::Unauthorized(msg),
            StoreError::Network(msg) => GalleryError::Network(msg),
            StoreError::UploadRejected(msg) => GalleryError::UploadFailed(msg),
            StoreError::DeleteRejected(msg) => GalleryError::DeleteFailed(msg),
            StoreError::NotFound(msg) => GalleryError::DeleteFailed(msg),
            StoreError::InvalidResponse(msg) => GalleryError::UploadFailed(msg),
        }
    }
}

/// Remote file-storage collaborator.
///
/// All operations are owner-scoped except `delete_by_id`, the administrative
/// route that deletes by file id alone. Persistence lives entirely on the
/// remote side; implementations hold no local file state.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Upload a batch of candidates in one call.
    ///
    /// `on_progress` receives an integer percent 0..=100 as the request body
    /// drains. Returns the server-confirmed records for every file in the
    /// batch.
    async fn upload(
        &self,
        owner: Uuid,
        batch: &[CandidateFile],
        on_progress: ProgressFn,
    ) -> StoreResult<Vec<StoredFile>>;

    /// List the full current collection for an owner.
    async fn list(&self, owner: Uuid) -> StoreResult<Vec<StoredFile>>;

    /// Resolve a short-lived download URL for one file.
    async fn download_url(&self, owner: Uuid, file_id: Uuid) -> StoreResult<String>;

    /// Delete one file through the owner-scoped route.
    async fn delete(&self, owner: Uuid, file_id: Uuid) -> StoreResult<()>;

    /// Delete several files through the owner-scoped route.
    async fn delete_many(&self, owner: Uuid, file_ids: &[Uuid]) -> StoreResult<()>;

    /// Delete one file by id alone (administrative route).
    async fn delete_by_id(&self, file_id: Uuid) -> StoreResult<()>;
}
