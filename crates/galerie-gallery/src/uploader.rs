//! Batch upload coordination
//!
//! One coordinator drives one upload surface. A session runs
//! `Idle → Uploading → {Succeeded, Failed}`; starting a new session while
//! one is uploading is rejected, and progress events from a superseded
//! session are dropped on the floor (the request itself is not retracted).

use galerie_core::{CandidateFile, GalleryError, StoredFile};
use galerie_store::{FileStore, ProgressFn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use uuid::Uuid;

/// Session state of one upload surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

/// Snapshot of the current session for the presentation layer.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub status: UploadStatus,
    pub progress_percent: u8,
    pub error: Option<GalleryError>,
}

/// Coordinates batch uploads against the remote store.
///
/// Held behind `Arc` by callers; all methods take `&self` and the interior
/// state is its own synchronization.
pub struct UploadCoordinator {
    store: Arc<dyn FileStore>,
    status: Mutex<UploadStatus>,
    last_error: Mutex<Option<GalleryError>>,
    generation: Arc<AtomicU64>,
    progress_tx: watch::Sender<u8>,
    progress_rx: watch::Receiver<u8>,
}

impl UploadCoordinator {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        let (progress_tx, progress_rx) = watch::channel(0u8);
        Self {
            store,
            status: Mutex::new(UploadStatus::Idle),
            last_error: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
            progress_tx,
            progress_rx,
        }
    }

    /// Submit an accepted batch for upload.
    ///
    /// Fails with `Unauthorized` before any network call when no owner
    /// context is present, and with `UploadInProgress` while a session is
    /// already uploading. On success the session ends `Succeeded` at 100 %
    /// and the server-confirmed records are returned; on failure the session
    /// ends `Failed` with progress retained at its last value.
    pub async fn submit(
        &self,
        owner: Option<Uuid>,
        files: Vec<CandidateFile>,
    ) -> Result<Vec<StoredFile>, GalleryError> {
        let Some(owner) = owner else {
            return Err(GalleryError::Unauthorized(
                "No owner context for upload".to_string(),
            ));
        };

        if files.is_empty() {
            tracing::debug!(owner = %owner, "Ignoring empty upload batch");
            return Ok(Vec::new());
        }

        let session = {
            let mut status = self.status.lock().unwrap();
            if *status == UploadStatus::Uploading {
                return Err(GalleryError::UploadInProgress);
            }
            *status = UploadStatus::Uploading;
            *self.last_error.lock().unwrap() = None;
            // New session: progress restarts, prior session's events go silent.
            let session = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.progress_tx.send_replace(0);
            session
        };

        let generation = Arc::clone(&self.generation);
        let tx = self.progress_tx.clone();
        let on_progress: ProgressFn = Arc::new(move |percent| {
            if generation.load(Ordering::SeqCst) != session {
                return;
            }
            let percent = percent.min(100);
            tx.send_modify(|current| {
                if percent > *current {
                    *current = percent;
                }
            });
        });

        tracing::info!(owner = %owner, batch_size = files.len(), "Starting batch upload");

        match self.store.upload(owner, &files, on_progress).await {
            Ok(stored) => {
                if self.generation.load(Ordering::SeqCst) == session {
                    self.progress_tx.send_modify(|current| *current = 100);
                }
                *self.status.lock().unwrap() = UploadStatus::Succeeded;
                tracing::info!(owner = %owner, uploaded = stored.len(), "Batch upload complete");
                Ok(stored)
            }
            Err(e) => {
                let err: GalleryError = e.into();
                tracing::warn!(owner = %owner, error = %err, "Batch upload failed");
                *self.last_error.lock().unwrap() = Some(err.clone());
                *self.status.lock().unwrap() = UploadStatus::Failed;
                Err(err)
            }
        }
    }

    /// Acknowledge a terminal session, returning the surface to `Idle`.
    pub fn acknowledge(&self) {
        let mut status = self.status.lock().unwrap();
        if matches!(*status, UploadStatus::Succeeded | UploadStatus::Failed) {
            *status = UploadStatus::Idle;
            *self.last_error.lock().unwrap() = None;
        }
    }

    pub fn status(&self) -> UploadStatus {
        *self.status.lock().unwrap()
    }

    pub fn progress(&self) -> u8 {
        *self.progress_rx.borrow()
    }

    pub fn last_error(&self) -> Option<GalleryError> {
        self.last_error.lock().unwrap().clone()
    }

    /// Watch the session's progress percent. Values are non-decreasing
    /// within a session and reset to 0 when a new session starts.
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.progress_rx.clone()
    }

    pub fn session(&self) -> UploadSession {
        UploadSession {
            status: self.status(),
            progress_percent: self.progress(),
            error: self.last_error(),
        }
    }
}
