//! Client-side file registry
//!
//! The authoritative local copy of one owner's file collection. The list
//! mirrors server truth: it mutates only after the store confirms an
//! operation, never optimistically. The registry is the sole mutator;
//! everything else reads derived views.

use galerie_core::{GalleryError, StoredFile};
use galerie_store::FileStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Hands a resolved download URL to the platform's resource opener.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str);
}

/// Opener that only records the resolved URL in the log. Useful as a
/// default where no platform opener is wired in.
pub struct LogOpener;

impl LinkOpener for LogOpener {
    fn open(&self, url: &str) {
        tracing::info!(url = %url, "Download link ready");
    }
}

/// Which delete route this registry uses, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRoute {
    /// Owner-scoped delete, for regular callers.
    Owned,
    /// Delete by file id alone, for administrative callers.
    Administrative,
}

/// Local cache of the stored-file collection for one owner.
pub struct FileRegistry {
    store: Arc<dyn FileStore>,
    route: DeleteRoute,
    opener: Arc<dyn LinkOpener>,
    owner: Mutex<Option<Uuid>>,
    files: Mutex<Vec<StoredFile>>,
    load_generation: AtomicU64,
}

impl FileRegistry {
    pub fn new(store: Arc<dyn FileStore>, route: DeleteRoute, opener: Arc<dyn LinkOpener>) -> Self {
        Self {
            store,
            route,
            opener,
            owner: Mutex::new(None),
            files: Mutex::new(Vec::new()),
            load_generation: AtomicU64::new(0),
        }
    }

    /// Fetch the full current list for `owner`, replacing the local copy.
    ///
    /// With no owner the registry holds an empty list and performs no
    /// network access. When loads race (rapid owner changes) only the most
    /// recently requested load is applied; stale responses are discarded.
    pub async fn load(&self, owner: Option<Uuid>) -> Result<(), GalleryError> {
        let ticket = self.load_generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.owner.lock().unwrap() = owner;

        let Some(owner_id) = owner else {
            self.files.lock().unwrap().clear();
            return Ok(());
        };

        let result = self.store.list(owner_id).await;

        if self.load_generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(owner = %owner_id, "Discarding stale file list response");
            return Ok(());
        }

        match result {
            Ok(list) => {
                *self.files.lock().unwrap() = list;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Snapshot of the current list.
    pub fn files(&self) -> Vec<StoredFile> {
        self.files.lock().unwrap().clone()
    }

    pub fn owner(&self) -> Option<Uuid> {
        *self.owner.lock().unwrap()
    }

    /// Resolve a short-lived download URL and hand it to the opener.
    ///
    /// Failures are logged and swallowed: nothing changes locally, so there
    /// is nothing for the caller to recover.
    pub async fn request_download(&self, file_id: Uuid) {
        let Some(owner) = self.owner() else {
            tracing::warn!(file_id = %file_id, "Download requested without an owner context");
            return;
        };

        match self.store.download_url(owner, file_id).await {
            Ok(url) => self.opener.open(&url),
            Err(e) => {
                tracing::warn!(error = %e, file_id = %file_id, "Failed to resolve download link");
            }
        }
    }

    /// Delete one file through the configured route, dropping it from the
    /// local list only once the store confirms.
    pub async fn remove(&self, file_id: Uuid) -> Result<(), GalleryError> {
        match self.route {
            DeleteRoute::Owned => {
                let owner = self.owner().ok_or_else(|| {
                    GalleryError::Unauthorized("No owner context for delete".to_string())
                })?;
                self.store.delete(owner, file_id).await?;
            }
            DeleteRoute::Administrative => {
                self.store.delete_by_id(file_id).await?;
            }
        }

        self.files.lock().unwrap().retain(|f| f.id != file_id);
        tracing::info!(file_id = %file_id, "File deleted");
        Ok(())
    }

    /// Delete several files; the local list drops them only when the call
    /// as a whole succeeds.
    pub async fn remove_many(&self, file_ids: &[Uuid]) -> Result<(), GalleryError> {
        if file_ids.is_empty() {
            return Ok(());
        }

        match self.route {
            DeleteRoute::Owned => {
                let owner = self.owner().ok_or_else(|| {
                    GalleryError::Unauthorized("No owner context for delete".to_string())
                })?;
                self.store.delete_many(owner, file_ids).await?;
            }
            DeleteRoute::Administrative => {
                for file_id in file_ids {
                    self.store.delete_by_id(*file_id).await?;
                }
            }
        }

        self.files
            .lock()
            .unwrap()
            .retain(|f| !file_ids.contains(&f.id));
        tracing::info!(deleted = file_ids.len(), "Files deleted");
        Ok(())
    }
}
