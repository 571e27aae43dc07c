//! Mock file store for testing
//!
//! Keeps collections in memory per owner, with switches for scripted
//! progress, injected failures, and artificial latency so ordering
//! guarantees can be exercised deterministically.

use async_trait::async_trait;
use chrono::Utc;
use galerie_core::{CandidateFile, FileKind, StoredFile};
use galerie_store::{FileStore, ProgressFn, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::registry::LinkOpener;

/// Opener that records every URL it is handed.
#[derive(Default)]
pub struct RecordingOpener {
    urls: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) {
        self.urls.lock().unwrap().push(url.to_string());
    }
}

/// In-memory file store.
#[derive(Default)]
pub struct MockFileStore {
    files: Mutex<HashMap<Uuid, Vec<StoredFile>>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
    fail_downloads: AtomicBool,
    upload_calls: AtomicUsize,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    delete_by_id_calls: AtomicUsize,
    /// Raw percents replayed through the progress callback before the
    /// upload resolves. Defaults to 25/50/75/100.
    progress_script: Mutex<Vec<u8>>,
    progress_step_delay: Mutex<Option<Duration>>,
    upload_delay: Mutex<Option<Duration>>,
    delete_delay: Mutex<Option<Duration>>,
    list_delays: Mutex<HashMap<Uuid, Duration>>,
    held_progress: Mutex<Option<ProgressFn>>,
}

impl MockFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, owner: Uuid, files: Vec<StoredFile>) {
        self.files.lock().unwrap().insert(owner, files);
    }

    pub fn stored(&self, owner: Uuid) -> Vec<StoredFile> {
        self.files
            .lock()
            .unwrap()
            .get(&owner)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_downloads(&self, fail: bool) {
        self.fail_downloads.store(fail, Ordering::SeqCst);
    }

    pub fn set_progress_script(&self, script: Vec<u8>) {
        *self.progress_script.lock().unwrap() = script;
    }

    pub fn set_progress_step_delay(&self, delay: Duration) {
        *self.progress_step_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_upload_delay(&self, delay: Duration) {
        *self.upload_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_delete_delay(&self, delay: Duration) {
        *self.delete_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_list_delay(&self, owner: Uuid, delay: Duration) {
        self.list_delays.lock().unwrap().insert(owner, delay);
    }

    /// The progress callback from the most recent upload, for driving
    /// stale-session events from a test.
    pub fn held_progress(&self) -> Option<ProgressFn> {
        self.held_progress.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn delete_by_id_calls(&self) -> usize {
        self.delete_by_id_calls.load(Ordering::SeqCst)
    }

    fn stored_from(owner: Uuid, candidate: &CandidateFile) -> StoredFile {
        StoredFile {
            id: Uuid::new_v4(),
            name: candidate.name.clone(),
            kind: FileKind::detect(&candidate.mime_type, &candidate.name),
            size_bytes: candidate.size_bytes,
            url: format!("https://files.test/{}/{}", owner, candidate.name),
            thumbnail_url: None,
            created_at: Utc::now(),
            uploaded_by: None,
        }
    }
}

#[async_trait]
impl FileStore for MockFileStore {
    async fn upload(
        &self,
        owner: Uuid,
        batch: &[CandidateFile],
        on_progress: ProgressFn,
    ) -> StoreResult<Vec<StoredFile>> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        *self.held_progress.lock().unwrap() = Some(on_progress.clone());

        let delay = *self.upload_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let script = {
            let script = self.progress_script.lock().unwrap();
            if script.is_empty() {
                vec![25, 50, 75, 100]
            } else {
                script.clone()
            }
        };
        let step_delay = *self.progress_step_delay.lock().unwrap();
        for percent in script {
            on_progress(percent);
            if let Some(delay) = step_delay {
                tokio::time::sleep(delay).await;
            }
        }

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StoreError::UploadRejected(
                "Upload refused by server".to_string(),
            ));
        }

        let stored: Vec<StoredFile> = batch
            .iter()
            .map(|candidate| Self::stored_from(owner, candidate))
            .collect();
        self.files
            .lock()
            .unwrap()
            .entry(owner)
            .or_default()
            .extend(stored.clone());
        Ok(stored)
    }

    async fn list(&self, owner: Uuid) -> StoreResult<Vec<StoredFile>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.list_delays.lock().unwrap().get(&owner).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.stored(owner))
    }

    async fn download_url(&self, owner: Uuid, file_id: Uuid) -> StoreResult<String> {
        if self.fail_downloads.load(Ordering::SeqCst) {
            return Err(StoreError::Network("link resolution failed".to_string()));
        }
        Ok(format!("https://files.test/{}/{}/signed", owner, file_id))
    }

    async fn delete(&self, owner: Uuid, file_id: Uuid) -> StoreResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delete_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::DeleteRejected(
                "Delete refused by server".to_string(),
            ));
        }
        let mut files = self.files.lock().unwrap();
        let list = files.entry(owner).or_default();
        let before = list.len();
        list.retain(|f| f.id != file_id);
        if list.len() == before {
            return Err(StoreError::NotFound(format!("No file {}", file_id)));
        }
        Ok(())
    }

    async fn delete_many(&self, owner: Uuid, file_ids: &[Uuid]) -> StoreResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delete_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::DeleteRejected(
                "Bulk delete refused by server".to_string(),
            ));
        }
        let mut files = self.files.lock().unwrap();
        files
            .entry(owner)
            .or_default()
            .retain(|f| !file_ids.contains(&f.id));
        Ok(())
    }

    async fn delete_by_id(&self, file_id: Uuid) -> StoreResult<()> {
        self.delete_by_id_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::DeleteRejected(
                "Delete refused by server".to_string(),
            ));
        }
        let mut files = self.files.lock().unwrap();
        for list in files.values_mut() {
            let before = list.len();
            list.retain(|f| f.id != file_id);
            if list.len() != before {
                return Ok(());
            }
        }
        Err(StoreError::NotFound(format!("No file {}", file_id)))
    }
}
