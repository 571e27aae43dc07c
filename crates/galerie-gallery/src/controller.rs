//! Gallery controller
//!
//! Composes the registry's list with local view state (search text, kind
//! filter, selection) into the filtered, selectable view the user acts on,
//! and owns the delete-confirmation workflow. At most one delete request is
//! open at a time and at most one delete call is in flight.

use galerie_core::{FileKind, GalleryError, StoredFile};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::registry::FileRegistry;

/// Type-category filter over the visible list. Categories derive from the
/// same classification as validation, so acceptance display and filtering
/// always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    All,
    Image,
    Pdf,
    Doc,
    Other,
}

impl KindFilter {
    fn matches(self, kind: FileKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Image => kind == FileKind::Image,
            KindFilter::Pdf => kind == FileKind::Pdf,
            KindFilter::Doc => kind == FileKind::Doc,
            KindFilter::Other => {
                !matches!(kind, FileKind::Image | FileKind::Pdf | FileKind::Doc)
            }
        }
    }
}

/// What a pending confirmation would delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    One(Uuid),
    Many(Vec<Uuid>),
}

/// A pending delete confirmation. One value travels between the controller
/// and the confirmation surface; there are no scattered flags.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub target: DeleteTarget,
    pub in_flight: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// User-facing outcome of a workflow step. The controller emits, the
/// presentation layer displays.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// View state and delete workflows over one registry.
pub struct GalleryController {
    registry: Arc<FileRegistry>,
    bulk_delete_enabled: bool,
    search: Mutex<String>,
    kind: Mutex<KindFilter>,
    selection: Mutex<HashSet<Uuid>>,
    request: Mutex<Option<DeleteRequest>>,
    deleting: AtomicBool,
    notice: Mutex<Option<Notice>>,
}

impl GalleryController {
    pub fn new(registry: Arc<FileRegistry>, bulk_delete_enabled: bool) -> Self {
        Self {
            registry,
            bulk_delete_enabled,
            search: Mutex::new(String::new()),
            kind: Mutex::new(KindFilter::All),
            selection: Mutex::new(HashSet::new()),
            request: Mutex::new(None),
            deleting: AtomicBool::new(false),
            notice: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> &Arc<FileRegistry> {
        &self.registry
    }

    /// Reload the registry for `owner` and re-derive the view.
    pub async fn refresh(&self, owner: Option<Uuid>) -> Result<(), GalleryError> {
        let result = self.registry.load(owner).await;
        self.prune_selection();
        result
    }

    /// The filtered view: search text first (case-insensitive substring on
    /// the name), then the kind filter.
    pub fn filtered(&self) -> Vec<StoredFile> {
        let needle = self.search.lock().unwrap().to_lowercase();
        let kind = *self.kind.lock().unwrap();

        self.registry
            .files()
            .into_iter()
            .filter(|f| needle.is_empty() || f.name.to_lowercase().contains(&needle))
            .filter(|f| kind.matches(f.kind))
            .collect()
    }

    pub fn set_search(&self, text: impl Into<String>) {
        *self.search.lock().unwrap() = text.into();
        self.prune_selection();
    }

    pub fn set_kind_filter(&self, kind: KindFilter) {
        *self.kind.lock().unwrap() = kind;
        self.prune_selection();
    }

    /// Selected ids in the filtered view's order.
    pub fn selected(&self) -> Vec<Uuid> {
        let selection = self.selection.lock().unwrap().clone();
        self.filtered()
            .into_iter()
            .map(|f| f.id)
            .filter(|id| selection.contains(id))
            .collect()
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selection.lock().unwrap().contains(&id)
    }

    /// Flip membership for a visible file; ids outside the filtered view
    /// are ignored.
    pub fn toggle(&self, id: Uuid) {
        if !self.filtered().iter().any(|f| f.id == id) {
            return;
        }
        let mut selection = self.selection.lock().unwrap();
        if !selection.remove(&id) {
            selection.insert(id);
        }
    }

    /// Select the whole filtered view, or clear the selection when it
    /// already covers the whole (non-empty) view. No-op on an empty view.
    pub fn toggle_all(&self) {
        let visible: Vec<Uuid> = self.filtered().into_iter().map(|f| f.id).collect();
        if visible.is_empty() {
            return;
        }
        let mut selection = self.selection.lock().unwrap();
        if selection.len() == visible.len() {
            selection.clear();
        } else {
            *selection = visible.into_iter().collect();
        }
    }

    pub fn clear_selection(&self) {
        self.selection.lock().unwrap().clear();
    }

    /// Drop selected ids that fell out of the filtered view.
    fn prune_selection(&self) {
        let visible: HashSet<Uuid> = self.filtered().into_iter().map(|f| f.id).collect();
        self.selection
            .lock()
            .unwrap()
            .retain(|id| visible.contains(id));
    }

    /// Open a confirmation for one file. Ignored while another request is
    /// open or a delete is in flight.
    pub fn request_delete(&self, id: Uuid) {
        if self.deleting.load(Ordering::SeqCst) {
            return;
        }
        let mut request = self.request.lock().unwrap();
        if request.is_some() {
            return;
        }
        if !self.registry.files().iter().any(|f| f.id == id) {
            return;
        }
        *request = Some(DeleteRequest {
            target: DeleteTarget::One(id),
            in_flight: false,
        });
    }

    /// Open a confirmation for the current selection. Requires the bulk
    /// capability and a non-empty selection.
    pub fn request_bulk_delete(&self) {
        if !self.bulk_delete_enabled || self.deleting.load(Ordering::SeqCst) {
            return;
        }
        let targets = self.selected();
        if targets.is_empty() {
            return;
        }
        let mut request = self.request.lock().unwrap();
        if request.is_some() {
            return;
        }
        *request = Some(DeleteRequest {
            target: DeleteTarget::Many(targets),
            in_flight: false,
        });
    }

    pub fn open_request(&self) -> Option<DeleteRequest> {
        self.request.lock().unwrap().clone()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.load(Ordering::SeqCst)
    }

    /// Run the open request against the registry.
    ///
    /// Success closes the request (and clears the selection for a bulk
    /// delete); failure keeps it open so the user can retry or cancel. A
    /// confirm while another delete is in flight is ignored.
    pub async fn confirm_delete(&self) -> Result<(), GalleryError> {
        if self.deleting.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let target = {
            let mut request = self.request.lock().unwrap();
            match request.as_mut() {
                Some(r) => {
                    r.in_flight = true;
                    r.target.clone()
                }
                None => {
                    self.deleting.store(false, Ordering::SeqCst);
                    return Ok(());
                }
            }
        };

        let result = match &target {
            DeleteTarget::One(id) => self.registry.remove(*id).await,
            DeleteTarget::Many(ids) => self.registry.remove_many(ids).await,
        };

        match result {
            Ok(()) => {
                *self.request.lock().unwrap() = None;
                match target {
                    DeleteTarget::One(id) => {
                        self.selection.lock().unwrap().remove(&id);
                        self.post_notice(NoticeKind::Success, "File deleted".to_string());
                    }
                    DeleteTarget::Many(ids) => {
                        self.selection.lock().unwrap().clear();
                        self.post_notice(
                            NoticeKind::Success,
                            format!("{} files deleted", ids.len()),
                        );
                    }
                }
                self.deleting.store(false, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                if let Some(r) = self.request.lock().unwrap().as_mut() {
                    r.in_flight = false;
                }
                self.post_notice(NoticeKind::Error, e.user_message());
                self.deleting.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Close the open request without deleting. An already in-flight call
    /// is not retracted; its late result simply finds no request to close.
    pub fn cancel_delete(&self) {
        *self.request.lock().unwrap() = None;
    }

    /// Take the pending notice, if any. Display is the caller's concern.
    pub fn take_notice(&self) -> Option<Notice> {
        self.notice.lock().unwrap().take()
    }

    fn post_notice(&self, kind: NoticeKind, message: String) {
        *self.notice.lock().unwrap() = Some(Notice { kind, message });
    }
}
