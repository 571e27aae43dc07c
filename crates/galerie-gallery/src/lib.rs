//! Galerie gallery services
//!
//! The stateful side of the upload & gallery subsystem: the upload
//! coordinator (one batch session at a time, progress relay), the file
//! registry (authoritative local list per owner), the gallery controller
//! (filtering, selection, delete workflows), and the stateless preview
//! surface. Everything talks to the remote store through the `FileStore`
//! trait; `test_helpers` provides the in-memory mock used by the tests.

pub mod controller;
pub mod preview;
pub mod registry;
pub mod test_helpers;
pub mod uploader;

pub use controller::{
    DeleteRequest, DeleteTarget, GalleryController, KindFilter, Notice, NoticeKind,
};
pub use preview::{caption, click_action, icon, ClickAction, Lightbox};
pub use registry::{DeleteRoute, FileRegistry, LinkOpener, LogOpener};
pub use uploader::{UploadCoordinator, UploadSession, UploadStatus};
