//! Remote file-store boundary
//!
//! Defines the `FileStore` trait the gallery components depend on, the typed
//! `StoreError` surfaced at that boundary, and the HTTP implementation
//! against the storefront's file-storage API.

pub mod http;
pub mod traits;
pub mod wire;

pub use http::{Auth, HttpFileStore};
pub use traits::{FileStore, ProgressFn, StoreError, StoreResult};
pub use wire::{DownloadLink, FileListResponse, UploadedItem};
