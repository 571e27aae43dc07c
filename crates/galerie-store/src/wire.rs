//! Wire schema for the file-storage API
//!
//! One explicit response schema, decoded strictly at the boundary. The API
//! returns file lists either as a bare array or wrapped in a `files`
//! envelope depending on the endpoint; both shapes are decoded explicitly
//! and anything else is an `InvalidResponse` error, never an empty default.

use chrono::{DateTime, Utc};
use galerie_core::{FileKind, StoredFile};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One file record as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    pub size_bytes: i64,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
}

impl UploadedItem {
    pub fn into_stored_file(self) -> StoredFile {
        let kind = FileKind::detect(self.mime_type.as_deref().unwrap_or(""), &self.name);
        StoredFile {
            id: self.id,
            name: self.name,
            kind,
            size_bytes: self.size_bytes,
            url: self.url,
            thumbnail_url: self.thumbnail_url,
            created_at: self.created_at,
            uploaded_by: self.uploaded_by,
        }
    }
}

/// File list response: bare array or `{ "files": [...] }` envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileListResponse {
    Envelope { files: Vec<UploadedItem> },
    Bare(Vec<UploadedItem>),
}

impl FileListResponse {
    pub fn into_items(self) -> Vec<UploadedItem> {
        match self {
            FileListResponse::Envelope { files } => files,
            FileListResponse::Bare(files) => files,
        }
    }
}

/// Download-link response. Matches GET .../files/{id}/download-link.
#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadLink {
    pub url: String,
}
