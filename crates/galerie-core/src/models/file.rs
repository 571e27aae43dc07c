use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// File classification used for both acceptance display and gallery filtering.
///
/// Derived deterministically from the MIME type when it is informative,
/// falling back to the filename extension. Never absent: anything
/// unrecognized is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Doc,
    Xls,
    Video,
    Other,
}

impl FileKind {
    /// Classify a file from its MIME type and filename.
    ///
    /// MIME parameters (`; charset=...`) are ignored. The extension is only
    /// consulted when the MIME type does not decide (missing, or the generic
    /// `application/octet-stream`).
    pub fn detect(mime_type: &str, filename: &str) -> FileKind {
        let mime = mime_type
            .split(';')
            .next()
            .map(|s| s.trim())
            .unwrap_or(mime_type)
            .to_lowercase();

        match mime.as_str() {
            "" | "application/octet-stream" => {}
            "application/pdf" => return FileKind::Pdf,
            "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            | "application/vnd.oasis.opendocument.text" => return FileKind::Doc,
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.oasis.opendocument.spreadsheet" => return FileKind::Xls,
            m if m.starts_with("image/") => return FileKind::Image,
            m if m.starts_with("video/") => return FileKind::Video,
            _ => return FileKind::Other,
        }

        match extension(filename).as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" | "bmp" | "avif" => FileKind::Image,
            "pdf" => FileKind::Pdf,
            "doc" | "docx" | "odt" | "txt" | "rtf" => FileKind::Doc,
            "xls" | "xlsx" | "ods" | "csv" => FileKind::Xls,
            "mp4" | "mov" | "avi" | "webm" | "mkv" => FileKind::Video,
            _ => FileKind::Other,
        }
    }
}

fn extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// One uploaded artifact already persisted by the remote store.
///
/// Never mutated in place: the registry replaces its whole list on refresh
/// and drops entries on confirmed deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: Uuid,
    pub name: String,
    pub kind: FileKind,
    pub size_bytes: i64,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub uploaded_by: Option<String>,
}

/// A locally selected file that has not been uploaded yet.
///
/// Either promoted into an upload batch or rejected by validation; never
/// persisted directly.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub data: Bytes,
    pub name: String,
    pub size_bytes: i64,
    pub mime_type: String,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Bytes) -> Self {
        let size_bytes = data.len() as i64;
        Self {
            data,
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Classification of this candidate, same derivation as stored files.
    pub fn kind(&self) -> FileKind {
        FileKind::detect(&self.mime_type, &self.name)
    }
}
