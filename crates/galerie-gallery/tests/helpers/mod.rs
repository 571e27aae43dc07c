//! Shared fixtures for gallery tests.
#![allow(dead_code)]

use bytes::Bytes;
use chrono::Utc;
use galerie_core::{CandidateFile, FileKind, StoredFile};
use uuid::Uuid;

pub fn candidate(name: &str, mime: &str, size: usize) -> CandidateFile {
    CandidateFile {
        data: Bytes::from(vec![0u8; size]),
        name: name.to_string(),
        size_bytes: size as i64,
        mime_type: mime.to_string(),
    }
}

pub fn stored(name: &str, kind: FileKind) -> StoredFile {
    StoredFile {
        id: Uuid::new_v4(),
        name: name.to_string(),
        kind,
        size_bytes: 1024,
        url: format!("https://files.test/{}", name),
        thumbnail_url: None,
        created_at: Utc::now(),
        uploaded_by: None,
    }
}
