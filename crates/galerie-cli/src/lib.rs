use bytes::Bytes;
use galerie_core::CandidateFile;
use galerie_gallery::KindFilter;
use std::path::Path;

/// Build an upload candidate from a local file path.
pub fn candidate_from_path(path: &Path) -> anyhow::Result<CandidateFile> {
    let data = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    let mime = guess_mime(&name);
    Ok(CandidateFile::new(name, mime, Bytes::from(data)))
}

/// Best-effort MIME type from the filename extension.
pub fn guess_mime(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, e)| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Parse a gallery type filter from a command-line value.
pub fn parse_kind_filter(value: &str) -> Option<KindFilter> {
    match value.to_lowercase().as_str() {
        "all" => Some(KindFilter::All),
        "image" | "images" => Some(KindFilter::Image),
        "pdf" => Some(KindFilter::Pdf),
        "doc" | "docs" => Some(KindFilter::Doc),
        "other" => Some(KindFilter::Other),
        _ => None,
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn guess_mime_covers_common_extensions() {
        assert_eq!(guess_mime("photo.JPG"), "image/jpeg");
        assert_eq!(guess_mime("facture.pdf"), "application/pdf");
        assert_eq!(guess_mime("unknown.bin"), "application/octet-stream");
        assert_eq!(guess_mime("no-extension"), "application/octet-stream");
    }

    #[test]
    fn parse_kind_filter_accepts_known_values() {
        assert_eq!(parse_kind_filter("image"), Some(KindFilter::Image));
        assert_eq!(parse_kind_filter("PDF"), Some(KindFilter::Pdf));
        assert_eq!(parse_kind_filter("all"), Some(KindFilter::All));
        assert_eq!(parse_kind_filter("spreadsheet"), None);
    }

    #[test]
    fn candidate_from_path_reads_name_size_and_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not-really-a-png").unwrap();

        let candidate = candidate_from_path(&path).unwrap();
        assert_eq!(candidate.name, "photo.png");
        assert_eq!(candidate.size_bytes, 16);
        assert_eq!(candidate.mime_type, "image/png");
    }

    #[test]
    fn candidate_from_path_fails_for_missing_file() {
        assert!(candidate_from_path(Path::new("/does/not/exist.png")).is_err());
    }
}
