//! Candidate screening for dropzone selections
//!
//! Pure, synchronous classification of a selection event into accepted and
//! rejected candidates. Runs before any network call; rejected entries never
//! reach the upload layer.

use crate::config::UploadRules;
use crate::error::GalleryError;
use crate::models::CandidateFile;

pub const MAX_FILENAME_LENGTH: usize = 255;

/// One rejected candidate and the reason it was refused.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub candidate: CandidateFile,
    pub reason: GalleryError,
}

/// Partition of a selection event.
#[derive(Debug, Clone, Default)]
pub struct Screening {
    pub accepted: Vec<CandidateFile>,
    pub rejected: Vec<Rejection>,
}

impl Screening {
    /// Display policy: only the first rejection's message is shown.
    pub fn first_rejection(&self) -> Option<&Rejection> {
        self.rejected.first()
    }
}

/// Classify a selection event against the upload rules.
///
/// When `multiple` is false only the first candidate is considered, the rest
/// are rejected. When the batch exceeds `max_files` the whole selection
/// event is rejected. Accepted candidates come back with sanitized names.
pub fn screen_candidates(rules: &UploadRules, candidates: Vec<CandidateFile>) -> Screening {
    let mut screening = Screening::default();

    if rules.multiple && candidates.len() > rules.max_files {
        let reason = GalleryError::TooManyFiles(format!(
            "At most {} files per upload, {} selected",
            rules.max_files,
            candidates.len()
        ));
        screening.rejected = candidates
            .into_iter()
            .map(|candidate| Rejection {
                candidate,
                reason: reason.clone(),
            })
            .collect();
        return screening;
    }

    for (index, mut candidate) in candidates.into_iter().enumerate() {
        if !rules.multiple && index > 0 {
            screening.rejected.push(Rejection {
                candidate,
                reason: GalleryError::TooManyFiles(
                    "Only one file may be uploaded here".to_string(),
                ),
            });
            continue;
        }

        if candidate.size_bytes > rules.max_size_bytes {
            screening.rejected.push(Rejection {
                reason: GalleryError::FileTooLarge(format!(
                    "{} is {}, the limit is {}",
                    candidate.name,
                    human_size(candidate.size_bytes),
                    human_size(rules.max_size_bytes)
                )),
                candidate,
            });
            continue;
        }

        if !is_accepted(&rules.accepted, &candidate.mime_type, &candidate.name) {
            screening.rejected.push(Rejection {
                reason: GalleryError::InvalidType(format!(
                    "{} is not an accepted file type",
                    candidate.name
                )),
                candidate,
            });
            continue;
        }

        match sanitize_filename(&candidate.name) {
            Ok(safe) => {
                candidate.name = safe;
                screening.accepted.push(candidate);
            }
            Err(reason) => screening.rejected.push(Rejection { candidate, reason }),
        }
    }

    screening
}

/// Match a candidate against the accept list. Patterns are exact MIME types,
/// MIME wildcards ("image/*"), or extensions (".pdf").
fn is_accepted(accepted: &[String], mime_type: &str, filename: &str) -> bool {
    let mime = normalize_mime_type(mime_type).to_lowercase();
    let ext = filename
        .rsplit_once('.')
        .map(|(_, e)| e.to_lowercase())
        .unwrap_or_default();

    accepted.iter().any(|pattern| {
        let pattern = pattern.to_lowercase();
        if let Some(prefix) = pattern.strip_suffix("/*") {
            mime.split('/').next() == Some(prefix)
        } else if let Some(wanted) = pattern.strip_prefix('.') {
            !ext.is_empty() && ext == wanted
        } else {
            mime == pattern
        }
    })
}

/// Normalize a MIME type by stripping parameters
/// (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Sanitize a filename to prevent path traversal and invalid characters.
/// Returns an error if the filename contains path traversal attempts.
pub fn sanitize_filename(filename: &str) -> Result<String, GalleryError> {
    if filename.contains("..") {
        return Err(GalleryError::InvalidType(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}

/// Human-readable byte count for messages and previews.
pub fn human_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes.max(0) as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", value as i64, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn candidate(name: &str, mime: &str, size: i64) -> CandidateFile {
        CandidateFile {
            data: Bytes::new(),
            name: name.to_string(),
            size_bytes: size,
            mime_type: mime.to_string(),
        }
    }

    #[test]
    fn oversized_candidate_is_rejected_with_file_too_large() {
        let rules = UploadRules::default();
        let out = screen_candidates(
            &rules,
            vec![candidate("big.png", "image/png", 60 * 1024 * 1024)],
        );
        assert!(out.accepted.is_empty());
        assert_eq!(out.rejected.len(), 1);
        assert_eq!(out.rejected[0].reason.code(), "FILE_TOO_LARGE");
    }

    #[test]
    fn unaccepted_type_is_rejected() {
        let rules = UploadRules::default();
        let out = screen_candidates(&rules, vec![candidate("a.zip", "application/zip", 10)]);
        assert_eq!(out.rejected[0].reason.code(), "INVALID_TYPE");
    }

    #[test]
    fn extension_pattern_matches_without_mime() {
        let rules = UploadRules::default();
        let out = screen_candidates(
            &rules,
            vec![candidate("report.docx", "application/octet-stream", 10)],
        );
        assert_eq!(out.accepted.len(), 1);
    }

    #[test]
    fn mime_wildcard_matches_any_subtype() {
        let rules = UploadRules::default();
        let out = screen_candidates(&rules, vec![candidate("x.webp", "image/webp", 10)]);
        assert_eq!(out.accepted.len(), 1);
    }

    #[test]
    fn single_mode_keeps_first_and_rejects_rest() {
        let rules = UploadRules {
            multiple: false,
            ..UploadRules::default()
        };
        let out = screen_candidates(
            &rules,
            vec![
                candidate("first.png", "image/png", 10),
                candidate("second.png", "image/png", 10),
            ],
        );
        assert_eq!(out.accepted.len(), 1);
        assert_eq!(out.accepted[0].name, "first.png");
        assert_eq!(out.rejected.len(), 1);
        assert_eq!(out.rejected[0].reason.code(), "TOO_MANY_FILES");
    }

    #[test]
    fn batch_over_max_files_rejects_whole_selection() {
        let rules = UploadRules {
            max_files: 2,
            ..UploadRules::default()
        };
        let batch = vec![
            candidate("a.png", "image/png", 10),
            candidate("b.png", "image/png", 10),
            candidate("c.png", "image/png", 10),
        ];
        let out = screen_candidates(&rules, batch);
        assert!(out.accepted.is_empty());
        assert_eq!(out.rejected.len(), 3);
        assert!(out
            .first_rejection()
            .unwrap()
            .reason
            .user_message()
            .contains("At most 2"));
    }

    #[test]
    fn accepted_names_are_sanitized() {
        let rules = UploadRules::default();
        let out = screen_candidates(
            &rules,
            vec![candidate("mes photos/été.png", "image/png", 10)],
        );
        assert_eq!(out.accepted.len(), 1);
        assert!(!out.accepted[0].name.contains('/'));
    }

    #[test]
    fn sanitize_filename_rejects_path_traversal() {
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("foo/../bar").is_err());
        assert!(sanitize_filename("....").is_err());
    }

    #[test]
    fn sanitize_filename_accepts_valid_names() {
        assert_eq!(sanitize_filename("image.png").unwrap(), "image.png");
        assert_eq!(sanitize_filename("my-file_1.jpg").unwrap(), "my-file_1.jpg");
    }

    #[test]
    fn human_size_formats_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(50 * 1024 * 1024), "50.0 MiB");
        assert_eq!(human_size(-1), "0 B");
    }
}
