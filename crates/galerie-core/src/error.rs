//! Error types module
//!
//! All failures in the upload and gallery workflows are unified under the
//! `GalleryError` enum. The variants are stable kinds: UI layers match on
//! them (or on `code()`) to decide how a failure is presented, so adding a
//! variant is an API change.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like network failures
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GalleryError {
    #[error("File too large: {0}")]
    FileTooLarge(String),

    #[error("Invalid file type: {0}")]
    InvalidType(String),

    #[error("Too many files: {0}")]
    TooManyFiles(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("An upload is already in progress")]
    UploadInProgress,
}

/// Static metadata for each variant: (error_code, recoverable, log_level).
/// `user_message` stays per-variant for dynamic content.
fn static_metadata(err: &GalleryError) -> (&'static str, bool, LogLevel) {
    match err {
        GalleryError::FileTooLarge(_) => ("FILE_TOO_LARGE", false, LogLevel::Debug),
        GalleryError::InvalidType(_) => ("INVALID_TYPE", false, LogLevel::Debug),
        GalleryError::TooManyFiles(_) => ("TOO_MANY_FILES", false, LogLevel::Debug),
        GalleryError::Unauthorized(_) => ("UNAUTHORIZED", false, LogLevel::Warn),
        GalleryError::Network(_) => ("NETWORK_ERROR", true, LogLevel::Warn),
        GalleryError::UploadFailed(_) => ("UPLOAD_FAILED", true, LogLevel::Error),
        GalleryError::DeleteFailed(_) => ("DELETE_FAILED", true, LogLevel::Warn),
        GalleryError::UploadInProgress => ("UPLOAD_IN_PROGRESS", true, LogLevel::Debug),
    }
}

impl GalleryError {
    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    pub fn code(&self) -> &'static str {
        static_metadata(self).0
    }

    /// Whether this error is recoverable (the same operation can be retried)
    pub fn is_recoverable(&self) -> bool {
        static_metadata(self).1
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        static_metadata(self).2
    }

    /// User-facing message (may differ from the internal error message)
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::FileTooLarge(ref msg) => msg.clone(),
            GalleryError::InvalidType(ref msg) => msg.clone(),
            GalleryError::TooManyFiles(ref msg) => msg.clone(),
            GalleryError::Unauthorized(_) => "You are not allowed to do that".to_string(),
            GalleryError::Network(_) => {
                "Connection problem, check your network and retry".to_string()
            }
            GalleryError::UploadFailed(ref msg) => msg.clone(),
            GalleryError::DeleteFailed(ref msg) => msg.clone(),
            GalleryError::UploadInProgress => "An upload is already in progress".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_file_too_large() {
        let err = GalleryError::FileTooLarge("photo.png exceeds 50 MiB".to_string());
        assert_eq!(err.code(), "FILE_TOO_LARGE");
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Debug);
        assert_eq!(err.user_message(), "photo.png exceeds 50 MiB");
    }

    #[test]
    fn test_error_metadata_network() {
        let err = GalleryError::Network("connection refused".to_string());
        assert_eq!(err.code(), "NETWORK_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert!(!err.user_message().contains("connection refused"));
    }

    #[test]
    fn test_error_metadata_unauthorized_hides_detail() {
        let err = GalleryError::Unauthorized("missing owner context".to_string());
        assert_eq!(err.code(), "UNAUTHORIZED");
        assert_eq!(err.user_message(), "You are not allowed to do that");
        assert!(err.to_string().contains("missing owner context"));
    }

    #[test]
    fn test_error_metadata_upload_in_progress() {
        let err = GalleryError::UploadInProgress;
        assert_eq!(err.code(), "UPLOAD_IN_PROGRESS");
        assert!(err.is_recoverable());
    }
}
