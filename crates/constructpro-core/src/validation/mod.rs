//! Upload validation
//!
//! Size and type checks run in the caller before a file reaches a storage
//! provider; providers never re-validate.

use crate::error::AppError;
use crate::models::UploadedFile;

const BYTES_PER_MB: u64 = 1024 * 1024;
const MAX_FILE_SIZE_MB: u64 = 50;

/// MIME types accepted by default: common photo formats and site video formats.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/tiff",
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-ms-wmv",
    "video/webm",
    "video/3gpp",
    "video/x-flv",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size_bytes: u64,
    /// Lower-cased MIME types.
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_MB * BYTES_PER_MB,
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl UploadPolicy {
    pub fn with_max_file_size_mb(mut self, megabytes: u64) -> Self {
        self.max_file_size_bytes = megabytes.saturating_mul(BYTES_PER_MB);
        self
    }

    pub fn allows_content_type(&self, mime_type: &str) -> bool {
        let mime_type = mime_type.to_lowercase();
        self.allowed_content_types.iter().any(|t| *t == mime_type)
    }

    pub fn validate(&self, file: &UploadedFile) -> Result<(), AppError> {
        if file.size > self.max_file_size_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {}MB.",
                self.max_file_size_bytes / BYTES_PER_MB
            )));
        }

        if !self.allows_content_type(&file.mime_type) {
            return Err(AppError::UnsupportedMediaType(format!(
                "File type {} is not allowed. Please upload images or videos only.",
                file.mime_type
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(mime_type: &str, size: u64) -> UploadedFile {
        UploadedFile {
            original_name: "site.jpg".to_string(),
            mime_type: mime_type.to_string(),
            size,
            temp_path: PathBuf::from("/tmp/upload-1"),
        }
    }

    #[test]
    fn accepts_allowed_types_within_limit() {
        let policy = UploadPolicy::default();
        assert!(policy.validate(&file("image/jpeg", 10)).is_ok());
        assert!(policy.validate(&file("VIDEO/MP4", 50 * BYTES_PER_MB)).is_ok());
    }

    #[test]
    fn rejects_oversize_files() {
        let policy = UploadPolicy::default().with_max_file_size_mb(1);
        let err = policy.validate(&file("image/png", BYTES_PER_MB + 1)).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(ref msg) if msg.contains("1MB")));
    }

    #[test]
    fn rejects_disallowed_types() {
        let policy = UploadPolicy::default();
        let err = policy.validate(&file("application/pdf", 10)).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(ref msg) if msg.contains("application/pdf")));
    }
}
