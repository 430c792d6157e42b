//! Storage abstraction trait
//!
//! This module defines the capability set every storage provider exposes.

use crate::gateway::{FsError, FsErrorKind};
use crate::StorageBackend;
use async_trait::async_trait;
use constructpro_core::{AppError, FileInfo, MediaDescriptor, MediaKind, UploadedFile};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The temp file could not be moved into the media tree.
    #[error("Upload failed: {0}")]
    UploadFailed(#[source] FsError),

    #[error(transparent)]
    Io(#[from] FsError),

    #[error("{operation} is not implemented for the {backend} storage provider")]
    NotImplemented {
        backend: StorageBackend,
        operation: &'static str,
    },

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(ref fs) | StorageError::Io(ref fs)
                if fs.kind == FsErrorKind::DiskFull =>
            {
                AppError::InsufficientStorage(err.to_string())
            }
            StorageError::UploadFailed(_) | StorageError::Io(_) => {
                AppError::Storage(err.to_string())
            }
            StorageError::NotImplemented { .. } => AppError::NotImplemented(err.to_string()),
            StorageError::InvalidFileName(name) => {
                AppError::InvalidInput(format!("Invalid file name: {}", name))
            }
            StorageError::ConfigError(msg) => AppError::Config(msg),
        }
    }
}

/// Storage provider trait
///
/// The route layer talks to whichever provider the factory built through this
/// trait only. Local-only maintenance operations (stats, retention sweeps,
/// health) are inherent methods of `LocalStorageProvider`.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Take ownership of an uploaded temp file and place it in storage.
    ///
    /// Size and type are not re-validated here; callers check them first
    /// (see `constructpro_core::UploadPolicy`).
    async fn upload(&self, file: UploadedFile) -> StorageResult<MediaDescriptor>;

    /// Delete a stored file by name.
    ///
    /// Returns `false` when no such file exists; deleting twice is not an error.
    async fn delete(&self, file_name: &str) -> StorageResult<bool>;

    /// Size, kind and modification time of a stored file, if present.
    async fn get_file_info(&self, file_name: &str) -> StorageResult<Option<FileInfo>>;

    /// Public URL for a file of the given kind. Pure computation, no I/O.
    fn get_file_url(&self, kind: MediaKind, file_name: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use constructpro_core::ErrorMetadata;
    use std::io;
    use std::path::PathBuf;

    fn fs_error(kind: io::ErrorKind) -> FsError {
        FsError {
            kind: match kind {
                io::ErrorKind::NotFound => FsErrorKind::NotFound,
                io::ErrorKind::StorageFull => FsErrorKind::DiskFull,
                _ => FsErrorKind::Other,
            },
            path: PathBuf::from("/srv/uploads/media/images/x.jpg"),
            source: io::Error::new(kind, "boom"),
        }
    }

    #[test]
    fn disk_full_maps_to_insufficient_storage() {
        let app: AppError = StorageError::UploadFailed(fs_error(io::ErrorKind::StorageFull)).into();
        assert_eq!(app.http_status_code(), 507);
    }

    #[test]
    fn io_failures_map_to_storage_error() {
        let app: AppError = StorageError::Io(fs_error(io::ErrorKind::NotFound)).into();
        assert_eq!(app.error_code(), "STORAGE_ERROR");
        assert!(app.to_string().contains("not found"));
    }

    #[test]
    fn not_implemented_maps_to_501() {
        let err = StorageError::NotImplemented {
            backend: StorageBackend::S3,
            operation: "upload",
        };
        assert_eq!(
            err.to_string(),
            "upload is not implemented for the s3 storage provider"
        );
        let app: AppError = err.into();
        assert_eq!(app.http_status_code(), 501);
    }

    #[test]
    fn invalid_file_name_maps_to_bad_request() {
        let app: AppError = StorageError::InvalidFileName("../etc/passwd".to_string()).into();
        assert_eq!(app.http_status_code(), 400);
    }
}
