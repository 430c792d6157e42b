//! ConstructPro Core Library
//!
//! This crate provides the domain models, error types, configuration and upload
//! validation shared by the storage providers and the operator CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{
    CloudinaryConfig, GcsConfig, LocalStorageConfig, RetentionConfig, S3Config, StorageConfig,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    FileInfo, MediaDescriptor, MediaKind, StorageHealth, StorageStats, UploadedFile,
};
pub use storage_types::StorageBackend;
pub use validation::UploadPolicy;
