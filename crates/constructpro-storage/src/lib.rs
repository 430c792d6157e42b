//! ConstructPro Storage Library
//!
//! This crate provides the storage abstraction for uploaded site media: the
//! `StorageProvider` trait, the local disk provider, remote provider stubs, the
//! provider factory and the retention sweeper.
//!
//! # Directory layout
//!
//! The local provider owns a single upload root. Inside it:
//!
//! - `media/images/{file_name}` and `media/videos/{file_name}` hold uploads,
//!   classified by MIME type
//! - `media/thumbnails/` is reserved for derived assets
//! - `{backup_dir}/images|videos|thumbnails` mirrors the media tree when backup
//!   is enabled
//!
//! File names are `{uuid}{extension}`. Layout constants and naming live in the
//! `taxonomy` module so every operation agrees on them. All raw filesystem
//! access goes through `gateway::FileSystemGateway`.

pub mod factory;
pub mod gateway;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-local")]
pub mod retention;
#[cfg(feature = "storage-remote-stubs")]
pub mod remote;
pub(crate) mod taxonomy;
pub mod traits;

// Re-export commonly used types
pub use constructpro_core::StorageBackend;
pub use factory::{create_storage, validate_storage_config};
pub use gateway::{FileStat, FileSystemGateway, FsError, FsErrorKind};
#[cfg(feature = "storage-local")]
pub use local::LocalStorageProvider;
#[cfg(feature = "storage-remote-stubs")]
pub use remote::{CloudinaryStorageProvider, GcsStorageProvider, S3StorageProvider};
#[cfg(feature = "storage-local")]
pub use retention::RetentionSweeper;
pub use traits::{StorageError, StorageProvider, StorageResult};
