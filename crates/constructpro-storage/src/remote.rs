//! Remote provider stubs (S3, Cloudinary, Google Cloud Storage)
//!
//! These providers accept their configuration and know the public URL shape of
//! their service, but perform no network I/O: `upload`, `delete` and
//! `get_file_info` always return `StorageError::NotImplemented`.

use crate::taxonomy::relative_path;
use crate::traits::{StorageError, StorageProvider, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use constructpro_core::{
    CloudinaryConfig, FileInfo, GcsConfig, MediaDescriptor, MediaKind, S3Config, UploadedFile,
};

/// Key prefix shared by the bucket-style providers.
const OBJECT_PREFIX: &str = "constructpro";

fn not_implemented(backend: StorageBackend, operation: &'static str) -> StorageError {
    tracing::warn!(%backend, operation, "Remote storage provider is not implemented");
    StorageError::NotImplemented { backend, operation }
}

fn object_key(kind: MediaKind, file_name: &str) -> String {
    format!("{}/{}", OBJECT_PREFIX, relative_path(kind, file_name))
}

#[derive(Debug, Clone)]
pub struct S3StorageProvider {
    config: S3Config,
}

impl S3StorageProvider {
    pub fn new(config: S3Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StorageProvider for S3StorageProvider {
    async fn upload(&self, _file: UploadedFile) -> StorageResult<MediaDescriptor> {
        Err(not_implemented(StorageBackend::S3, "upload"))
    }

    async fn delete(&self, _file_name: &str) -> StorageResult<bool> {
        Err(not_implemented(StorageBackend::S3, "delete"))
    }

    async fn get_file_info(&self, _file_name: &str) -> StorageResult<Option<FileInfo>> {
        Err(not_implemented(StorageBackend::S3, "get_file_info"))
    }

    /// Path-style URL on a custom endpoint, otherwise the virtual-hosted AWS form.
    fn get_file_url(&self, kind: MediaKind, file_name: &str) -> String {
        let key = object_key(kind, file_name);
        match self.config.endpoint.as_deref() {
            Some(endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.config.bucket,
                key
            ),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.config.bucket, self.config.region, key
            ),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[derive(Debug, Clone)]
pub struct CloudinaryStorageProvider {
    config: CloudinaryConfig,
}

impl CloudinaryStorageProvider {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StorageProvider for CloudinaryStorageProvider {
    async fn upload(&self, _file: UploadedFile) -> StorageResult<MediaDescriptor> {
        Err(not_implemented(StorageBackend::Cloudinary, "upload"))
    }

    async fn delete(&self, _file_name: &str) -> StorageResult<bool> {
        Err(not_implemented(StorageBackend::Cloudinary, "delete"))
    }

    async fn get_file_info(&self, _file_name: &str) -> StorageResult<Option<FileInfo>> {
        Err(not_implemented(StorageBackend::Cloudinary, "get_file_info"))
    }

    fn get_file_url(&self, kind: MediaKind, file_name: &str) -> String {
        format!(
            "https://res.cloudinary.com/{}/{}/upload/{}/{}",
            self.config.cloud_name,
            kind.as_str(),
            self.config.folder,
            file_name
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Cloudinary
    }
}

#[derive(Debug, Clone)]
pub struct GcsStorageProvider {
    config: GcsConfig,
}

impl GcsStorageProvider {
    pub fn new(config: GcsConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl StorageProvider for GcsStorageProvider {
    async fn upload(&self, _file: UploadedFile) -> StorageResult<MediaDescriptor> {
        Err(not_implemented(StorageBackend::Gcs, "upload"))
    }

    async fn delete(&self, _file_name: &str) -> StorageResult<bool> {
        Err(not_implemented(StorageBackend::Gcs, "delete"))
    }

    async fn get_file_info(&self, _file_name: &str) -> StorageResult<Option<FileInfo>> {
        Err(not_implemented(StorageBackend::Gcs, "get_file_info"))
    }

    fn get_file_url(&self, kind: MediaKind, file_name: &str) -> String {
        format!(
            "https://storage.googleapis.com/{}/{}",
            self.config.bucket,
            object_key(kind, file_name)
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Gcs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn upload_request() -> UploadedFile {
        UploadedFile {
            original_name: "photo.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            size: 10,
            temp_path: PathBuf::from("/tmp/never-read"),
        }
    }

    #[tokio::test]
    async fn test_s3_operations_are_not_implemented() {
        let storage = S3StorageProvider::new(S3Config {
            bucket: "site-media".to_string(),
            ..S3Config::default()
        });

        let err = storage.upload(upload_request()).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::NotImplemented {
                backend: StorageBackend::S3,
                operation: "upload"
            }
        ));
        assert!(storage.delete("a.jpg").await.is_err());
        assert!(storage.get_file_info("a.jpg").await.is_err());
    }

    #[test]
    fn test_s3_urls() {
        let mut config = S3Config {
            bucket: "site-media".to_string(),
            region: "eu-west-1".to_string(),
            ..S3Config::default()
        };
        let storage = S3StorageProvider::new(config.clone());
        assert_eq!(
            storage.get_file_url(MediaKind::Image, "a.jpg"),
            "https://site-media.s3.eu-west-1.amazonaws.com/constructpro/images/a.jpg"
        );

        config.endpoint = Some("http://localhost:9000/".to_string());
        let storage = S3StorageProvider::new(config);
        assert_eq!(
            storage.get_file_url(MediaKind::Video, "b.mp4"),
            "http://localhost:9000/site-media/constructpro/videos/b.mp4"
        );
    }

    #[tokio::test]
    async fn test_cloudinary_and_gcs_are_not_implemented() {
        let cloudinary = CloudinaryStorageProvider::new(CloudinaryConfig {
            cloud_name: "demo".to_string(),
            ..CloudinaryConfig::default()
        });
        assert!(matches!(
            cloudinary.delete("a.jpg").await,
            Err(StorageError::NotImplemented { backend: StorageBackend::Cloudinary, .. })
        ));
        assert_eq!(
            cloudinary.get_file_url(MediaKind::Video, "b.mp4"),
            "https://res.cloudinary.com/demo/video/upload/constructpro/b.mp4"
        );

        let gcs = GcsStorageProvider::new(GcsConfig {
            bucket: "bucket".to_string(),
            ..GcsConfig::default()
        });
        assert!(matches!(
            gcs.upload(upload_request()).await,
            Err(StorageError::NotImplemented { backend: StorageBackend::Gcs, .. })
        ));
        assert_eq!(
            gcs.get_file_url(MediaKind::Image, "a.jpg"),
            "https://storage.googleapis.com/bucket/constructpro/images/a.jpg"
        );
    }
}
