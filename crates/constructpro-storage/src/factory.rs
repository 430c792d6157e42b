#[cfg(feature = "storage-local")]
use crate::LocalStorageProvider;
#[cfg(feature = "storage-remote-stubs")]
use crate::{CloudinaryStorageProvider, GcsStorageProvider, S3StorageProvider};
use crate::{StorageBackend, StorageProvider, StorageResult};
#[cfg(not(all(feature = "storage-local", feature = "storage-remote-stubs")))]
use crate::StorageError;
use constructpro_core::StorageConfig;
use std::sync::Arc;

/// Create a storage provider based on configuration
///
/// Only the local provider performs real I/O. The remote providers are stubs
/// whose operations fail with `StorageError::NotImplemented`. The factory does
/// not validate provider settings; see `validate_storage_config`.
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn StorageProvider>> {
    tracing::debug!(provider = %config.provider, "Creating storage provider");

    match config.provider {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorageProvider::new(&config.local).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage provider not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-remote-stubs")]
        StorageBackend::S3 => Ok(Arc::new(S3StorageProvider::new(config.s3.clone()))),

        #[cfg(feature = "storage-remote-stubs")]
        StorageBackend::Cloudinary => Ok(Arc::new(CloudinaryStorageProvider::new(
            config.cloudinary.clone(),
        ))),

        #[cfg(feature = "storage-remote-stubs")]
        StorageBackend::Gcs => Ok(Arc::new(GcsStorageProvider::new(config.gcs.clone()))),

        #[cfg(not(feature = "storage-remote-stubs"))]
        backend @ (StorageBackend::S3 | StorageBackend::Cloudinary | StorageBackend::Gcs) => {
            Err(StorageError::ConfigError(format!(
                "{} storage provider not available (storage-remote-stubs feature not enabled)",
                backend
            )))
        }
    }
}

/// Check that every setting the selected provider requires is present.
///
/// Returns one message per missing field; an empty list means the
/// configuration is usable. Advisory only.
pub fn validate_storage_config(config: &StorageConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let mut require = |value: &str, name: &str| {
        if value.trim().is_empty() {
            errors.push(format!("{} is required", name));
        }
    };

    match config.provider {
        StorageBackend::Local => {
            require(&config.local.upload_dir.to_string_lossy(), "UPLOAD_DIR");
        }
        StorageBackend::S3 => {
            require(&config.s3.bucket, "AWS_S3_BUCKET");
            require(&config.s3.access_key_id, "AWS_ACCESS_KEY_ID");
            require(&config.s3.secret_access_key, "AWS_SECRET_ACCESS_KEY");
        }
        StorageBackend::Cloudinary => {
            require(&config.cloudinary.cloud_name, "CLOUDINARY_CLOUD_NAME");
            require(&config.cloudinary.api_key, "CLOUDINARY_API_KEY");
            require(&config.cloudinary.api_secret, "CLOUDINARY_API_SECRET");
        }
        StorageBackend::Gcs => {
            require(&config.gcs.project_id, "GCP_PROJECT_ID");
            require(&config.gcs.bucket, "GCS_BUCKET");
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(feature = "storage-local")]
    #[tokio::test]
    async fn test_create_local_storage() {
        let dir = tempdir().unwrap();
        let config = StorageConfig::local(dir.path().join("uploads"));

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert!(dir.path().join("uploads/media/images").is_dir());
    }

    #[cfg(feature = "storage-remote-stubs")]
    #[tokio::test]
    async fn test_create_remote_stubs() {
        for backend in [
            StorageBackend::S3,
            StorageBackend::Cloudinary,
            StorageBackend::Gcs,
        ] {
            let config = StorageConfig {
                provider: backend,
                ..StorageConfig::default()
            };
            let storage = create_storage(&config).await.unwrap();
            assert_eq!(storage.backend_type(), backend);
        }
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let config = StorageConfig {
            provider: StorageBackend::S3,
            ..StorageConfig::default()
        };
        assert_eq!(
            validate_storage_config(&config),
            vec![
                "AWS_S3_BUCKET is required",
                "AWS_ACCESS_KEY_ID is required",
                "AWS_SECRET_ACCESS_KEY is required",
            ]
        );

        let mut config = StorageConfig {
            provider: StorageBackend::Gcs,
            ..StorageConfig::default()
        };
        config.gcs.project_id = "constructpro-prod".to_string();
        assert_eq!(validate_storage_config(&config), vec!["GCS_BUCKET is required"]);

        let mut config = StorageConfig {
            provider: StorageBackend::Cloudinary,
            ..StorageConfig::default()
        };
        config.cloudinary.cloud_name = "demo".to_string();
        config.cloudinary.api_key = "key".to_string();
        config.cloudinary.api_secret = "secret".to_string();
        assert!(validate_storage_config(&config).is_empty());
    }

    #[test]
    fn test_validate_local_defaults_are_valid() {
        assert!(validate_storage_config(&StorageConfig::default()).is_empty());

        let config = StorageConfig::local("");
        assert_eq!(validate_storage_config(&config), vec!["UPLOAD_DIR is required"]);
    }
}
