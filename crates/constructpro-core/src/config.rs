//! Configuration module
//!
//! `StorageConfig` selects a storage provider and carries the settings of every
//! provider, the upload policy and the retention schedule. It is read once from
//! the environment at startup (a `.env` file is honoured) and never mutated.
//! Provider-specific fields are optional unless that provider is selected; use
//! `validate_storage_config` in `constructpro-storage` to check them.

use std::env;
use std::path::{Path, PathBuf};

use crate::storage_types::StorageBackend;
use crate::validation::UploadPolicy;

const UPLOAD_DIR: &str = "uploads";
const MOUNT_PREFIX: &str = "/api/media";
const BACKUP_DIR: &str = "backup";
const MAX_FILE_SIZE_MB: u64 = 50;
const RETENTION_DAYS: u32 = 30;
const RETENTION_INTERVAL_SECS: u64 = 3600;
const S3_REGION: &str = "us-east-1";
const CLOUDINARY_FOLDER: &str = "constructpro";

/// Local disk provider settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalStorageConfig {
    /// Root of everything the provider writes; the media tree lives in `media/`.
    pub upload_dir: PathBuf,
    /// Public origin prepended to file URLs (e.g. `http://localhost:8080`).
    /// When unset, URLs are root-relative.
    pub base_url: Option<String>,
    /// Path under which the route layer serves files (e.g. `/api/media`).
    pub mount_prefix: String,
    pub enable_backup: bool,
    /// Backup root; relative paths resolve against `upload_dir`.
    pub backup_dir: PathBuf,
    /// Whether retention sweeps also prune the backup copies of swept files.
    pub sweep_backup: bool,
}

impl LocalStorageConfig {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            ..Self::default()
        }
    }

    /// Backup root when mirroring is enabled.
    pub fn backup_dir(&self) -> Option<&Path> {
        self.enable_backup.then_some(self.backup_dir.as_path())
    }
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(UPLOAD_DIR),
            base_url: None,
            mount_prefix: MOUNT_PREFIX.to_string(),
            enable_backup: true,
            backup_dir: PathBuf::from(BACKUP_DIR),
            sweep_backup: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct S3Config {
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Custom endpoint for S3-compatible services (MinIO, DigitalOcean Spaces, etc.)
    pub endpoint: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: S3_REGION.to_string(),
            bucket: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            endpoint: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: CLOUDINARY_FOLDER.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GcsConfig {
    pub project_id: String,
    pub key_filename: String,
    pub bucket: String,
}

/// Retention sweep schedule
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Files whose modification time is older than this many days are swept.
    pub days: u32,
    pub interval_secs: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days: RETENTION_DAYS,
            interval_secs: RETENTION_INTERVAL_SECS,
        }
    }
}

/// Storage configuration for the whole process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageConfig {
    pub provider: StorageBackend,
    pub local: LocalStorageConfig,
    pub s3: S3Config,
    pub cloudinary: CloudinaryConfig,
    pub gcs: GcsConfig,
    pub upload_policy: UploadPolicy,
    pub retention: RetentionConfig,
}

impl StorageConfig {
    /// Local provider configuration rooted at `upload_dir`, all other settings default.
    pub fn local(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            local: LocalStorageConfig::new(upload_dir),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset. Unparseable numbers and booleans fall back
    /// to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let flag = |key: &str, default: bool| {
            var(key)
                .and_then(|v| v.to_lowercase().parse::<bool>().ok())
                .unwrap_or(default)
        };

        let provider = StorageBackend::from_discriminator(var("STORAGE_PROVIDER").as_deref());

        let local_defaults = LocalStorageConfig::default();
        let local = LocalStorageConfig {
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(local_defaults.upload_dir),
            base_url: var("BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            mount_prefix: var("MEDIA_MOUNT_PREFIX")
                .map(|prefix| normalize_mount_prefix(&prefix))
                .unwrap_or(local_defaults.mount_prefix),
            enable_backup: flag("ENABLE_BACKUP", local_defaults.enable_backup),
            backup_dir: var("BACKUP_DIR")
                .map(PathBuf::from)
                .unwrap_or(local_defaults.backup_dir),
            sweep_backup: flag("SWEEP_BACKUP", local_defaults.sweep_backup),
        };

        let s3 = S3Config {
            region: var("AWS_REGION").unwrap_or_else(|| S3_REGION.to_string()),
            bucket: var("AWS_S3_BUCKET").unwrap_or_default(),
            access_key_id: var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            endpoint: var("AWS_S3_ENDPOINT"),
        };

        let cloudinary = CloudinaryConfig {
            cloud_name: var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            api_key: var("CLOUDINARY_API_KEY").unwrap_or_default(),
            api_secret: var("CLOUDINARY_API_SECRET").unwrap_or_default(),
            folder: var("CLOUDINARY_FOLDER").unwrap_or_else(|| CLOUDINARY_FOLDER.to_string()),
        };

        let gcs = GcsConfig {
            project_id: var("GCP_PROJECT_ID").unwrap_or_default(),
            key_filename: var("GCP_KEY_FILE").unwrap_or_default(),
            bucket: var("GCS_BUCKET").unwrap_or_default(),
        };

        let max_file_size_mb = var("MAX_FILE_SIZE_MB")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);
        let mut upload_policy = UploadPolicy::default().with_max_file_size_mb(max_file_size_mb);
        if let Some(types) = var("ALLOWED_CONTENT_TYPES") {
            upload_policy.allowed_content_types = types
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        let retention = RetentionConfig {
            days: var("RETENTION_DAYS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(RETENTION_DAYS),
            interval_secs: var("RETENTION_INTERVAL_SECS")
                .and_then(|v| v.parse().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(RETENTION_INTERVAL_SECS),
        };

        StorageConfig {
            provider,
            local,
            s3,
            cloudinary,
            gcs,
            upload_policy,
            retention,
        }
    }
}

/// `api/media/` -> `/api/media`; `/` -> empty prefix.
fn normalize_mount_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> StorageConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorageConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, StorageConfig::default());
        assert_eq!(config.provider, StorageBackend::Local);
        assert_eq!(config.local.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.local.mount_prefix, "/api/media");
        assert_eq!(config.local.backup_dir(), Some(Path::new("backup")));
        assert_eq!(config.s3.region, "us-east-1");
        assert_eq!(config.cloudinary.folder, "constructpro");
        assert_eq!(config.upload_policy.max_file_size_bytes, 50 * 1024 * 1024);
        assert_eq!(config.retention.days, 30);
    }

    #[test]
    fn reads_provider_settings() {
        let config = config_from(&[
            ("STORAGE_PROVIDER", "s3"),
            ("AWS_S3_BUCKET", "site-photos"),
            ("AWS_REGION", "eu-west-1"),
            ("AWS_ACCESS_KEY_ID", "AKIA"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_S3_ENDPOINT", "http://localhost:9000"),
        ]);
        assert_eq!(config.provider, StorageBackend::S3);
        assert_eq!(config.s3.bucket, "site-photos");
        assert_eq!(config.s3.region, "eu-west-1");
        assert_eq!(config.s3.endpoint.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn unknown_provider_falls_back_to_local() {
        let config = config_from(&[("STORAGE_PROVIDER", "dropbox")]);
        assert_eq!(config.provider, StorageBackend::Local);
    }

    #[test]
    fn local_settings_are_normalized() {
        let config = config_from(&[
            ("UPLOAD_DIR", "/srv/constructpro"),
            ("BASE_URL", "https://cdn.example.com/"),
            ("MEDIA_MOUNT_PREFIX", "static/media/"),
            ("ENABLE_BACKUP", "FALSE"),
            ("SWEEP_BACKUP", "not-a-bool"),
        ]);
        assert_eq!(config.local.upload_dir, PathBuf::from("/srv/constructpro"));
        assert_eq!(
            config.local.base_url.as_deref(),
            Some("https://cdn.example.com")
        );
        assert_eq!(config.local.mount_prefix, "/static/media");
        assert_eq!(config.local.backup_dir(), None);
        assert!(config.local.sweep_backup);
    }

    #[test]
    fn policy_and_retention_overrides() {
        let config = config_from(&[
            ("MAX_FILE_SIZE_MB", "5"),
            ("ALLOWED_CONTENT_TYPES", "image/png, VIDEO/MP4,"),
            ("RETENTION_DAYS", "7"),
            ("RETENTION_INTERVAL_SECS", "0"),
        ]);
        assert_eq!(config.upload_policy.max_file_size_bytes, 5 * 1024 * 1024);
        assert_eq!(
            config.upload_policy.allowed_content_types,
            vec!["image/png".to_string(), "video/mp4".to_string()]
        );
        assert_eq!(config.retention.days, 7);
        assert_eq!(config.retention.interval_secs, 3600);
    }

    #[test]
    fn mount_prefix_root_is_empty() {
        assert_eq!(normalize_mount_prefix("/"), "");
        assert_eq!(normalize_mount_prefix("/files"), "/files");
    }
}
