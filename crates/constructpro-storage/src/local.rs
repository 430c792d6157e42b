use crate::gateway::{FileStat, FileSystemGateway};
use crate::taxonomy::{
    generate_file_name, relative_path, validate_file_name, MEDIA_DIR, SEARCH_ORDER, TAXONOMY,
};
use crate::traits::{StorageError, StorageProvider, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use constructpro_core::{
    FileInfo, LocalStorageConfig, MediaDescriptor, MediaKind, StorageHealth, StorageStats,
    UploadedFile,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Local filesystem storage provider
///
/// Owns the media tree under `{upload_dir}/media` and, when backup is enabled,
/// a mirror of it under the backup root. All I/O goes through the gateway.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    gateway: FileSystemGateway,
    media_root: PathBuf,
    backup_root: Option<PathBuf>,
    base_url: Option<String>,
    mount_prefix: String,
    sweep_backup: bool,
}

impl LocalStorageProvider {
    /// Create a new LocalStorageProvider and its directory taxonomy.
    ///
    /// Fails if any directory of the media tree (or the backup mirror) cannot
    /// be created; callers treat this as fatal at startup.
    pub async fn new(config: &LocalStorageConfig) -> StorageResult<Self> {
        let gateway = FileSystemGateway::open(&config.upload_dir).await?;
        let media_root = gateway.resolve(MEDIA_DIR);
        let backup_root = config.backup_dir().map(|dir| gateway.resolve(dir));

        let provider = LocalStorageProvider {
            gateway,
            media_root,
            backup_root,
            base_url: config
                .base_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
            mount_prefix: config.mount_prefix.trim_end_matches('/').to_string(),
            sweep_backup: config.sweep_backup,
        };
        provider.ensure_taxonomy().await?;

        tracing::info!(
            media_root = %provider.media_root.display(),
            backup_root = ?provider.backup_root,
            "Local storage initialized"
        );

        Ok(provider)
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    pub fn backup_root(&self) -> Option<&Path> {
        self.backup_root.as_deref()
    }

    async fn ensure_taxonomy(&self) -> StorageResult<()> {
        for root in std::iter::once(&self.media_root).chain(self.backup_root.as_ref()) {
            for subdir in TAXONOMY {
                self.gateway.ensure_directory(root.join(subdir)).await?;
            }
        }
        Ok(())
    }

    fn primary_path(&self, kind: MediaKind, file_name: &str) -> PathBuf {
        self.media_root.join(relative_path(kind, file_name))
    }

    /// Best effort: a failed mirror write leaves the upload in place.
    async fn mirror_to_backup(&self, kind: MediaKind, file_name: &str) {
        let Some(backup_root) = &self.backup_root else {
            return;
        };
        let backup_path = backup_root.join(relative_path(kind, file_name));

        if let Err(e) = self
            .gateway
            .copy_file(self.primary_path(kind, file_name), &backup_path)
            .await
        {
            tracing::warn!(
                error = %e,
                file_name = %file_name,
                backup_path = %backup_path.display(),
                "Failed to write backup copy, primary file kept"
            );
        }
    }

    /// Best effort: failures are logged and swallowed.
    async fn prune_backup(&self, kind: MediaKind, file_name: &str) {
        let Some(backup_root) = &self.backup_root else {
            return;
        };
        let backup_path = backup_root.join(relative_path(kind, file_name));

        if let Err(e) = self.gateway.delete_file(&backup_path).await {
            tracing::warn!(
                error = %e,
                file_name = %file_name,
                backup_path = %backup_path.display(),
                "Failed to delete backup copy"
            );
        }
    }

    /// Stat a file, treating a file that vanished mid-walk as absent.
    async fn stat_if_present(&self, path: &Path) -> StorageResult<Option<FileStat>> {
        match self.gateway.stat_file(path).await {
            Ok(stat) => Ok(Some(stat)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// File counts and byte totals across `images` and `videos`.
    pub async fn get_stats(&self) -> StorageResult<StorageStats> {
        let mut stats = StorageStats::default();

        for kind in SEARCH_ORDER {
            for path in self.gateway.list_files(self.media_root.join(kind.subdir())).await? {
                let Some(stat) = self.stat_if_present(&path).await? else {
                    continue;
                };

                stats.total_files += 1;
                stats.total_size += stat.size;
                match kind {
                    MediaKind::Image => stats.image_count += 1,
                    MediaKind::Video => stats.video_count += 1,
                }
            }
        }

        Ok(stats)
    }

    /// Delete every image and video whose modification time is strictly older
    /// than `days` days. Returns the number of files this call removed.
    ///
    /// Files removed concurrently by someone else are not counted. Per-file
    /// failures are logged and skipped. When `sweep_backup` is set, the backup
    /// copy of each swept file is pruned as well.
    pub async fn cleanup_older_than(&self, days: u32) -> StorageResult<usize> {
        let start = Instant::now();
        let Some(cutoff) = Utc::now().checked_sub_signed(ChronoDuration::days(i64::from(days)))
        else {
            return Ok(0);
        };

        let mut deleted = 0usize;
        for kind in SEARCH_ORDER {
            for path in self.gateway.list_files(self.media_root.join(kind.subdir())).await? {
                let stat = match self.stat_if_present(&path).await {
                    Ok(Some(stat)) => stat,
                    Ok(None) => continue,
                    Err(e) => {
                        tracing::error!(error = %e, path = %path.display(), "Failed to stat file during cleanup");
                        continue;
                    }
                };

                if DateTime::<Utc>::from(stat.modified) >= cutoff {
                    continue;
                }

                match self.gateway.delete_file(&path).await {
                    Ok(true) => {
                        deleted += 1;
                        if self.sweep_backup {
                            if let Some(file_name) = path.file_name() {
                                self.prune_backup(kind, &file_name.to_string_lossy()).await;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::error!(error = %e, path = %path.display(), "Failed to delete expired file");
                    }
                }
            }
        }

        tracing::info!(
            days,
            deleted,
            cutoff = %cutoff,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage cleanup completed"
        );

        Ok(deleted)
    }

    pub async fn health(&self) -> StorageHealth {
        StorageHealth {
            media_root: self.media_root.clone(),
            exists: self.gateway.exists(&self.media_root).await,
            writable: self.gateway.is_writable(&self.media_root).await,
            backup_enabled: self.backup_root.is_some(),
        }
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    async fn upload(&self, file: UploadedFile) -> StorageResult<MediaDescriptor> {
        let start = Instant::now();
        let kind = MediaKind::from_mime_type(&file.mime_type);
        let file_name = generate_file_name(&file.original_name);
        let file_path = self.primary_path(kind, &file_name);

        self.gateway
            .move_file(&file.temp_path, &file_path)
            .await
            .map_err(StorageError::UploadFailed)?;

        self.mirror_to_backup(kind, &file_name).await;

        let url = self.get_file_url(kind, &file_name);

        tracing::info!(
            path = %file_path.display(),
            file_name = %file_name,
            original_name = %file.original_name,
            kind = %kind,
            size_bytes = file.size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(MediaDescriptor {
            file_name,
            file_path,
            url,
            kind,
        })
    }

    async fn delete(&self, file_name: &str) -> StorageResult<bool> {
        validate_file_name(file_name)?;

        for kind in SEARCH_ORDER {
            if self
                .gateway
                .delete_file(self.primary_path(kind, file_name))
                .await?
            {
                self.prune_backup(kind, file_name).await;
                tracing::info!(file_name = %file_name, kind = %kind, "Local storage delete successful");
                return Ok(true);
            }
        }

        tracing::debug!(file_name = %file_name, "Nothing to delete");
        Ok(false)
    }

    async fn get_file_info(&self, file_name: &str) -> StorageResult<Option<FileInfo>> {
        validate_file_name(file_name)?;

        for kind in SEARCH_ORDER {
            if let Some(stat) = self
                .stat_if_present(&self.primary_path(kind, file_name))
                .await?
            {
                let modified_at = DateTime::<Utc>::from(stat.modified);
                return Ok(Some(FileInfo {
                    id: Path::new(file_name)
                        .file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                        .unwrap_or_else(|| file_name.to_string()),
                    file_name: file_name.to_string(),
                    kind,
                    size: stat.size,
                    created_at: stat.created.map(DateTime::<Utc>::from).unwrap_or(modified_at),
                    modified_at,
                    url: self.get_file_url(kind, file_name),
                }));
            }
        }

        Ok(None)
    }

    fn get_file_url(&self, kind: MediaKind, file_name: &str) -> String {
        format!(
            "{}{}/files/{}",
            self.base_url.as_deref().unwrap_or(""),
            self.mount_prefix,
            relative_path(kind, file_name)
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
