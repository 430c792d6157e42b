//! Helpers shared by the `media-storage` operator binary.

use constructpro_core::{
    AppError, ErrorMetadata, LogLevel, MediaDescriptor, StorageBackend, StorageStats, UploadedFile,
};
use constructpro_storage::StorageProvider;
use std::path::{Path, PathBuf};

/// Fallback when the extension says nothing about the content.
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Staging directory for local uploads, inside the upload root so the final
/// rename stays on one filesystem.
const STAGING_DIR: &str = "tmp";

/// Initialize tracing for CLI binaries.
///
/// `RUST_LOG` controls filtering (default `info`); `LOG_FORMAT=json` switches
/// to structured JSON lines.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// MIME type from the file extension.
pub fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string())
}

/// Copy `source` into the staging area under `upload_dir`, on the same
/// filesystem as the media tree. Returns an absolute path.
pub async fn stage_copy(source: &Path, upload_dir: &Path) -> std::io::Result<PathBuf> {
    let staging = upload_dir.join(STAGING_DIR);
    tokio::fs::create_dir_all(&staging).await?;

    let staged = staging.join(uuid::Uuid::new_v4().to_string());
    tokio::fs::copy(source, &staged).await?;
    tokio::fs::canonicalize(&staged).await
}

/// Upload an operator-supplied file.
///
/// For the local provider the file is first staged under `upload_dir`, so the
/// provider's rename never crosses filesystems. The staged copy is removed if
/// the upload fails; the source is removed after a successful upload unless
/// `keep_source` is set. Other providers get the source path as is.
pub async fn upload_from_path(
    storage: &dyn StorageProvider,
    mut file: UploadedFile,
    upload_dir: &Path,
    keep_source: bool,
) -> Result<MediaDescriptor, AppError> {
    if storage.backend_type() != StorageBackend::Local {
        return Ok(storage.upload(file).await?);
    }

    let source = file.temp_path.clone();
    let staged = stage_copy(&source, upload_dir).await?;
    file.temp_path = staged.clone();

    match storage.upload(file).await {
        Ok(descriptor) => {
            if !keep_source {
                if let Err(e) = tokio::fs::remove_file(&source).await {
                    tracing::warn!(error = %e, path = %source.display(), "Uploaded, but failed to remove source file");
                }
            }
            Ok(descriptor)
        }
        Err(err) => {
            if let Err(e) = tokio::fs::remove_file(&staged).await {
                tracing::warn!(error = %e, path = %staged.display(), "Failed to remove staged copy");
            }
            Err(err.into())
        }
    }
}

/// Log an error at the level its metadata asks for.
pub fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, "Command failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, "Command failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, code, "Command failed");
        }
    }
}

/// Message shown to the operator: the client message for sensitive errors,
/// the full error otherwise, followed by the suggested action if any.
pub fn failure_message(error: &AppError) -> String {
    let message = if error.is_sensitive() {
        error.client_message()
    } else {
        error.to_string()
    };

    match error.suggested_action() {
        Some(action) => format!("{} ({})", message, action),
        None => message,
    }
}

pub fn size_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

pub fn format_stats_table(stats: &StorageStats) -> String {
    format!(
        "{:<10} {:>10}\n{:<10} {:>10}\n{:<10} {:>10}\n{:<10} {:>10}\n{:<10} {:>10.2}",
        "Images",
        stats.image_count,
        "Videos",
        stats.video_count,
        "Total",
        stats.total_files,
        "Bytes",
        stats.total_size,
        "MB",
        size_mb(stats.total_size),
    )
}
