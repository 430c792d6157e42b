//! media-storage: operator CLI for the ConstructPro media store.
//!
//! Reads the same environment as the application (`STORAGE_PROVIDER`,
//! `UPLOAD_DIR`, ...). Maintenance commands (stats, sweep, watch, health) only
//! work against the local provider.

use clap::{Parser, Subcommand};
use constructpro_cli::{
    failure_message, format_stats_table, guess_mime_type, init_tracing, log_error,
    upload_from_path,
};
use constructpro_core::{AppError, StorageBackend, StorageConfig, UploadedFile};
use constructpro_storage::{
    create_storage, validate_storage_config, LocalStorageProvider, RetentionSweeper,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "media-storage", about = "ConstructPro media storage maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image or video (the source is removed unless --copy is given)
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// MIME type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
        /// Keep the source file
        #[arg(long)]
        copy: bool,
    },
    /// Delete a stored file (and its backup copy) by name
    Delete { file_name: String },
    /// Show size, type and URL of a stored file
    Info { file_name: String },
    /// File counts and sizes across images and videos
    Stats {
        /// Output format: json or table (default: table)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Delete files older than the retention period once
    Sweep {
        /// Override RETENTION_DAYS
        #[arg(long)]
        days: Option<u32>,
    },
    /// Run the retention sweep on RETENTION_INTERVAL_SECS until interrupted
    Watch,
    /// Check that the media root exists and is writable
    Health,
    /// Report missing settings for the selected provider
    CheckConfig,
}

fn print_json(value: &impl Serialize) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{}", out);
    Ok(())
}

async fn local_storage(config: &StorageConfig) -> Result<Arc<LocalStorageProvider>, AppError> {
    if config.provider != StorageBackend::Local {
        return Err(AppError::NotImplemented(format!(
            "maintenance commands require STORAGE_PROVIDER=local (configured: {})",
            config.provider
        )));
    }
    Ok(Arc::new(LocalStorageProvider::new(&config.local).await?))
}

async fn run(cli: Cli, config: StorageConfig) -> Result<(), AppError> {
    match cli.command {
        Commands::Upload { file, mime, copy } => {
            let file = tokio::fs::canonicalize(&file).await?;
            let metadata = tokio::fs::metadata(&file).await?;
            let original_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| AppError::InvalidInput(format!("{} is not a file", file.display())))?;

            let upload = UploadedFile {
                original_name,
                mime_type: mime.unwrap_or_else(|| guess_mime_type(&file)),
                size: metadata.len(),
                temp_path: file,
            };
            config.upload_policy.validate(&upload)?;

            let storage = create_storage(&config).await?;
            let descriptor =
                upload_from_path(storage.as_ref(), upload, &config.local.upload_dir, copy).await?;
            print_json(&descriptor)?;
        }
        Commands::Delete { file_name } => {
            let storage = create_storage(&config).await?;
            let deleted = storage.delete(&file_name).await?;
            if !deleted {
                return Err(AppError::NotFound(format!("File {} not found", file_name)));
            }
            print_json(&serde_json::json!({ "success": true, "fileName": file_name }))?;
        }
        Commands::Info { file_name } => {
            let storage = create_storage(&config).await?;
            let info = storage
                .get_file_info(&file_name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("File {} not found", file_name)))?;
            print_json(&info)?;
        }
        Commands::Stats { format } => {
            let stats = local_storage(&config).await?.get_stats().await?;
            match format.as_str() {
                "json" => print_json(&stats)?,
                _ => println!("{}", format_stats_table(&stats)),
            }
        }
        Commands::Sweep { days } => {
            let storage = local_storage(&config).await?;
            let days = days.unwrap_or(config.retention.days);
            let deleted = storage.cleanup_older_than(days).await?;
            print_json(&serde_json::json!({ "deleted": deleted, "days": days }))?;
        }
        Commands::Watch => {
            let storage = local_storage(&config).await?;
            let sweeper = Arc::new(RetentionSweeper::new(storage, &config.retention));
            tracing::info!(
                days = sweeper.retention_days(),
                interval_secs = config.retention.interval_secs,
                "Retention sweeper running, press Ctrl-C to stop"
            );
            let handle = sweeper.start();
            tokio::signal::ctrl_c().await?;
            handle.abort();
            tracing::info!("Retention sweeper stopped");
        }
        Commands::Health => {
            let health = local_storage(&config).await?.health().await;
            print_json(&health)?;
            if !health.is_healthy() {
                return Err(AppError::Storage(format!(
                    "media root {} is not writable",
                    health.media_root.display()
                )));
            }
        }
        Commands::CheckConfig => {
            let errors = validate_storage_config(&config);
            print_json(&serde_json::json!({
                "provider": config.provider,
                "valid": errors.is_empty(),
                "errors": errors,
            }))?;
            if !errors.is_empty() {
                return Err(AppError::Config(errors.join("; ")));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = StorageConfig::from_env();
    let cli = Cli::parse();

    if let Err(err) = run(cli, config).await {
        log_error(&err);
        anyhow::bail!("{}", failure_message(&err));
    }

    Ok(())
}
