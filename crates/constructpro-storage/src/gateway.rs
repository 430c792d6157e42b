//! Filesystem gateway
//!
//! The only place in the crate that touches the filesystem. Relative paths are
//! resolved against a root fixed at construction; absolute paths (such as a
//! temp file handed over by the upload middleware) are used as given.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tokio::fs;

/// Classification of filesystem failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorKind {
    NotFound,
    PermissionDenied,
    DiskFull,
    /// Destination already exists.
    Conflict,
    Other,
}

impl FsErrorKind {
    fn classify(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => FsErrorKind::PermissionDenied,
            io::ErrorKind::AlreadyExists => FsErrorKind::Conflict,
            io::ErrorKind::StorageFull => FsErrorKind::DiskFull,
            _ => FsErrorKind::Other,
        }
    }
}

impl Display for FsErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FsErrorKind::NotFound => write!(f, "not found"),
            FsErrorKind::PermissionDenied => write!(f, "permission denied"),
            FsErrorKind::DiskFull => write!(f, "disk full"),
            FsErrorKind::Conflict => write!(f, "already exists"),
            FsErrorKind::Other => write!(f, "I/O error"),
        }
    }
}

/// Filesystem operation error
#[derive(Debug, Error)]
#[error("{kind} at {}: {source}", .path.display())]
pub struct FsError {
    pub kind: FsErrorKind,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FsError {
    fn new(path: &Path, source: io::Error) -> Self {
        Self {
            kind: FsErrorKind::classify(&source),
            path: path.to_path_buf(),
            source,
        }
    }

    fn conflict(path: &Path) -> Self {
        Self::new(
            path,
            io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == FsErrorKind::NotFound
    }
}

/// Size and timestamps of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: SystemTime,
    /// Birth time, when the platform and filesystem record one.
    pub created: Option<SystemTime>,
}

#[derive(Debug, Clone)]
pub struct FileSystemGateway {
    root: PathBuf,
}

impl FileSystemGateway {
    /// Create the root directory if needed and pin it as an absolute path.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, FsError> {
        let root = root.into();

        fs::create_dir_all(&root)
            .await
            .map_err(|e| FsError::new(&root, e))?;
        let root = fs::canonicalize(&root)
            .await
            .map_err(|e| FsError::new(&root, e))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Create a directory and all missing ancestors. Succeeds if it already exists.
    pub async fn ensure_directory(&self, path: impl AsRef<Path>) -> Result<PathBuf, FsError> {
        let path = self.resolve(path);
        fs::create_dir_all(&path)
            .await
            .map_err(|e| FsError::new(&path, e))?;
        Ok(path)
    }

    /// Rename `src` to `dst`. Both must be on the same filesystem.
    ///
    /// An existing `dst` is reported as `Conflict` instead of being overwritten.
    pub async fn move_file(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
    ) -> Result<(), FsError> {
        let src = self.resolve(src);
        let dst = self.resolve(dst);

        if fs::try_exists(&dst).await.unwrap_or(false) {
            return Err(FsError::conflict(&dst));
        }

        fs::rename(&src, &dst)
            .await
            .map_err(|e| FsError::new(&src, e))?;

        tracing::debug!(src = %src.display(), dst = %dst.display(), "Moved file");
        Ok(())
    }

    /// Byte-for-byte copy; `src` is left in place. Returns the number of bytes copied.
    pub async fn copy_file(
        &self,
        src: impl AsRef<Path>,
        dst: impl AsRef<Path>,
    ) -> Result<u64, FsError> {
        let src = self.resolve(src);
        let dst = self.resolve(dst);

        if !fs::try_exists(&src).await.unwrap_or(false) {
            return Err(FsError::new(
                &src,
                io::Error::new(io::ErrorKind::NotFound, "source file does not exist"),
            ));
        }

        let bytes = fs::copy(&src, &dst)
            .await
            .map_err(|e| FsError::new(&dst, e))?;

        tracing::debug!(src = %src.display(), dst = %dst.display(), size_bytes = bytes, "Copied file");
        Ok(bytes)
    }

    /// Remove a file. Returns `false` when there was nothing to delete.
    pub async fn delete_file(&self, path: impl AsRef<Path>) -> Result<bool, FsError> {
        let path = self.resolve(path);

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Deleted file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "File not found (already deleted)");
                Ok(false)
            }
            Err(e) => Err(FsError::new(&path, e)),
        }
    }

    /// Regular files directly inside `dir`, sorted by path.
    pub async fn list_files(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, FsError> {
        let dir = self.resolve(dir);
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| FsError::new(&dir, e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FsError::new(&dir, e))?
        {
            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(FsError::new(&path, e)),
            }
        }

        files.sort();
        Ok(files)
    }

    pub async fn stat_file(&self, path: impl AsRef<Path>) -> Result<FileStat, FsError> {
        let path = self.resolve(path);
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| FsError::new(&path, e))?;
        let modified = metadata.modified().map_err(|e| FsError::new(&path, e))?;

        Ok(FileStat {
            size: metadata.len(),
            modified,
            created: metadata.created().ok(),
        })
    }

    pub async fn exists(&self, path: impl AsRef<Path>) -> bool {
        fs::try_exists(self.resolve(path)).await.unwrap_or(false)
    }

    /// Whether `dir` exists and is not marked read-only.
    pub async fn is_writable(&self, dir: impl AsRef<Path>) -> bool {
        match fs::metadata(self.resolve(dir)).await {
            Ok(metadata) => metadata.is_dir() && !metadata.permissions().readonly(),
            Err(_) => false,
        }
    }
}
