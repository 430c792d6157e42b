//! Aggregate views over the media tree.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Counts and byte totals across the `images` and `videos` subdirectories.
///
/// Advisory only: a walk running alongside uploads or deletes may observe a
/// partial view of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total_files: u64,
    pub total_size: u64,
    pub image_count: u64,
    pub video_count: u64,
}

/// Liveness probe for the local media root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageHealth {
    pub media_root: PathBuf,
    pub exists: bool,
    pub writable: bool,
    pub backup_enabled: bool,
}

impl StorageHealth {
    pub fn is_healthy(&self) -> bool {
        self.exists && self.writable
    }
}
