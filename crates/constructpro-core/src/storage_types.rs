use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage provider kinds
///
/// Selected once at startup through `STORAGE_PROVIDER`. Only `Local` performs
/// real I/O; the remote kinds are contract stubs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    S3,
    Cloudinary,
    Gcs,
}

impl StorageBackend {
    /// Parse a provider discriminator, falling back to `Local` for missing or
    /// unknown values.
    pub fn from_discriminator(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => StorageBackend::Local,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(provider = %raw, "Unknown storage provider, defaulting to local");
                StorageBackend::Local
            }),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "s3" => Ok(StorageBackend::S3),
            "cloudinary" => Ok(StorageBackend::Cloudinary),
            "gcs" => Ok(StorageBackend::Gcs),
            _ => Err(anyhow::anyhow!("Invalid storage provider: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Cloudinary => write!(f, "cloudinary"),
            StorageBackend::Gcs => write!(f, "gcs"),
        }
    }
}
