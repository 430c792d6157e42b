//! Media models: upload input, upload result and per-file metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Media classification used to pick a subdirectory of the media tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Every MIME type under `video/` is a video; anything else is stored as an image.
    pub fn from_mime_type(mime_type: &str) -> Self {
        if mime_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    /// Subdirectory name holding this kind of media.
    pub fn subdir(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A file already received by the upload middleware and parked on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    pub temp_path: PathBuf,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDescriptor {
    pub file_name: String,
    /// Absolute path on disk; only meaningful for the local provider.
    pub file_path: PathBuf,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// Metadata for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// File name without its extension (the generated UUID).
    pub id: String,
    pub file_name: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub size: u64,
    /// Falls back to the modification time where birth time is unavailable.
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_video_prefix_only() {
        assert_eq!(MediaKind::from_mime_type("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime_type("video/quicktime"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime_type("image/jpeg"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime_type("application/pdf"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime_type("Video/mp4"), MediaKind::Image);
    }

    #[test]
    fn descriptor_serializes_type_field() {
        let descriptor = MediaDescriptor {
            file_name: "abc.jpg".to_string(),
            file_path: PathBuf::from("/srv/uploads/media/images/abc.jpg"),
            url: "/api/media/files/images/abc.jpg".to_string(),
            kind: MediaKind::Image,
        };

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["fileName"], "abc.jpg");
        assert_eq!(json["url"], "/api/media/files/images/abc.jpg");
    }

    #[test]
    fn file_info_serializes_camel_case_timestamps() {
        let at = DateTime::parse_from_rfc3339("2024-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let info = FileInfo {
            id: "abc".to_string(),
            file_name: "abc.mp4".to_string(),
            kind: MediaKind::Video,
            size: 42,
            created_at: at,
            modified_at: at,
            url: "/api/media/files/videos/abc.mp4".to_string(),
        };

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["type"], "video");
        assert_eq!(json["createdAt"], "2024-03-01T08:00:00Z");
        assert!(json.get("modifiedAt").is_some());
    }
}
