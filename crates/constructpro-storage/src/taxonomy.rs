//! Shared media layout and naming for storage providers.

use crate::traits::{StorageError, StorageResult};
use constructpro_core::MediaKind;
use std::path::Path;
use uuid::Uuid;

/// Media tree directory under the upload root.
pub const MEDIA_DIR: &str = "media";

/// Subdirectories created under the media root and the backup root.
/// `thumbnails` is reserved for derived assets and never counted or swept.
pub const TAXONOMY: [&str; 3] = ["images", "videos", "thumbnails"];

/// Lookup order for name-based operations. A name present in both
/// subdirectories only ever resolves to the `images` copy; UUID naming in
/// `upload` is what keeps names unique.
pub const SEARCH_ORDER: [MediaKind; 2] = [MediaKind::Image, MediaKind::Video];

/// `{uuid}{ext}` where `ext` is the extension of the original name reduced to
/// lower-case ASCII letters and digits (including the dot), or empty when
/// nothing is left. Every generated name passes `validate_file_name`.
pub fn generate_file_name(original_name: &str) -> String {
    format!("{}{}", Uuid::new_v4(), extension_of(original_name))
}

pub fn extension_of(original_name: &str) -> String {
    let ext: String = Path::new(original_name)
        .extension()
        .map(|ext| {
            ext.to_string_lossy()
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect()
        })
        .unwrap_or_default();

    if ext.is_empty() {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Names used for lookups must be a single path component.
pub fn validate_file_name(file_name: &str) -> StorageResult<()> {
    if file_name.is_empty()
        || file_name == "."
        || file_name.contains("..")
        || file_name.contains('/')
        || file_name.contains('\\')
    {
        return Err(StorageError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}

/// Path of a file relative to a taxonomy root, e.g. `images/{file_name}`.
pub fn relative_path(kind: MediaKind, file_name: &str) -> String {
    format!("{}/{}", kind.subdir(), file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lower_cased_and_optional() {
        assert_eq!(extension_of("photo.JPG"), ".jpg");
        assert_eq!(extension_of("walkthrough.final.MOV"), ".mov");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".hidden"), "");
        assert_eq!(extension_of("uploads/site.Png"), ".png");
    }

    #[test]
    fn extension_keeps_only_ascii_alphanumerics() {
        assert_eq!(extension_of("site.a\\b"), ".ab");
        assert_eq!(extension_of("clip.m p4"), ".mp4");
        assert_eq!(extension_of("photo.é"), "");
    }

    #[test]
    fn generated_names_always_validate() {
        for original in ["site.a\\b", "photo.JPG", "README", "x.é", "a..b"] {
            let name = generate_file_name(original);
            assert!(validate_file_name(&name).is_ok(), "{original} -> {name}");
        }
    }

    #[test]
    fn generated_names_are_unique_and_keep_extension() {
        let a = generate_file_name("photo.JPG");
        let b = generate_file_name("photo.JPG");
        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
        assert!(Uuid::parse_str(a.trim_end_matches(".jpg")).is_ok());
    }

    #[test]
    fn rejects_names_that_escape_a_subdirectory() {
        assert!(validate_file_name("a1b2.jpg").is_ok());
        for bad in ["", ".", "..", "../x.jpg", "images/x.jpg", "x\\y.jpg"] {
            assert!(
                matches!(validate_file_name(bad), Err(StorageError::InvalidFileName(_))),
                "{bad} should be rejected"
            );
        }
    }
}
