pub mod media;
pub mod storage;

pub use media::{FileInfo, MediaDescriptor, MediaKind, UploadedFile};
pub use storage::{StorageHealth, StorageStats};
