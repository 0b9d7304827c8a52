//! Media storage port - where uploaded post images end up.

use async_trait::async_trait;

/// Storage for uploaded media files.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `bytes` as `{dir}/{file_name}` and return the stored relative path.
    ///
    /// When the name is taken a random suffix is added before the extension,
    /// so the returned path may differ from the requested one.
    async fn save(&self, dir: &str, file_name: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Whether a relative path is stored.
    async fn exists(&self, path: &str) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid media path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(String),
}
