//! Filesystem media storage rooted at `MEDIA_ROOT`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use yatube_core::ports::{MediaStorage, StorageError};

use super::{candidate_names, check_segment};

/// Stores media files under a root directory, one subdirectory per prefix.
pub struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn save(&self, dir: &str, file_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        check_segment(dir)?;
        check_segment(file_name)?;

        let dir_path = self.root.join(dir);
        fs::create_dir_all(&dir_path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        for name in candidate_names(file_name) {
            // create_new makes the existence check and the claim one step
            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir_path.join(&name))
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(StorageError::Io(e.to_string())),
            };

            file.write_all(bytes)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
            file.flush()
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;

            let stored = format!("{dir}/{name}");
            tracing::debug!(path = %stored, size = bytes.len(), "Stored media file");
            return Ok(stored);
        }

        Err(StorageError::Io(format!(
            "no free name for {dir}/{file_name}"
        )))
    }

    async fn exists(&self, path: &str) -> bool {
        if path.split('/').any(|segment| check_segment(segment).is_err()) {
            return false;
        }
        fs::try_exists(self.root.join(path)).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_root() -> PathBuf {
        std::env::temp_dir().join(format!("yatube-media-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_save_and_collide() {
        let root = scratch_root();
        let storage = LocalMediaStorage::new(&root);

        let first = storage.save("posts", "small.gif", b"GIF89a").await.unwrap();
        assert_eq!(first, "posts/small.gif");
        assert!(storage.exists(&first).await);

        let second = storage.save("posts", "small.gif", b"GIF89a").await.unwrap();
        assert_ne!(second, first);
        assert!(second.starts_with("posts/small_"));
        assert!(storage.exists(&second).await);

        let stored = fs::read(root.join(&first)).await.unwrap();
        assert_eq!(stored, b"GIF89a");

        fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let storage = LocalMediaStorage::new(scratch_root());

        assert!(storage.save("..", "x.gif", b"").await.is_err());
        assert!(storage.save("posts", "../x.gif", b"").await.is_err());
        assert!(!storage.exists("../etc/passwd").await);
    }
}
