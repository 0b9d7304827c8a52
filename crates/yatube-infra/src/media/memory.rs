//! In-memory media storage for tests and database-less runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::ports::{MediaStorage, StorageError};

use super::{candidate_names, check_segment};

#[derive(Default)]
pub struct InMemoryMediaStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a stored file.
    pub async fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files.read().await.get(path).cloned()
    }
}

#[async_trait]
impl MediaStorage for InMemoryMediaStorage {
    async fn save(&self, dir: &str, file_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        check_segment(dir)?;
        check_segment(file_name)?;

        let mut files = self.files.write().await;
        let path = candidate_names(file_name)
            .map(|name| format!("{dir}/{name}"))
            .find(|path| !files.contains_key(path))
            .ok_or_else(|| StorageError::Io(format!("no free name for {dir}/{file_name}")))?;

        files.insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn exists(&self, path: &str) -> bool {
        self.files.read().await.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_read_and_collide() {
        let storage = InMemoryMediaStorage::new();

        let first = storage.save("posts", "small.gif", b"one").await.unwrap();
        let second = storage.save("posts", "small.gif", b"two").await.unwrap();

        assert_eq!(first, "posts/small.gif");
        assert_ne!(first, second);
        assert_eq!(storage.read(&first).await.unwrap(), b"one");
        assert_eq!(storage.read(&second).await.unwrap(), b"two");
    }
}
