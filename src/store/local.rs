//! Local filesystem slot backend.
//!
//! One JSON file per slot under a root directory. Writes are atomic
//! (temp file + rename) so a concurrent reader never observes a torn
//! payload; a missing file reads as `None`.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::store::SlotStorage;

/// File-per-slot storage backend.
#[derive(Clone)]
pub struct LocalSlotStorage {
    root_dir: PathBuf,
}

impl LocalSlotStorage {
    /// Create a backend rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// File path for a slot key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SlotStorage for LocalSlotStorage {
    async fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn write_slot(&self, key: &str, payload: &str) -> Result<()> {
        let path = self.path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(payload.as_bytes()).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalSlotStorage::new(tmp.path());

        storage.write_slot("edu_tasks", "[]").await.unwrap();
        let payload = storage.read_slot("edu_tasks").await.unwrap();
        assert_eq!(payload.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_read_missing_slot() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalSlotStorage::new(tmp.path());

        assert!(storage.read_slot("edu_events").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_replaces_previous_value() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalSlotStorage::new(tmp.path());

        storage.write_slot("edu_tasks", "[1]").await.unwrap();
        storage.write_slot("edu_tasks", "[1,2]").await.unwrap();

        let payload = storage.read_slot("edu_tasks").await.unwrap();
        assert_eq!(payload.as_deref(), Some("[1,2]"));
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalSlotStorage::new(tmp.path());

        storage.write_slot("edu_tasks", "[]").await.unwrap();
        assert!(!tmp.path().join("edu_tasks.tmp").exists());
    }
}
