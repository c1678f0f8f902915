//! File-storage collaborator.
//!
//! The core only ever records the returned reference; retrieval and layout
//! are the store's business. Storage failures propagate as failed
//! operations (unlike notifications).

use async_trait::async_trait;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::MarketError;

/// Opaque reference to a stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef(pub String);

impl FileRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist the bytes and return a retrievable reference
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<FileRef, MarketError>;
}

/// Local-disk store: `{root}/{uuid}-{sanitized name}`
pub struct LocalFileStore {
    root: PathBuf,
    max_bytes: usize,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    fn sanitize(filename: &str) -> String {
        let cleaned: String = filename
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        // Path separators are gone after the map; cap the length too
        cleaned.chars().take(128).collect()
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<FileRef, MarketError> {
        if bytes.is_empty() {
            return Err(MarketError::validation("file", "empty upload"));
        }
        if bytes.len() > self.max_bytes {
            return Err(MarketError::validation(
                "file",
                format!("upload of {} bytes exceeds limit {}", bytes.len(), self.max_bytes),
            ));
        }

        let name = format!("{}-{}", Uuid::new_v4(), Self::sanitize(filename));
        let path = self.root.join(&name);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| MarketError::Storage(format!("mkdir {}: {}", self.root.display(), e)))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| MarketError::Storage(format!("write {}: {}", path.display(), e)))?;

        Ok(FileRef(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_tricks() {
        assert_eq!(
            LocalFileStore::sanitize("../../etc/passwd"),
            ".._.._etc_passwd"
        );
        assert_eq!(LocalFileStore::sanitize("report v2.pdf"), "report_v2.pdf");
        assert_eq!(LocalFileStore::sanitize("ok-file_1.png"), "ok-file_1.png");
    }

    #[tokio::test]
    async fn test_store_and_limits() {
        let dir = std::env::temp_dir().join(format!("cm-store-{}", Uuid::new_v4()));
        let store = LocalFileStore::new(&dir, 16);

        let r = store.store("a.txt", b"hello").await.unwrap();
        assert!(r.as_str().ends_with("-a.txt"));
        let on_disk = tokio::fs::read(dir.join(r.as_str())).await.unwrap();
        assert_eq!(on_disk, b"hello");

        assert!(store.store("big.bin", &[0u8; 17]).await.is_err());
        assert!(store.store("empty.bin", b"").await.is_err());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
