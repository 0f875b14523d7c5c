//! Whole-document persistence.
//!
//! Both stores keep their state as one JSON value that is read, modified
//! and written back in full. [`DocumentStore`] is the seam between them and
//! the storage medium.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::StoreError;

/// Load/save contract for a single JSON document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the document. `Ok(None)` means it does not exist yet.
    async fn load(&self) -> Result<Option<Value>, StoreError>;

    /// Replace the document with `doc`.
    async fn save(&self, doc: &Value) -> Result<(), StoreError>;
}

/// A document stored as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileDocument {
    path: PathBuf,
}

impl JsonFileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocument {
    async fn load(&self) -> Result<Option<Value>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.to_string_lossy().to_string(),
                source,
            })
    }

    async fn save(&self, doc: &Value) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(doc).map_err(StoreError::Serialize)?;

        // Write beside the target and rename so readers never see a torn file.
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

/// An in-memory document.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    value: Mutex<Option<Value>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document that already holds `value`.
    pub fn with_value(value: Value) -> Self {
        Self {
            value: Mutex::new(Some(value)),
        }
    }

    /// Current contents, if any were saved.
    pub async fn snapshot(&self) -> Option<Value> {
        self.value.lock().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocument {
    async fn load(&self) -> Result<Option<Value>, StoreError> {
        Ok(self.value.lock().await.clone())
    }

    async fn save(&self, doc: &Value) -> Result<(), StoreError> {
        *self.value.lock().await = Some(doc.clone());
        Ok(())
    }
}
