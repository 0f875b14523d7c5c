//! On-disk layout of the data directory.

use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Metadata document file name.
pub const METADATA_FILE: &str = "files-metadata.json";

/// Configuration document file name.
pub const CONFIG_FILE: &str = "config.json";

/// Where every persisted artefact lives.
///
/// ```text
/// <data_dir>/config.json
/// <data_dir>/files-metadata.json
/// <data_dir>/uploads/            uploaded originals
/// <data_dir>/converted/          PDF first-page previews
/// <static_dir>/logo.<ext>        singleton logo
/// <static_dir>/widgets/          widget images
/// ```
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub converted_dir: PathBuf,
    pub static_dir: PathBuf,
    pub widgets_dir: PathBuf,
    pub config_file: PathBuf,
    pub metadata_file: PathBuf,
}

impl StorageLayout {
    pub fn new(data_dir: impl Into<PathBuf>, static_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let static_dir = static_dir.into();
        Self {
            uploads_dir: data_dir.join("uploads"),
            converted_dir: data_dir.join("converted"),
            widgets_dir: static_dir.join("widgets"),
            config_file: data_dir.join(CONFIG_FILE),
            metadata_file: data_dir.join(METADATA_FILE),
            data_dir,
            static_dir,
        }
    }

    /// Layout with the static directory at `<data_dir>/static`.
    pub fn under(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let static_dir = data_dir.join("static");
        Self::new(data_dir, static_dir)
    }

    /// Create every directory the server writes into.
    pub async fn ensure_dirs(&self) -> Result<(), StoreError> {
        for dir in [
            &self.uploads_dir,
            &self.converted_dir,
            &self.static_dir,
            &self.widgets_dir,
        ] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io(dir, e))?;
        }
        Ok(())
    }
}

/// Remove `path`, treating an already missing file as success.
pub async fn remove_file_if_exists(path: &Path) -> Result<(), StoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "File already absent");
            Ok(())
        }
        Err(e) => Err(StoreError::io(path, e)),
    }
}
