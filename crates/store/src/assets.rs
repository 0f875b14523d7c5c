//! Logo and widget images.
//!
//! Neither has a metadata record: the logo is whichever `logo.*` file sits
//! in the static directory, and a widget image is identified by its file
//! name under `widgets/`.

use std::path::{Path, PathBuf};

use signage_core::error::CoreError;
use signage_core::upload_policy::is_safe_asset_name;

use crate::error::StoreError;
use crate::layout::{remove_file_if_exists, StorageLayout};

const LOGO_PREFIX: &str = "logo.";

#[derive(Debug, Clone)]
pub struct AssetStore {
    static_dir: PathBuf,
    widgets_dir: PathBuf,
}

impl AssetStore {
    pub fn new(layout: &StorageLayout) -> Self {
        Self {
            static_dir: layout.static_dir.clone(),
            widgets_dir: layout.widgets_dir.clone(),
        }
    }

    /// Destination for a logo with extension `ext` (including the dot).
    pub fn logo_path(&self, ext: &str) -> PathBuf {
        self.static_dir.join(format!("logo{ext}"))
    }

    /// Fresh path in the static directory to receive a logo upload before
    /// it replaces the current one. Never matches the `logo.*` pattern.
    pub fn logo_staging_path(&self) -> PathBuf {
        self.static_dir.join(format!(".logo-{}.tmp", uuid::Uuid::new_v4()))
    }

    /// Move a fully written upload at `staged` onto `logo<ext>` and delete
    /// any logo with another extension. The staged file is removed if the
    /// move fails, leaving the current logo in place.
    pub async fn install_logo(&self, staged: &Path, ext: &str) -> Result<PathBuf, StoreError> {
        let target = self.logo_path(ext);
        if let Err(e) = tokio::fs::rename(staged, &target).await {
            if let Err(cleanup) = remove_file_if_exists(staged).await {
                tracing::warn!(
                    path = %staged.display(),
                    error = %cleanup,
                    "Failed to remove staged logo"
                );
            }
            return Err(StoreError::io(&target, e));
        }
        let removed = self.remove_logos_except(&target).await?;
        tracing::info!(path = %target.display(), removed, "Logo replaced");
        Ok(target)
    }

    /// The current logo file, if one was uploaded.
    pub async fn find_logo(&self) -> Result<Option<PathBuf>, StoreError> {
        let mut logos = self.logo_files().await?;
        logos.sort();
        Ok(logos.into_iter().next())
    }

    /// Delete every `logo.*` file other than `keep`. Failures are logged
    /// and skipped. Returns how many files were removed.
    pub async fn remove_logos_except(&self, keep: &Path) -> Result<usize, StoreError> {
        let mut removed = 0;
        for path in self.logo_files().await? {
            if path == keep {
                continue;
            }
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove old logo")
                }
            }
        }
        Ok(removed)
    }

    async fn logo_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.static_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.static_dir, e)),
        };

        let mut logos = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.static_dir, e))?
        {
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file && entry.file_name().to_string_lossy().starts_with(LOGO_PREFIX) {
                logos.push(entry.path());
            }
        }
        Ok(logos)
    }

    /// Fresh widget image id: `widget-<uuid><ext>`.
    pub fn new_widget_image_id(ext: &str) -> String {
        format!("widget-{}{ext}", uuid::Uuid::new_v4())
    }

    /// Path of the widget image `id`. Rejects ids that could escape the
    /// widgets directory.
    pub fn widget_image_path(&self, id: &str) -> Result<PathBuf, CoreError> {
        if !is_safe_asset_name(id) {
            return Err(CoreError::Validation(format!("Invalid widget image id '{id}'")));
        }
        Ok(self.widgets_dir.join(id))
    }

    pub async fn delete_widget_image(&self, id: &str) -> Result<(), StoreError> {
        let path = self.widget_image_path(id)?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(CoreError::not_found("WidgetImage", id).into());
        }
        remove_file_if_exists(&path).await?;
        tracing::info!(id, "Widget image deleted");
        Ok(())
    }
}
