//! Multipart upload intake shared by the asset, logo and widget-image routes.
//!
//! The MIME type is checked before anything touches the disk, the body is
//! streamed to its destination chunk by chunk, and a partial file is never
//! left behind when the transfer fails or exceeds the profile's size limit.

use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use signage_core::file_record::FileKind;
use signage_core::upload_policy::UploadProfile;
use signage_store::{remove_file_if_exists, StoreError};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult};

/// How many numbered alternatives to try when a destination already exists.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// A file that has been fully written to disk.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub original_name: String,
    pub content_type: String,
    pub kind: FileKind,
    pub path: PathBuf,
    pub size: u64,
}

impl StoredUpload {
    /// Final file name on disk.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// Receive the file field for `profile` from `multipart`.
///
/// `destination` maps the client's file name and content type to the path
/// to write. An existing file is never overwritten: a taken name gets a
/// `-<n>` suffix. Other fields are skipped.
pub async fn receive_upload<F>(
    multipart: &mut Multipart,
    profile: UploadProfile,
    destination: F,
) -> AppResult<StoredUpload>
where
    F: FnOnce(&str, &str) -> PathBuf,
{
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(profile.field_name()) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        let kind = profile.validate(&content_type)?;

        let target = destination(&original_name, &content_type);
        let (path, file) = open_destination(&target).await?;

        let size = match write_field(field, file, profile).await {
            Ok(size) => size,
            Err(e) => {
                discard(&path).await;
                return Err(e);
            }
        };

        tracing::info!(
            path = %path.display(),
            size,
            content_type = %content_type,
            "Upload stored"
        );

        return Ok(StoredUpload {
            original_name,
            content_type,
            kind,
            path,
            size,
        });
    }

    Err(AppError::BadRequest("No file uploaded".into()))
}

/// Remove a stored upload, logging instead of failing.
pub async fn discard(path: &Path) {
    if let Err(e) = remove_file_if_exists(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload");
    }
}

async fn write_field(
    mut field: Field<'_>,
    mut file: File,
    profile: UploadProfile,
) -> AppResult<u64> {
    let limit = profile.max_bytes();
    let mut size: u64 = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        size += chunk.len() as u64;
        if size > limit {
            return Err(profile.too_large().into());
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;
    }

    file.flush()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;
    Ok(size)
}

async fn open_destination(target: &Path) -> AppResult<(PathBuf, File)> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = numbered(target, attempt);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(StoreError::io(&candidate, e).into()),
        }
    }
    Err(AppError::InternalError(format!(
        "No free file name for {}",
        target.display()
    )))
}

/// `target` itself for attempt 0, else `<stem>-<attempt><ext>` beside it.
fn numbered(target: &Path, attempt: u32) -> PathBuf {
    if attempt == 0 {
        return target.to_path_buf();
    }
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match target.extension() {
        Some(ext) => format!("{stem}-{attempt}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{attempt}"),
    };
    target.with_file_name(name)
}
