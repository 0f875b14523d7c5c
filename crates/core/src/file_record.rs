//! File records for uploaded display assets.
//!
//! The record list is the slideshow order. Records are persisted with
//! camelCase keys inside a `{ "files": [...] }` document so existing
//! metadata files keep loading.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{FileId, Timestamp};

/// Kind of uploaded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
}

/// One uploaded asset as stored in the metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: FileId,
    /// Sanitized, timestamp-suffixed name on disk.
    pub filename: String,
    /// Name supplied by the uploader. Display only.
    pub original_name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Absolute path of the stored original.
    pub path: String,
    /// Absolute path of the PNG preview. Set for PDFs only.
    pub converted_path: Option<String>,
    pub uploaded_at: Timestamp,
    pub size: u64,
    /// Hidden files stay in the list but are skipped by the display.
    #[serde(default)]
    pub hidden: bool,
}

/// Input for inserting a new record. Id and timestamp are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub filename: String,
    pub original_name: String,
    pub kind: FileKind,
    pub path: String,
    pub converted_path: Option<String>,
    pub size: u64,
}

/// Partial update of the mutable record fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRecord {
    pub original_name: Option<String>,
    pub hidden: Option<bool>,
}

/// A record as returned by the API, with its derived URLs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    #[serde(flatten)]
    pub record: FileRecord,
    pub url: String,
    pub display_url: String,
}

/// On-disk shape of the metadata document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

impl FileRecord {
    /// Build a record from upload input, assigning a fresh id and timestamp.
    pub fn from_new(new: NewFileRecord) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            filename: new.filename,
            original_name: new.original_name,
            kind: new.kind,
            path: new.path,
            converted_path: new.converted_path,
            uploaded_at: chrono::Utc::now(),
            size: new.size,
            hidden: false,
        }
    }

    /// Path of the asset the display should show: the preview for PDFs,
    /// otherwise the original.
    pub fn display_path(&self) -> &str {
        self.converted_path.as_deref().unwrap_or(&self.path)
    }
}

impl From<FileRecord> for FileView {
    fn from(record: FileRecord) -> Self {
        let url = format!("/api/files/{}", record.id);
        let display_url = if record.converted_path.is_some() {
            format!("/api/files/{}/display", record.id)
        } else {
            url.clone()
        };
        Self {
            record,
            url,
            display_url,
        }
    }
}

impl UpdateFileRecord {
    /// Apply the provided fields to `record`.
    pub fn apply(&self, record: &mut FileRecord) -> Result<(), CoreError> {
        if let Some(name) = &self.original_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(CoreError::Validation(
                    "originalName must not be empty".into(),
                ));
            }
            record.original_name = name.to_string();
        }
        if let Some(hidden) = self.hidden {
            record.hidden = hidden;
        }
        Ok(())
    }
}

/// Reorder `files` by `ids`.
///
/// Records named in `ids` come first, in that order. Unknown ids are ignored
/// and a repeated id only places its record once. Every record whose id was
/// omitted follows in its original relative order, so the output always has
/// the same length as the input.
pub fn apply_order(files: Vec<FileRecord>, ids: &[String]) -> Vec<FileRecord> {
    let mut slots: Vec<Option<FileRecord>> = files.into_iter().map(Some).collect();
    let index: HashMap<String, usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.as_ref().map(|f| (f.id.clone(), i)))
        .collect();

    let mut ordered = Vec::with_capacity(slots.len());
    for id in ids {
        if let Some(&i) = index.get(id) {
            if let Some(record) = slots[i].take() {
                ordered.push(record);
            }
        }
    }
    ordered.extend(slots.into_iter().flatten());
    ordered
}
