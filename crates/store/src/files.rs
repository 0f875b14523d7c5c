//! File metadata store.
//!
//! Keeps the ordered list of [`FileRecord`]s in a `{ "files": [...] }`
//! document. An unreadable document is logged and treated as empty; write
//! failures always reach the caller.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use signage_core::error::CoreError;
use signage_core::file_record::{
    apply_order, FileRecord, FileView, MetadataDocument, NewFileRecord, UpdateFileRecord,
};
use tokio::sync::Mutex;

use crate::document::DocumentStore;
use crate::error::StoreError;
use crate::layout::remove_file_if_exists;

const ENTITY: &str = "File";

/// Ordered store of uploaded-file metadata.
pub struct FileStore {
    doc: Arc<dyn DocumentStore>,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(doc: Arc<dyn DocumentStore>) -> Self {
        Self {
            doc,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> MetadataDocument {
        match self.doc.load().await {
            Ok(Some(value)) => match serde_json::from_value::<MetadataDocument>(value) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::error!(error = %e, "Malformed file metadata, treating as empty");
                    MetadataDocument::default()
                }
            },
            Ok(None) => MetadataDocument::default(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load file metadata, treating as empty");
                MetadataDocument::default()
            }
        }
    }

    async fn save(&self, doc: &MetadataDocument) -> Result<(), StoreError> {
        let value: Value = serde_json::to_value(doc).map_err(StoreError::Serialize)?;
        self.doc.save(&value).await
    }

    /// Append a new record and persist it.
    pub async fn add(&self, new: NewFileRecord) -> Result<FileRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await;
        let record = FileRecord::from_new(new);
        doc.files.push(record.clone());
        self.save(&doc).await?;
        tracing::info!(id = %record.id, filename = %record.filename, "File record added");
        Ok(record)
    }

    /// All records in display order.
    pub async fn list(&self) -> Vec<FileView> {
        self.load()
            .await
            .files
            .into_iter()
            .map(FileView::from)
            .collect()
    }

    /// Records that are not hidden, in display order.
    pub async fn list_visible(&self) -> Vec<FileView> {
        self.load()
            .await
            .files
            .into_iter()
            .filter(|f| !f.hidden)
            .map(FileView::from)
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<FileRecord> {
        self.load().await.files.into_iter().find(|f| f.id == id)
    }

    /// Remove a record and its files on disk.
    ///
    /// Already missing files are ignored; any other removal error aborts
    /// before the metadata changes.
    pub async fn delete(&self, id: &str) -> Result<FileRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await;
        let index = doc
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;

        let record = &doc.files[index];
        remove_file_if_exists(Path::new(&record.path)).await?;
        if let Some(converted) = &record.converted_path {
            remove_file_if_exists(Path::new(converted)).await?;
        }

        let record = doc.files.remove(index);
        self.save(&doc).await?;
        tracing::info!(id = %record.id, filename = %record.filename, "File deleted");
        Ok(record)
    }

    /// Apply a partial update to the mutable fields of a record.
    pub async fn update(
        &self,
        id: &str,
        update: &UpdateFileRecord,
    ) -> Result<FileRecord, StoreError> {
        self.modify(id, |record| update.apply(record)).await
    }

    /// Flip the hidden flag of a record.
    pub async fn toggle_hidden(&self, id: &str) -> Result<FileRecord, StoreError> {
        self.modify(id, |record| {
            record.hidden = !record.hidden;
            Ok(())
        })
        .await
    }

    async fn modify<F>(&self, id: &str, change: F) -> Result<FileRecord, StoreError>
    where
        F: FnOnce(&mut FileRecord) -> Result<(), CoreError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await;
        let record = doc
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
        change(record)?;
        let record = record.clone();
        self.save(&doc).await?;
        Ok(record)
    }

    /// Reorder the list by `ids`, keeping every record (see [`apply_order`]).
    pub async fn update_order(&self, ids: &[String]) -> Result<Vec<FileView>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let doc = self.load().await;
        let doc = MetadataDocument {
            files: apply_order(doc.files, ids),
        };
        self.save(&doc).await?;
        tracing::info!(count = doc.files.len(), "File order updated");
        Ok(doc.files.into_iter().map(FileView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;
    use signage_core::file_record::FileKind;

    use super::*;
    use crate::document::{JsonFileDocument, MemoryDocument};

    fn new_image(dir: &Path, name: &str) -> NewFileRecord {
        let path = dir.join(name);
        std::fs::write(&path, b"img").expect("write upload");
        NewFileRecord {
            filename: name.to_string(),
            original_name: name.to_string(),
            kind: FileKind::Image,
            path: path.to_string_lossy().to_string(),
            converted_path: None,
            size: 3,
        }
    }

    fn memory_store() -> (FileStore, Arc<MemoryDocument>) {
        let doc = Arc::new(MemoryDocument::new());
        (FileStore::new(doc.clone()), doc)
    }

    #[tokio::test]
    async fn add_then_get_and_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, doc) = memory_store();

        let a = store.add(new_image(dir.path(), "a.png")).await.expect("add");
        let b = store.add(new_image(dir.path(), "b.png")).await.expect("add");

        assert_eq!(store.get(&a.id).await.expect("found").filename, "a.png");
        let listed: Vec<String> = store.list().await.into_iter().map(|v| v.record.id).collect();
        assert_eq!(listed, [a.id.clone(), b.id.clone()]);

        let persisted = doc.snapshot().await.expect("saved");
        assert_eq!(persisted["files"][0]["originalName"], "a.png");
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn delete_removes_record_and_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, _doc) = memory_store();

        let mut new = new_image(dir.path(), "menu.pdf");
        let preview = dir.path().join("menu_page1.png");
        std::fs::write(&preview, b"png").expect("write preview");
        new.kind = FileKind::Pdf;
        new.converted_path = Some(preview.to_string_lossy().to_string());
        let record = store.add(new).await.expect("add");

        store.delete(&record.id).await.expect("delete");

        assert!(store.get(&record.id).await.is_none());
        assert!(!Path::new(&record.path).exists());
        assert!(!preview.exists());
    }

    #[tokio::test]
    async fn delete_tolerates_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, _doc) = memory_store();
        let record = store.add(new_image(dir.path(), "a.png")).await.expect("add");
        std::fs::remove_file(&record.path).expect("remove");

        store.delete(&record.id).await.expect("delete");
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let (store, _doc) = memory_store();
        assert_matches!(
            store.delete("nope").await,
            Err(StoreError::Core(CoreError::NotFound { entity: "File", .. }))
        );
    }

    #[tokio::test]
    async fn reorder_keeps_omitted_records() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, _doc) = memory_store();
        let a = store.add(new_image(dir.path(), "a.png")).await.expect("add");
        let b = store.add(new_image(dir.path(), "b.png")).await.expect("add");
        let c = store.add(new_image(dir.path(), "c.png")).await.expect("add");

        let out = store
            .update_order(&[c.id.clone(), "ghost".to_string()])
            .await
            .expect("reorder");
        let ids: Vec<String> = out.into_iter().map(|v| v.record.id).collect();
        assert_eq!(ids, [c.id.clone(), a.id.clone(), b.id.clone()]);

        let listed: Vec<String> = store.list().await.into_iter().map(|v| v.record.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn toggle_hidden_filters_visible_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, _doc) = memory_store();
        let a = store.add(new_image(dir.path(), "a.png")).await.expect("add");
        let b = store.add(new_image(dir.path(), "b.png")).await.expect("add");

        let toggled = store.toggle_hidden(&a.id).await.expect("toggle");
        assert!(toggled.hidden);

        let visible: Vec<String> = store
            .list_visible()
            .await
            .into_iter()
            .map(|v| v.record.id)
            .collect();
        assert_eq!(visible, [b.id]);
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn update_renames_and_validates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, _doc) = memory_store();
        let a = store.add(new_image(dir.path(), "a.png")).await.expect("add");

        let update = UpdateFileRecord {
            original_name: Some("Lobby welcome.png".into()),
            hidden: None,
        };
        let updated = store.update(&a.id, &update).await.expect("update");
        assert_eq!(updated.original_name, "Lobby welcome.png");
        assert_eq!(updated.uploaded_at, a.uploaded_at);

        let blank = UpdateFileRecord {
            original_name: Some(String::new()),
            hidden: None,
        };
        assert_matches!(
            store.update(&a.id, &blank).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        );
    }

    #[tokio::test]
    async fn malformed_document_is_treated_as_empty() {
        let doc = Arc::new(MemoryDocument::with_value(json!({ "files": "oops" })));
        let store = FileStore::new(doc);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_metadata_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("files-metadata.json");
        std::fs::write(&path, "{{{").expect("write");
        let store = FileStore::new(Arc::new(JsonFileDocument::new(&path)));
        assert!(store.list().await.is_empty());
        assert!(store.get("anything").await.is_none());
    }

    #[tokio::test]
    async fn concurrent_adds_are_not_lost() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(FileStore::new(Arc::new(JsonFileDocument::new(
            dir.path().join("files-metadata.json"),
        ))));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            let new = new_image(dir.path(), &format!("f{i}.png"));
            handles.push(tokio::spawn(async move { store.add(new).await }));
        }
        for handle in handles {
            handle.await.expect("join").expect("add");
        }
        assert_eq!(store.list().await.len(), 8);
    }
}
