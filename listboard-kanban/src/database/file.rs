//! File-backed document database.
//!
//! ```text
//! root/
//! ├── .lock                  # exclusive across a batch, shared across reads
//! ├── beta_items/
//! │   └── {id}.json          # one document per file
//! └── beta_tasks/
//!     └── {id}.json
//! ```

use super::{
    field_matches, merge_fields, BatchUpdate, Collection, Document, DocumentDatabase,
    Environment, SnapshotHub, Subscription,
};
use crate::error::{KanbanError, Result};
use async_trait::async_trait;
use fs2::FileExt;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, error, trace, warn};

/// A document database storing one JSON file per document.
///
/// Writers inside this process are serialized by an in-process lock. Batch
/// updates additionally hold the lock file exclusively, and reads hold it
/// shared, so another process never observes a batch half-applied.
/// Snapshots are only published for writes made through this handle.
pub struct FileDatabase {
    root: PathBuf,
    environment: Environment,
    guard: RwLock<()>,
    hub: SnapshotHub,
}

impl FileDatabase {
    /// Open (or lazily create) a database rooted at `root`
    pub fn new(root: impl Into<PathBuf>, environment: Environment) -> Self {
        Self {
            root: root.into(),
            environment,
            guard: RwLock::new(()),
            hub: SnapshotHub::default(),
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a collection
    pub fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.root
            .join(self.environment.collection_name(collection))
    }

    /// Path to a document file
    pub fn document_path(&self, collection: Collection, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.collection_dir(collection).join(format!("{id}.json")))
    }

    /// Path to the lock file
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    /// Try to acquire the exclusive cross-process lock (non-blocking)
    pub async fn lock(&self) -> Result<FileDatabaseLock> {
        let lock_path = self.lock_path();
        fs::create_dir_all(&self.root).await?;
        let file = open_lock_file(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(FileDatabaseLock { file }),
            Err(_) => Err(KanbanError::LockBusy { path: lock_path }),
        }
    }

    /// Wait for the exclusive cross-process lock
    async fn write_lock(&self) -> Result<FileDatabaseLock> {
        fs::create_dir_all(&self.root).await?;
        let file = open_lock_file(&self.lock_path())?;
        let file = tokio::task::spawn_blocking(move || {
            FileExt::lock_exclusive(&file).map(|()| file)
        })
        .await
        .map_err(|e| KanbanError::database(format!("lock task failed: {e}")))??;
        Ok(FileDatabaseLock { file })
    }

    /// Wait for a shared cross-process lock. `None` while the database
    /// directory does not exist yet (there is nothing to read).
    async fn read_lock(&self) -> Result<Option<FileDatabaseLock>> {
        if !fs::try_exists(&self.root).await? {
            return Ok(None);
        }
        let file = open_lock_file(&self.lock_path())?;
        let file = tokio::task::spawn_blocking(move || {
            FileExt::lock_shared(&file).map(|()| file)
        })
        .await
        .map_err(|e| KanbanError::database(format!("lock task failed: {e}")))??;
        Ok(Some(FileDatabaseLock { file }))
    }

    async fn read_document(&self, path: &Path) -> Result<Option<Document>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, path: &Path, doc: &Document) -> Result<()> {
        let content = serde_json::to_string_pretty(doc)?;
        atomic_write(path, content.as_bytes()).await
    }

    async fn read_collection(&self, collection: Collection) -> Result<Vec<Document>> {
        let dir = self.collection_dir(collection);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut docs = Vec::with_capacity(paths.len());
        for path in paths {
            if let Some(doc) = self.read_document(&path).await? {
                docs.push(doc);
            }
        }
        trace!(collection = %collection, count = docs.len(), "read collection");
        Ok(docs)
    }

    /// Put back the pre-batch versions of documents a failed batch renamed
    async fn restore(&self, committed: &[StagedDocument]) {
        for entry in committed {
            if let Err(e) = self.write_document(&entry.path, &entry.original).await {
                error!(
                    path = %entry.path.display(),
                    error = %e,
                    "failed to restore document after aborted batch"
                );
            }
        }
    }

    async fn publish(&self, collection: Collection) -> Result<()> {
        let docs = self.read_collection(collection).await?;
        self.hub.publish(collection, docs);
        Ok(())
    }
}

#[async_trait]
impl DocumentDatabase for FileDatabase {
    fn environment(&self) -> Environment {
        self.environment
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        let path = self.document_path(collection, id)?;
        let _read = self.guard.read().await;
        let _shared = self.read_lock().await?;
        self.read_document(&path).await
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>> {
        let _read = self.guard.read().await;
        let _shared = self.read_lock().await?;
        self.read_collection(collection).await
    }

    async fn set(&self, collection: Collection, id: &str, record: Document) -> Result<()> {
        let path = self.document_path(collection, id)?;
        let _write = self.guard.write().await;
        self.write_document(&path, &record).await?;
        debug!(collection = %collection, id, "wrote document");
        self.publish(collection).await
    }

    async fn update(&self, collection: Collection, id: &str, fields: Document) -> Result<()> {
        let path = self.document_path(collection, id)?;
        let _write = self.guard.write().await;
        let mut doc = self
            .read_document(&path)
            .await?
            .ok_or_else(|| KanbanError::not_found(collection.name(), id))?;
        merge_fields(&mut doc, fields);
        self.write_document(&path, &doc).await?;
        debug!(collection = %collection, id, "updated document");
        self.publish(collection).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let path = self.document_path(collection, id)?;
        let _write = self.guard.write().await;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(collection = %collection, id, "deleted document");
                self.publish(collection).await
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Two-phase commit: every merged document is first written to a temp
    /// file, and only once all of them exist are they renamed into place. A
    /// failed temp write discards the temps; a failed rename restores the
    /// documents already renamed. Either way no document changes.
    async fn batch_update(&self, updates: Vec<BatchUpdate>) -> Result<()> {
        let _write = self.guard.write().await;
        let _lock = self.write_lock().await?;

        let mut staged = Vec::with_capacity(updates.len());
        for update in updates {
            let path = self.document_path(update.collection, &update.id)?;
            let original = self
                .read_document(&path)
                .await?
                .ok_or_else(|| KanbanError::not_found(update.collection.name(), &update.id))?;
            let mut doc = original.clone();
            merge_fields(&mut doc, update.fields);
            staged.push(StagedDocument {
                collection: update.collection,
                temp: path.with_extension("tmp"),
                path,
                original,
                doc,
            });
        }

        for entry in &staged {
            if let Err(e) = write_temp(&entry.temp, &entry.doc).await {
                warn!(path = %entry.temp.display(), error = %e, "batch staging failed");
                discard_temps(&staged).await;
                return Err(e);
            }
        }

        for (renamed, entry) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(&entry.temp, &entry.path).await {
                warn!(path = %entry.path.display(), error = %e, "batch commit failed, rolling back");
                self.restore(&staged[..renamed]).await;
                discard_temps(&staged[renamed..]).await;
                return Err(e.into());
            }
        }
        debug!(documents = staged.len(), "committed batch update");

        let mut touched = Vec::new();
        for entry in &staged {
            if !touched.contains(&entry.collection) {
                touched.push(entry.collection);
            }
        }
        for collection in touched {
            self.publish(collection).await?;
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>> {
        let _read = self.guard.read().await;
        let _shared = self.read_lock().await?;
        let docs = self.read_collection(collection).await?;
        Ok(docs
            .into_iter()
            .filter(|doc| field_matches(doc, field, value))
            .collect())
    }

    async fn subscribe(&self, collection: Collection) -> Result<Subscription> {
        let _read = self.guard.read().await;
        let _shared = self.read_lock().await?;
        let docs = self.read_collection(collection).await?;
        Ok(self.hub.subscribe(collection, docs))
    }
}

/// One document of a batch between staging and commit
struct StagedDocument {
    collection: Collection,
    path: PathBuf,
    temp: PathBuf,
    original: Document,
    doc: Document,
}

async fn write_temp(temp: &Path, doc: &Document) -> Result<()> {
    if let Some(parent) = temp.parent() {
        fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(doc)?;
    fs::write(temp, content.as_bytes()).await?;
    Ok(())
}

async fn discard_temps(staged: &[StagedDocument]) {
    for entry in staged {
        let _ = fs::remove_file(&entry.temp).await;
    }
}

fn open_lock_file(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
}

/// RAII lock guard - releases on drop
pub struct FileDatabaseLock {
    file: std::fs::File,
}

impl Drop for FileDatabaseLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Reject ids that would escape their collection directory
fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(KanbanError::missing_field("id"));
    }
    if id.contains('/') || id.contains('\\') || id.contains("..") || id.starts_with('.') {
        return Err(KanbanError::invalid_value(
            "id",
            format!("'{id}' is not a valid document key"),
        ));
    }
    Ok(())
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    // Write to temp file in same directory
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;

    // Rename (atomic on same filesystem)
    fs::rename(&temp_path, path).await?;

    Ok(())
}
