//! KanbanContext - I/O primitives over the document database
//!
//! The context provides access to storage, the application-state store and
//! the session user. No business logic methods, just typed data access.
//! Commands do all the work.

use crate::database::{BatchUpdate, Collection, Document, DocumentDatabase};
use crate::error::{KanbanError, Result};
use crate::ordering::{next_count, sort_by_index, Ordered};
use crate::store::BoardStore;
use crate::types::{Board, BoardId, Column, ColumnId, Item, ItemId, Record, Role, Task, User};
use chrono::Utc;
use listboard_operations::LogEntry;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Context passed to every command - provides access, not logic
pub struct KanbanContext {
    db: Arc<dyn DocumentDatabase>,
    store: Arc<BoardStore>,
    session: Option<User>,
}

impl KanbanContext {
    /// Create a context over a database with an empty store and no session
    pub fn new(db: Arc<dyn DocumentDatabase>) -> Self {
        Self {
            db,
            store: Arc::new(BoardStore::new()),
            session: None,
        }
    }

    /// Share an existing store (typically one fed by a `SyncSession`)
    pub fn with_store(mut self, store: Arc<BoardStore>) -> Self {
        self.store = store;
        self
    }

    /// Set the session user stamped as creator of new records
    pub fn with_session(mut self, user: User) -> Self {
        self.session = Some(user);
        self
    }

    pub fn database(&self) -> &Arc<dyn DocumentDatabase> {
        &self.db
    }

    pub fn store(&self) -> &Arc<BoardStore> {
        &self.store
    }

    pub fn session(&self) -> Option<&User> {
        self.session.as_ref()
    }

    /// `(creator, creatorID, creatorRole)` for records created in this session
    pub fn creator(&self) -> (String, String, Role) {
        match &self.session {
            Some(user) => (user.name.clone(), user.id.to_string(), user.role),
            None => (String::new(), String::new(), Role::default()),
        }
    }

    // =========================================================================
    // Generic record I/O
    // =========================================================================

    /// Read one record, `None` if absent
    pub async fn find<T: Record>(&self, id: &str) -> Result<Option<T>> {
        let collection = T::COLLECTION;
        debug!(%collection, id, "read");
        match self.db.get(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    /// Read one record, failing with the record's not-found error if absent
    pub async fn read<T: Record>(&self, id: &str) -> Result<T> {
        self.find(id).await?.ok_or_else(|| T::not_found(id))
    }

    /// Write a whole record (create or replace)
    pub async fn write<T: Record>(&self, record: &T) -> Result<()> {
        let doc = encode(record)?;
        self.db.set(T::COLLECTION, record.record_id(), doc).await
    }

    /// Merge fields into an existing record, stamping `updated`
    pub async fn update_fields(
        &self,
        collection: Collection,
        id: &str,
        mut fields: Document,
    ) -> Result<()> {
        fields.insert("updated".into(), json!(Utc::now()));
        self.db.update(collection, id, fields).await
    }

    /// Delete a record by id
    pub async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        self.db.delete(collection, id).await
    }

    /// Apply partial updates atomically
    pub async fn batch_update(&self, updates: Vec<BatchUpdate>) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }
        self.db.batch_update(updates).await
    }

    /// Every record of a collection, in key order
    pub async fn list_all<T: Record>(&self) -> Result<Vec<T>> {
        self.db
            .list(T::COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Records whose `field` equals `value`, sorted by index
    async fn query<T: Record + Ordered>(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Vec<T>> {
        let mut records = self
            .db
            .query(T::COLLECTION, field, &Value::String(value.to_string()))
            .await?
            .into_iter()
            .map(decode)
            .collect::<Result<Vec<T>>>()?;
        sort_by_index(&mut records);
        Ok(records)
    }

    /// The uuids already in use in a collection
    pub async fn taken_uuids(&self, collection: Collection) -> Result<HashSet<String>> {
        Ok(self
            .db
            .list(collection)
            .await?
            .into_iter()
            .filter_map(|doc| doc.get("uuid").and_then(Value::as_str).map(str::to_string))
            .collect())
    }

    // =========================================================================
    // Creation counters
    // =========================================================================

    /// Highest creation count ever issued in `collection`, 0 if none
    pub async fn issued_count(&self, collection: Collection) -> Result<u64> {
        Ok(self
            .db
            .get(Collection::Counters, collection.name())
            .await?
            .and_then(|doc| doc.get("value").and_then(Value::as_u64))
            .unwrap_or(0))
    }

    /// Raise the high-water mark of `collection` to `count`. Never lowers it.
    pub async fn record_count(&self, collection: Collection, count: u64) -> Result<()> {
        let current = self.issued_count(collection).await?;
        if count <= current {
            return Ok(());
        }
        let mut doc = Document::new();
        doc.insert("id".into(), json!(collection.name()));
        doc.insert("value".into(), json!(count));
        self.db
            .set(Collection::Counters, collection.name(), doc)
            .await
    }

    /// Issue the next creation count for a record added to `existing`
    /// (every record of its collection) and persist it as the new
    /// high-water mark.
    pub async fn claim_count<T: Record + Ordered>(&self, existing: &[T]) -> Result<u64> {
        let collection = T::COLLECTION;
        let high_water = self.issued_count(collection).await?;
        let count = next_count(existing, high_water);
        self.record_count(collection, count).await?;
        debug!(%collection, count, high_water, "count claimed");
        Ok(count)
    }

    // =========================================================================
    // Board and column I/O
    // =========================================================================

    /// The board (lowest index when several exist)
    pub async fn board(&self) -> Result<Board> {
        let mut boards: Vec<Board> = self.list_all().await?;
        sort_by_index(&mut boards);
        boards.into_iter().next().ok_or(KanbanError::NotInitialized)
    }

    /// Check if a board has been initialized
    pub async fn is_initialized(&self) -> Result<bool> {
        Ok(!self.db.list(Collection::Boards).await?.is_empty())
    }

    /// Columns of a board, sorted by index
    pub async fn columns_for_board(&self, board_id: &BoardId) -> Result<Vec<Column>> {
        self.query("boardID", board_id.as_str()).await
    }

    // =========================================================================
    // Item and task I/O
    // =========================================================================

    /// Items of a column, sorted by index
    pub async fn items_for_column(&self, list_id: &ColumnId) -> Result<Vec<Item>> {
        self.query("listID", list_id.as_str()).await
    }

    /// Tasks of an item, sorted by index
    pub async fn tasks_for_item(&self, item_id: &ItemId) -> Result<Vec<Task>> {
        self.query("itemID", item_id.as_str()).await
    }

    // =========================================================================
    // Activity I/O
    // =========================================================================

    /// Persist an activity entry to the events collection
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        let doc = encode(entry)?;
        self.db.set(Collection::Events, &entry.id, doc).await
    }

    /// Activity entries, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let mut entries = self
            .db
            .list(Collection::Events)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(Value::Object(doc)).map_err(KanbanError::from))
            .collect::<Result<Vec<LogEntry>>>()?;
        entries.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}

/// Serialize a value into a flat document
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(doc) => Ok(doc),
        other => Err(KanbanError::invalid_value(
            "document",
            format!("expected an object, got {other}"),
        )),
    }
}

/// Deserialize a document into a record, applying its read-time defaults
pub(crate) fn decode<T: Record>(doc: Document) -> Result<T> {
    let mut record: T = serde_json::from_value(Value::Object(doc))?;
    record.normalize();
    Ok(record)
}
