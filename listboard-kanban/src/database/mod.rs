//! The document-database seam.
//!
//! Persistence and change feeds are delegated to a document database. The
//! engine only needs the small surface in [`DocumentDatabase`]: point reads,
//! full-collection reads, whole-document writes, partial merges, deletes, an
//! atomic multi-document partial update, an equality query, and a
//! subscription that yields full-collection snapshots.
//!
//! Records are flat JSON objects. Relations are foreign-key string fields.

mod file;
mod memory;

pub use file::{FileDatabase, FileDatabaseLock};
pub use memory::InMemoryDatabase;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// A flat document
pub type Document = serde_json::Map<String, Value>;

/// A full-collection read, in key order
pub type Snapshot = Arc<Vec<Document>>;

/// Logical collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Users,
    Boards,
    Columns,
    Items,
    Tasks,
    Events,
    /// Per-collection high-water marks of issued creation counts
    Counters,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Users,
        Collection::Boards,
        Collection::Columns,
        Collection::Items,
        Collection::Tasks,
        Collection::Events,
        Collection::Counters,
    ];

    /// Unprefixed collection name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Boards => "boards",
            Self::Columns => "columns",
            Self::Items => "items",
            Self::Tasks => "tasks",
            Self::Events => "events",
            Self::Counters => "counters",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Deployment environment. Beta data lives in `beta_`-prefixed collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Beta,
    Production,
}

impl Environment {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Beta => "beta_",
            Self::Production => "",
        }
    }

    /// Physical name of `collection` in this environment
    pub fn collection_name(&self, collection: Collection) -> String {
        format!("{}{}", self.prefix(), collection.name())
    }
}

/// One partial update inside an atomic batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchUpdate {
    pub collection: Collection,
    pub id: String,
    pub fields: Document,
}

impl BatchUpdate {
    pub fn new(collection: Collection, id: impl Into<String>, fields: Document) -> Self {
        Self {
            collection,
            id: id.into(),
            fields,
        }
    }
}

/// A live feed of full-collection snapshots.
///
/// The first call to [`Subscription::next`] yields the collection as it was
/// when subscribing; later calls wait for the next change. Intermediate
/// snapshots may be skipped: only the latest state is ever delivered.
pub struct Subscription {
    collection: Collection,
    receiver: watch::Receiver<Snapshot>,
}

impl Subscription {
    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// The most recent snapshot without waiting
    pub fn current(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot. `None` once the database is dropped.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}

/// The operations the engine consumes from a document database
#[async_trait]
pub trait DocumentDatabase: Send + Sync {
    /// The environment whose collections this handle reads and writes
    fn environment(&self) -> Environment;

    /// Read one document
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>>;

    /// Read a whole collection
    async fn list(&self, collection: Collection) -> Result<Vec<Document>>;

    /// Create or fully replace a document
    async fn set(&self, collection: Collection, id: &str, record: Document) -> Result<()>;

    /// Merge `fields` into an existing document. Fails if it does not exist.
    async fn update(&self, collection: Collection, id: &str, fields: Document) -> Result<()>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;

    /// Apply every partial update or none of them
    async fn batch_update(&self, updates: Vec<BatchUpdate>) -> Result<()>;

    /// Documents whose `field` equals `value`
    async fn query(&self, collection: Collection, field: &str, value: &Value)
        -> Result<Vec<Document>>;

    /// Subscribe to full-collection snapshots
    async fn subscribe(&self, collection: Collection) -> Result<Subscription>;
}

/// Merge `fields` over `target`, key by key
pub fn merge_fields(target: &mut Document, fields: Document) {
    for (key, value) in fields {
        target.insert(key, value);
    }
}

/// True when `doc[field] == value`
pub fn field_matches(doc: &Document, field: &str, value: &Value) -> bool {
    doc.get(field) == Some(value)
}

/// Per-collection watch channels shared by the database implementations
#[derive(Default)]
pub(crate) struct SnapshotHub {
    senders: Mutex<HashMap<Collection, watch::Sender<Snapshot>>>,
}

impl SnapshotHub {
    fn sender(&self, collection: Collection) -> watch::Sender<Snapshot> {
        let mut senders = self.senders.lock().unwrap_or_else(|e| e.into_inner());
        senders
            .entry(collection)
            .or_insert_with(|| watch::channel(Arc::new(Vec::new())).0)
            .clone()
    }

    /// Replace the latest snapshot of `collection`
    pub(crate) fn publish(&self, collection: Collection, docs: Vec<Document>) {
        self.sender(collection).send_replace(Arc::new(docs));
    }

    /// Seed the channel with `docs` and return a receiver that sees them first
    pub(crate) fn subscribe(&self, collection: Collection, docs: Vec<Document>) -> Subscription {
        let sender = self.sender(collection);
        sender.send_replace(Arc::new(docs));
        let mut receiver = sender.subscribe();
        receiver.mark_changed();
        Subscription {
            collection,
            receiver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_names_per_environment() {
        assert_eq!(
            Environment::Beta.collection_name(Collection::Items),
            "beta_items"
        );
        assert_eq!(
            Environment::Production.collection_name(Collection::Tasks),
            "tasks"
        );
    }

    #[test]
    fn test_merge_fields_overwrites_only_given_keys() {
        let mut doc = json!({"name": "Milk", "index": 1}).as_object().cloned().unwrap();
        let fields = json!({"index": 4}).as_object().cloned().unwrap();
        merge_fields(&mut doc, fields);
        assert_eq!(doc["name"], "Milk");
        assert_eq!(doc["index"], 4);
    }

    #[tokio::test]
    async fn test_hub_delivers_seed_then_changes() {
        let hub = SnapshotHub::default();
        let mut sub = hub.subscribe(Collection::Items, vec![Document::new()]);
        assert_eq!(sub.next().await.unwrap().len(), 1);

        hub.publish(Collection::Items, Vec::new());
        assert!(sub.next().await.unwrap().is_empty());
        assert!(sub.current().is_empty());
    }
}
