//! In-process document database

use super::{
    field_matches, merge_fields, BatchUpdate, Collection, Document, DocumentDatabase,
    Environment, SnapshotHub, Subscription,
};
use crate::error::{KanbanError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

type Collections = HashMap<Collection, BTreeMap<String, Document>>;

/// A document database held entirely in memory.
///
/// Every write publishes a fresh snapshot of the touched collection while the
/// write lock is still held, so subscribers observe writes in commit order.
#[derive(Default)]
pub struct InMemoryDatabase {
    environment: Environment,
    collections: RwLock<Collections>,
    hub: SnapshotHub,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    fn snapshot_of(collections: &Collections, collection: Collection) -> Vec<Document> {
        collections
            .get(&collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    fn publish(&self, collections: &Collections, collection: Collection) {
        self.hub
            .publish(collection, Self::snapshot_of(collections, collection));
    }
}

#[async_trait]
impl DocumentDatabase for InMemoryDatabase {
    fn environment(&self) -> Environment {
        self.environment
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(Self::snapshot_of(&collections, collection))
    }

    async fn set(&self, collection: Collection, id: &str, record: Document) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .insert(id.to_string(), record);
        self.publish(&collections, collection);
        Ok(())
    }

    async fn update(&self, collection: Collection, id: &str, fields: Document) -> Result<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| KanbanError::not_found(collection.name(), id))?;
        merge_fields(doc, fields);
        self.publish(&collections, collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(&collection)
            .and_then(|docs| docs.remove(id))
            .is_some();
        if removed {
            self.publish(&collections, collection);
        }
        Ok(())
    }

    async fn batch_update(&self, updates: Vec<BatchUpdate>) -> Result<()> {
        let mut collections = self.collections.write().await;

        // Validate before touching anything so a bad target aborts the batch.
        for update in &updates {
            let exists = collections
                .get(&update.collection)
                .is_some_and(|docs| docs.contains_key(&update.id));
            if !exists {
                return Err(KanbanError::not_found(
                    update.collection.name(),
                    update.id.clone(),
                ));
            }
        }

        let mut touched = Vec::new();
        for update in updates {
            if let Some(doc) = collections
                .get_mut(&update.collection)
                .and_then(|docs| docs.get_mut(&update.id))
            {
                merge_fields(doc, update.fields);
            }
            if !touched.contains(&update.collection) {
                touched.push(update.collection);
            }
        }

        for collection in touched {
            self.publish(&collections, collection);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| field_matches(doc, field, value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn subscribe(&self, collection: Collection) -> Result<Subscription> {
        let collections = self.collections.read().await;
        Ok(self
            .hub
            .subscribe(collection, Self::snapshot_of(&collections, collection)))
    }
}
