//! Test helpers for exercising failure paths.
//!
//! [`FlakyDatabase`] wraps another database and fails chosen calls with a
//! transient [`KanbanError::Database`] error, so tests can observe what the
//! engine does when a write does not land.

use crate::database::{
    BatchUpdate, Collection, Document, DocumentDatabase, Environment, Subscription,
};
use crate::error::{KanbanError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A database that fails selected operations
pub struct FlakyDatabase {
    inner: Arc<dyn DocumentDatabase>,
    failing_deletes: Mutex<HashSet<String>>,
    fail_writes: AtomicBool,
    fail_batches: AtomicBool,
}

impl FlakyDatabase {
    pub fn new(inner: Arc<dyn DocumentDatabase>) -> Self {
        Self {
            inner,
            failing_deletes: Mutex::new(HashSet::new()),
            fail_writes: AtomicBool::new(false),
            fail_batches: AtomicBool::new(false),
        }
    }

    /// Make every delete of `id` fail
    pub fn fail_delete(&self, id: impl Into<String>) {
        self.failing_deletes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.into());
    }

    /// Make every `set` and `update` fail (or succeed again)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every `batch_update` fail (or succeed again)
    pub fn fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self, collection: Collection, id: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KanbanError::database(format!(
                "injected write failure for {collection}/{id}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentDatabase for FlakyDatabase {
    fn environment(&self) -> Environment {
        self.inner.environment()
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        self.inner.get(collection, id).await
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>> {
        self.inner.list(collection).await
    }

    async fn set(&self, collection: Collection, id: &str, record: Document) -> Result<()> {
        self.check_write(collection, id)?;
        self.inner.set(collection, id, record).await
    }

    async fn update(&self, collection: Collection, id: &str, fields: Document) -> Result<()> {
        self.check_write(collection, id)?;
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let failing = self
            .failing_deletes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(id);
        if failing {
            return Err(KanbanError::database(format!(
                "injected delete failure for {collection}/{id}"
            )));
        }
        self.inner.delete(collection, id).await
    }

    async fn batch_update(&self, updates: Vec<BatchUpdate>) -> Result<()> {
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(KanbanError::database("injected batch failure"));
        }
        self.inner.batch_update(updates).await
    }

    async fn query(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>> {
        self.inner.query(collection, field, value).await
    }

    async fn subscribe(&self, collection: Collection) -> Result<Subscription> {
        self.inner.subscribe(collection).await
    }
}
