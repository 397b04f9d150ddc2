//! Snapshot subscriptions feeding the store.
//!
//! A [`SyncSession`] subscribes to the board, column, item and task
//! collections for as long as it lives. Each snapshot the database pushes
//! replaces the matching slice of the [`BoardStore`] wholesale. Dropping
//! the session unsubscribes.

use crate::database::{Collection, DocumentDatabase};
use crate::error::Result;
use crate::store::BoardStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Collections mirrored into the store
pub const SYNCED_COLLECTIONS: [Collection; 4] = [
    Collection::Boards,
    Collection::Columns,
    Collection::Items,
    Collection::Tasks,
];

/// A live set of subscriptions. Unsubscribes on drop.
pub struct SyncSession {
    feeds: Vec<JoinHandle<()>>,
}

impl SyncSession {
    /// Subscribe to every synced collection and start republishing
    /// snapshots into `store`.
    ///
    /// Each subscription delivers the current state first, so the store is
    /// populated shortly after this returns.
    pub async fn start(db: Arc<dyn DocumentDatabase>, store: Arc<BoardStore>) -> Result<Self> {
        let mut session = Self { feeds: Vec::new() };
        for collection in SYNCED_COLLECTIONS {
            // On error `session` drops and aborts the feeds already started
            let mut subscription = db.subscribe(collection).await?;
            let store = Arc::clone(&store);
            session.feeds.push(tokio::spawn(async move {
                while let Some(snapshot) = subscription.next().await {
                    store.apply_snapshot(collection, &snapshot).await;
                }
                debug!(%collection, "snapshot feed ended");
            }));
        }
        info!(feeds = session.feeds.len(), "sync session started");
        Ok(session)
    }

    /// True while at least one feed is still running
    pub fn is_active(&self) -> bool {
        self.feeds.iter().any(|feed| !feed.is_finished())
    }

    /// Unsubscribe now
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        for feed in &self.feeds {
            feed.abort();
        }
    }
}
