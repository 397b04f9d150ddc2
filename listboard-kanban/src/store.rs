//! The application-state store.
//!
//! `BoardStore` owns the boards, columns, items and tasks a session renders
//! from, plus the currently selected item. Its authoritative state is
//! replaced wholesale by the latest database snapshot of each collection.
//! Optimistic writes made before a database call completes are advisory:
//! the next snapshot overwrites them whether or not the write succeeded.

use crate::database::{Collection, Document};
use crate::ordering::{sort_by_index, Ordered};
use crate::types::{Board, Column, ColumnId, Item, ItemId, Record, Task};
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

/// Everything the store holds, as of one moment
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub boards: Vec<Board>,
    pub columns: Vec<Column>,
    pub items: Vec<Item>,
    pub tasks: Vec<Task>,
    pub selected_item: Option<ItemId>,
}

impl BoardState {
    /// Items of one column in display order
    pub fn items_for_column(&self, list_id: &ColumnId) -> Vec<Item> {
        self.items
            .iter()
            .filter(|i| &i.list_id == list_id)
            .cloned()
            .collect()
    }

    /// Tasks of one item in display order
    pub fn tasks_for_item(&self, item_id: &ItemId) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| &t.item_id == item_id)
            .cloned()
            .collect()
    }
}

/// Shared board state with change notification
pub struct BoardStore {
    state: RwLock<BoardState>,
    generation: watch::Sender<u64>,
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BoardState::default()),
            generation: watch::channel(0).0,
        }
    }

    /// Receiver that ticks after every change to the store
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    fn bump(&self) {
        self.generation.send_modify(|g| *g += 1);
    }

    /// A copy of the whole state
    pub async fn snapshot(&self) -> BoardState {
        self.state.read().await.clone()
    }

    pub async fn boards(&self) -> Vec<Board> {
        self.state.read().await.boards.clone()
    }

    pub async fn columns(&self) -> Vec<Column> {
        self.state.read().await.columns.clone()
    }

    pub async fn items_for_column(&self, list_id: &ColumnId) -> Vec<Item> {
        self.state.read().await.items_for_column(list_id)
    }

    pub async fn tasks_for_item(&self, item_id: &ItemId) -> Vec<Task> {
        self.state.read().await.tasks_for_item(item_id)
    }

    // =========================================================================
    // Snapshot replacement
    // =========================================================================

    pub async fn replace_boards(&self, mut boards: Vec<Board>) {
        sort_by_index(&mut boards);
        self.state.write().await.boards = boards;
        self.bump();
    }

    pub async fn replace_columns(&self, mut columns: Vec<Column>) {
        sort_by_index(&mut columns);
        self.state.write().await.columns = columns;
        self.bump();
    }

    pub async fn replace_items(&self, mut items: Vec<Item>) {
        sort_by_index(&mut items);
        self.state.write().await.items = items;
        self.bump();
    }

    pub async fn replace_tasks(&self, mut tasks: Vec<Task>) {
        sort_by_index(&mut tasks);
        self.state.write().await.tasks = tasks;
        self.bump();
    }

    /// Replace one collection from raw snapshot documents. Documents that
    /// do not decode are skipped with a warning. Collections the store does
    /// not hold are ignored.
    pub async fn apply_snapshot(&self, collection: Collection, docs: &[Document]) {
        debug!(%collection, documents = docs.len(), "applying snapshot");
        match collection {
            Collection::Boards => self.replace_boards(decode_all(docs)).await,
            Collection::Columns => self.replace_columns(decode_all(docs)).await,
            Collection::Items => self.replace_items(decode_all(docs)).await,
            Collection::Tasks => self.replace_tasks(decode_all(docs)).await,
            Collection::Users | Collection::Events | Collection::Counters => {}
        }
    }

    // =========================================================================
    // Optimistic writes
    // =========================================================================

    /// Insert or replace an item locally, ahead of the database write
    pub async fn apply_optimistic_item(&self, item: Item) {
        upsert(&mut self.state.write().await.items, item);
        self.bump();
    }

    /// Insert or replace a task locally, ahead of the database write
    pub async fn apply_optimistic_task(&self, task: Task) {
        upsert(&mut self.state.write().await.tasks, task);
        self.bump();
    }

    /// Insert or replace a column locally, ahead of the database write
    pub async fn apply_optimistic_column(&self, column: Column) {
        upsert(&mut self.state.write().await.columns, column);
        self.bump();
    }

    /// Remove an item and its tasks locally, ahead of the database delete
    pub async fn remove_optimistic_item(&self, id: &ItemId) {
        {
            let mut state = self.state.write().await;
            state.items.retain(|i| &i.id != id);
            state.tasks.retain(|t| &t.item_id != id);
            if state.selected_item.as_ref() == Some(id) {
                state.selected_item = None;
            }
        }
        self.bump();
    }

    /// Remove a task locally, ahead of the database delete
    pub async fn remove_optimistic_task(&self, id: &str) {
        self.state.write().await.tasks.retain(|t| t.id.as_str() != id);
        self.bump();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select an item (or clear the selection)
    pub async fn select_item(&self, id: Option<ItemId>) {
        self.state.write().await.selected_item = id;
        self.bump();
    }

    /// The selected item, if it is still present
    pub async fn selected_item(&self) -> Option<Item> {
        let state = self.state.read().await;
        let id = state.selected_item.as_ref()?;
        state.items.iter().find(|i| &i.id == id).cloned()
    }
}

fn upsert<T: Record + Ordered>(records: &mut Vec<T>, record: T) {
    match records
        .iter_mut()
        .find(|r| r.record_id() == record.record_id())
    {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
    sort_by_index(records);
}

fn decode_all<T: Record>(docs: &[Document]) -> Vec<T> {
    let collection = T::COLLECTION;
    docs.iter()
        .filter_map(|doc| {
            match serde_json::from_value::<T>(serde_json::Value::Object(doc.clone())) {
                Ok(mut record) => {
                    record.normalize();
                    Some(record)
                }
                Err(e) => {
                    warn!(%collection, error = %e, "skipping undecodable document");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, list: &str, index: u64) -> Item {
        Item {
            id: id.into(),
            list_id: list.into(),
            index,
            ..Item::default()
        }
    }

    fn doc(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_replace_sorts_by_index() {
        let store = BoardStore::new();
        store
            .replace_items(vec![item("c", "L", 3), item("a", "L", 1), item("b", "L", 2)])
            .await;

        let ids: Vec<String> = store
            .items_for_column(&"L".into())
            .await
            .into_iter()
            .map(|i| i.id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_snapshot_overwrites_optimistic_state() {
        let store = BoardStore::new();
        store.replace_items(vec![item("a", "L", 1)]).await;

        let mut renamed = item("a", "L", 1);
        renamed.name = "local".into();
        store.apply_optimistic_item(renamed).await;
        store.apply_optimistic_item(item("ghost", "L", 2)).await;
        assert_eq!(store.snapshot().await.items.len(), 2);

        store
            .apply_snapshot(
                Collection::Items,
                &[doc(serde_json::json!({"id": "a", "listID": "L", "index": 1, "name": "remote"}))],
            )
            .await;

        let items = store.snapshot().await.items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "remote");
    }

    #[tokio::test]
    async fn test_snapshot_skips_bad_documents() {
        let store = BoardStore::new();
        store
            .apply_snapshot(
                Collection::Tasks,
                &[
                    doc(serde_json::json!({"id": "t1", "itemID": "a", "index": 1})),
                    doc(serde_json::json!({"id": "t2", "index": "not a number"})),
                ],
            )
            .await;
        assert_eq!(store.tasks_for_item(&"a".into()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_normalizes_items() {
        let store = BoardStore::new();
        store
            .apply_snapshot(
                Collection::Items,
                &[doc(serde_json::json!({"id": "a", "listID": "L", "summary": "s"}))],
            )
            .await;
        assert_eq!(store.snapshot().await.items[0].description, "s");
    }

    #[tokio::test]
    async fn test_selection_follows_items() {
        let store = BoardStore::new();
        store.replace_items(vec![item("a", "L", 1)]).await;
        store.select_item(Some("a".into())).await;
        assert_eq!(store.selected_item().await.unwrap().id, "a");

        store.replace_items(Vec::new()).await;
        assert!(store.selected_item().await.is_none());
    }

    #[tokio::test]
    async fn test_remove_item_drops_tasks_and_selection() {
        let store = BoardStore::new();
        store.replace_items(vec![item("a", "L", 1)]).await;
        store
            .replace_tasks(vec![Task {
                id: "t".into(),
                item_id: "a".into(),
                ..Task::default()
            }])
            .await;
        store.select_item(Some("a".into())).await;

        store.remove_optimistic_item(&"a".into()).await;
        let state = store.snapshot().await;
        assert!(state.items.is_empty());
        assert!(state.tasks.is_empty());
        assert!(state.selected_item.is_none());
    }

    #[tokio::test]
    async fn test_watch_ticks_on_change() {
        let store = BoardStore::new();
        let mut rx = store.watch();
        store.replace_columns(Vec::new()).await;
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        store.select_item(None).await;
        assert!(rx.has_changed().unwrap());
    }
}
