//! SwipeItem command

use crate::context::KanbanContext;
use crate::database::{BatchUpdate, Collection, Document};
use crate::error::KanbanError;
use crate::ordering::{cyclic_neighbor, next_index, SwipeDirection};
use crate::types::{Column, Item, ItemId};
use chrono::Utc;
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Move an item to the adjacent column, appending it there.
///
/// Left goes to the previous column and right to the next, wrapping past
/// either end of the board. The item's `listID` and `index`, and the
/// `listID` copied onto each of its tasks, are written in one atomic batch.
#[derive(Debug, Deserialize, Serialize)]
pub struct SwipeItem {
    pub id: ItemId,
    pub direction: SwipeDirection,
}

impl_operation!(
    SwipeItem,
    verb = "swipe",
    noun = "item",
    description = "Move an item to the previous or next column"
);

impl SwipeItem {
    pub fn new(id: impl Into<ItemId>, direction: SwipeDirection) -> Self {
        Self {
            id: id.into(),
            direction,
        }
    }

    pub fn left(id: impl Into<ItemId>) -> Self {
        Self::new(id, SwipeDirection::Left)
    }

    pub fn right(id: impl Into<ItemId>) -> Self {
        Self::new(id, SwipeDirection::Right)
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for SwipeItem {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let mut item: Item = ctx.read(self.id.as_str()).await?;
            let current: Column = ctx.read(item.list_id.as_str()).await?;
            let columns = ctx.columns_for_board(&current.board_id).await?;

            let position = columns
                .iter()
                .position(|c| c.id == current.id)
                .ok_or_else(|| KanbanError::ColumnNotFound {
                    id: current.id.to_string(),
                })?;
            let target = cyclic_neighbor(position, self.direction, columns.len())
                .and_then(|p| columns.get(p))
                .ok_or_else(|| KanbanError::ColumnNotFound {
                    id: current.id.to_string(),
                })?;

            if target.id == current.id {
                debug!(item = %item.id, "only one column, swipe is a no-op");
                let mut value = serde_json::to_value(&item)?;
                value["moved"] = json!(false);
                return Ok(value);
            }

            let destination = ctx.items_for_column(&target.id).await?;
            item.list_id = target.id.clone();
            item.index = next_index(&destination);
            item.updated = Utc::now();

            // Tasks carry a copy of their item's listID; it moves with the item
            let mut tasks = ctx.tasks_for_item(&item.id).await?;
            let mut updates = Vec::with_capacity(tasks.len() + 1);
            let mut fields = Document::new();
            fields.insert("listID".into(), json!(item.list_id));
            fields.insert("index".into(), json!(item.index));
            fields.insert("updated".into(), json!(item.updated));
            updates.push(BatchUpdate::new(Collection::Items, item.id.as_str(), fields));
            for task in &mut tasks {
                task.list_id = Some(item.list_id.clone());
                task.updated = item.updated;
                let mut fields = Document::new();
                fields.insert("listID".into(), json!(item.list_id));
                fields.insert("updated".into(), json!(item.updated));
                updates.push(BatchUpdate::new(Collection::Tasks, task.id.as_str(), fields));
            }

            ctx.store().apply_optimistic_item(item.clone()).await;
            for task in &tasks {
                ctx.store().apply_optimistic_task(task.clone()).await;
            }
            ctx.batch_update(updates).await?;
            info!(
                item = %item.id,
                from = %current.id,
                to = %target.id,
                index = item.index,
                tasks = tasks.len(),
                "item swiped"
            );

            let mut value = serde_json::to_value(&item)?;
            value["moved"] = json!(true);
            Ok(value)
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::database::InMemoryDatabase;
    use crate::item::AddItem;
    use crate::task::AddTask;
    use crate::test_support::FlakyDatabase;
    use crate::types::{ColumnId, Task};
    use std::sync::Arc;

    async fn setup() -> (KanbanContext, Vec<ColumnId>) {
        let ctx = KanbanContext::new(Arc::new(InMemoryDatabase::new()));
        let board = InitBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let columns = board["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap().into())
            .collect();
        (ctx, columns)
    }

    async fn add(ctx: &KanbanContext, list_id: &ColumnId, name: &str) -> String {
        let item = AddItem::new(list_id.clone(), name)
            .execute(ctx)
            .await
            .into_result()
            .unwrap();
        item["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_swipe_right_appends_to_next_column() {
        let (ctx, columns) = setup().await;
        add(&ctx, &columns[1], "x").await;
        add(&ctx, &columns[1], "y").await;
        let id = add(&ctx, &columns[0], "milk").await;

        let result = SwipeItem::right(id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["moved"], true);
        assert_eq!(result["listID"], columns[1].as_str());
        assert_eq!(result["index"], 3);

        let item: Item = ctx.read(&id).await.unwrap();
        assert_eq!(item.list_id, columns[1]);
        assert_eq!(item.index, 3);
    }

    #[tokio::test]
    async fn test_swipe_wraps_both_ways() {
        let (ctx, columns) = setup().await;
        let id = add(&ctx, &columns[0], "milk").await;

        SwipeItem::left(id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let item: Item = ctx.read(&id).await.unwrap();
        assert_eq!(item.list_id, columns[2]);

        SwipeItem::right(id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let item: Item = ctx.read(&id).await.unwrap();
        assert_eq!(item.list_id, columns[0]);
        assert_eq!(item.index, 1);
    }

    #[tokio::test]
    async fn test_swipe_skips_past_gaps() {
        let (ctx, columns) = setup().await;
        // Destination has indices {1, 2, 5} after deletions
        for index in [1, 2, 5] {
            ctx.write(&Item {
                id: format!("Item_gap_{index}").into(),
                index,
                ..Item::new(columns[1].clone(), "gap")
            })
            .await
            .unwrap();
        }
        let id = add(&ctx, &columns[0], "milk").await;

        let result = SwipeItem::right(id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["index"], 6);
    }

    #[tokio::test]
    async fn test_swipe_moves_task_list_ids() {
        let (ctx, columns) = setup().await;
        let id = add(&ctx, &columns[0], "milk").await;
        for name in ["buy", "chill"] {
            AddTask::new(id.as_str(), name)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
        }

        SwipeItem::right(id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let tasks = ctx.tasks_for_item(&id.as_str().into()).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks
            .iter()
            .all(|t| t.list_id.as_ref() == Some(&columns[1])));
    }

    #[tokio::test]
    async fn test_failed_swipe_moves_nothing() {
        let flaky = Arc::new(FlakyDatabase::new(Arc::new(InMemoryDatabase::new())));
        let ctx = KanbanContext::new(flaky.clone());
        let board = InitBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let todo: ColumnId = board["columns"][0]["id"].as_str().unwrap().into();
        let id = add(&ctx, &todo, "milk").await;
        AddTask::new(id.as_str(), "buy")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        flaky.fail_batches(true);
        let result = SwipeItem::right(id.as_str())
            .execute(&ctx)
            .await
            .into_result();
        assert!(result.unwrap_err().is_transient());

        let item: Item = ctx.read(&id).await.unwrap();
        assert_eq!(item.list_id, todo);
        let tasks: Vec<Task> = ctx.list_all().await.unwrap();
        assert!(tasks.iter().all(|t| t.list_id.as_ref() == Some(&todo)));
    }
}
