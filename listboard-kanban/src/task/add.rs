//! AddTask command

use super::prepare_task;
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::types::{normalize_name, Item, ItemId, Task};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Add a task to the end of an item's checklist
#[derive(Debug, Deserialize, Serialize)]
pub struct AddTask {
    pub item_id: ItemId,
    pub name: String,
}

impl_operation!(
    AddTask,
    verb = "add",
    noun = "task",
    description = "Add a task to the end of an item's checklist"
);

impl AddTask {
    pub fn new(item_id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let name = normalize_name(&self.name);
            if name.is_empty() {
                return Err(KanbanError::missing_field("name"));
            }

            let item: Item = ctx.read(self.item_id.as_str()).await?;
            let task = prepare_task(ctx, Task::new(item.id.clone(), name), &item).await?;

            ctx.store().apply_optimistic_task(task.clone()).await;
            ctx.write(&task).await?;
            info!(task = %task.id, item = %item.id, index = task.index, "task added");

            Ok(serde_json::to_value(&task)?)
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.item_id.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::database::InMemoryDatabase;
    use crate::item::AddItem;
    use std::sync::Arc;

    async fn setup() -> (KanbanContext, Value) {
        let ctx = KanbanContext::new(Arc::new(InMemoryDatabase::new()));
        let board = InitBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let item = AddItem::new(board["columns"][0]["id"].as_str().unwrap(), "Milk")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (ctx, item)
    }

    #[tokio::test]
    async fn test_add_task() {
        let (ctx, item) = setup().await;
        let item_id = item["id"].as_str().unwrap();

        let result = AddTask::new(item_id, " go   to shop ")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "go to shop");
        assert_eq!(result["itemID"], item_id);
        assert_eq!(result["listID"], item["listID"]);
        assert_eq!(result["boardID"], item["boardID"]);
        assert_eq!(result["index"], 1);
        assert_eq!(result["backgroundColor"], "mainBG");
        assert!(result["id"].as_str().unwrap().starts_with("Task_1_"));
    }

    #[tokio::test]
    async fn test_task_indices_are_per_item() {
        let (ctx, item) = setup().await;
        let first = item["id"].as_str().unwrap();
        let second = AddItem::new(item["listID"].as_str().unwrap(), "Bread")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let second = second["id"].as_str().unwrap();

        AddTask::new(first, "a").execute(&ctx).await.into_result().unwrap();
        AddTask::new(first, "b").execute(&ctx).await.into_result().unwrap();
        let other = AddTask::new(second, "c")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(other["index"], 1);
        assert_eq!(other["count"], 3);
    }

    #[tokio::test]
    async fn test_add_task_missing_item() {
        let (ctx, _) = setup().await;
        let result = AddTask::new("Item_404", "a").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(KanbanError::ItemNotFound { .. })));
    }
}
