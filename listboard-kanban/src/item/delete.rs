//! DeleteItem command

use crate::context::KanbanContext;
use crate::database::Collection;
use crate::error::KanbanError;
use crate::types::{Item, ItemId};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Delete an item and every task referencing it.
///
/// Tasks are deleted first, one by one. A task that fails to delete is
/// logged and counted but does not stop the item delete, so a partial
/// failure can leave orphaned tasks behind.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteItem {
    pub id: ItemId,
}

impl_operation!(
    DeleteItem,
    verb = "delete",
    noun = "item",
    description = "Delete an item and its tasks"
);

impl DeleteItem {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for DeleteItem {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let item: Item = ctx.read(self.id.as_str()).await?;
            ctx.store().remove_optimistic_item(&item.id).await;

            let tasks = ctx.tasks_for_item(&item.id).await?;
            let mut tasks_deleted = Vec::new();
            let mut tasks_failed = Vec::new();
            for task in &tasks {
                match ctx.delete(Collection::Tasks, task.id.as_str()).await {
                    Ok(()) => tasks_deleted.push(task.id.to_string()),
                    Err(e) => {
                        warn!(item = %item.id, task = %task.id, error = %e, "task delete failed");
                        tasks_failed.push(task.id.to_string());
                    }
                }
            }

            ctx.delete(Collection::Items, item.id.as_str()).await?;
            info!(
                item = %item.id,
                tasks_deleted = tasks_deleted.len(),
                tasks_failed = tasks_failed.len(),
                "item deleted"
            );

            Ok(serde_json::json!({
                "deleted": true,
                "id": item.id,
                "tasks_deleted": tasks_deleted,
                "tasks_failed": tasks_failed,
            }))
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
    use std::sync::Arc;

    async fn setup() -> (KanbanContext, String) {
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
        (ctx, item["id"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_delete_item_cascades() {
        let (ctx, id) = setup().await;
        for name in ["a", "b", "c"] {
            AddTask::new(id.as_str(), name)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
        }

        let result = DeleteItem::new(id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["deleted"], true);
        assert_eq!(result["tasks_deleted"].as_array().unwrap().len(), 3);
        assert!(result["tasks_failed"].as_array().unwrap().is_empty());
        assert!(ctx.find::<Item>(&id).await.unwrap().is_none());
        assert!(ctx.tasks_for_item(&id.as_str().into()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_leaves_other_items_tasks() {
        let (ctx, id) = setup().await;
        let list_id = ctx.read::<Item>(&id).await.unwrap().list_id;
        let other = AddItem::new(list_id, "Bread")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let other_id = other["id"].as_str().unwrap();
        AddTask::new(other_id, "slice")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        DeleteItem::new(id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(ctx.tasks_for_item(&other_id.into()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_item() {
        let (ctx, _) = setup().await;
        let result = DeleteItem::new("Item_404").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(KanbanError::ItemNotFound { .. })));
    }
}
