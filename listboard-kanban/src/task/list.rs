//! ListTasks command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::types::{Item, ItemId};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List an item's tasks in display order
#[derive(Debug, Deserialize, Serialize)]
pub struct ListTasks {
    pub item_id: ItemId,
}

impl_operation!(
    ListTasks,
    verb = "list",
    noun = "tasks",
    description = "List the tasks of an item in display order"
);

impl ListTasks {
    pub fn new(item_id: impl Into<ItemId>) -> Self {
        Self {
            item_id: item_id.into(),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListTasks {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            let item: Item = ctx.read(self.item_id.as_str()).await?;
            let tasks = ctx.tasks_for_item(&item.id).await?;
            let complete = tasks.iter().filter(|t| t.complete).count();
            Ok(serde_json::json!({
                "item": item.name,
                "tasks": tasks,
                "count": tasks.len(),
                "complete": complete,
            }))
        }
        .await;

        ExecutionResult::unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::database::InMemoryDatabase;
    use crate::item::AddItem;
    use crate::task::{AddTask, CompleteTask};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_tasks() {
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
        let item_id = item["id"].as_str().unwrap();
        let first = AddTask::new(item_id, "shop")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        AddTask::new(item_id, "pay")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        CompleteTask::set(first["id"].as_str().unwrap(), true)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = ListTasks::new(item_id).execute(&ctx).await.into_result().unwrap();
        assert_eq!(result["item"], "Milk");
        assert_eq!(result["count"], 2);
        assert_eq!(result["complete"], 1);
        assert_eq!(result["tasks"][0]["name"], "shop");
    }
}
