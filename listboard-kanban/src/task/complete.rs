//! CompleteTask command

use crate::context::KanbanContext;
use crate::database::{Collection, Document};
use crate::error::KanbanError;
use crate::types::{Task, TaskId};
use chrono::Utc;
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Mark a task complete or incomplete. Without an explicit state the
/// current one is toggled.
#[derive(Debug, Deserialize, Serialize)]
pub struct CompleteTask {
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

impl_operation!(
    CompleteTask,
    verb = "complete",
    noun = "task",
    description = "Mark a task complete, incomplete, or toggle it"
);

impl CompleteTask {
    pub fn toggle(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            complete: None,
        }
    }

    pub fn set(id: impl Into<TaskId>, complete: bool) -> Self {
        Self {
            id: id.into(),
            complete: Some(complete),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CompleteTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let mut task: Task = ctx.read(self.id.as_str()).await?;
            task.complete = self.complete.unwrap_or(!task.complete);
            task.updated = Utc::now();

            ctx.store().apply_optimistic_task(task.clone()).await;
            let mut fields = Document::new();
            fields.insert("complete".into(), json!(task.complete));
            ctx.update_fields(Collection::Tasks, task.id.as_str(), fields)
                .await?;
            info!(task = %task.id, complete = task.complete, "task completion changed");

            Ok(serde_json::to_value(&task)?)
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
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

    #[tokio::test]
    async fn test_complete_task() {
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
        let task = AddTask::new(item["id"].as_str().unwrap(), "shop")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let id = task["id"].as_str().unwrap();

        let toggled = CompleteTask::toggle(id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(toggled["complete"], true);

        let reset = CompleteTask::set(id, false)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(reset["complete"], false);
        assert!(!ctx.read::<Task>(id).await.unwrap().complete);
    }
}
