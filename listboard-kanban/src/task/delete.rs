//! DeleteTask command

use crate::context::KanbanContext;
use crate::database::Collection;
use crate::error::KanbanError;
use crate::types::{Task, TaskId};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Delete a task. Remaining siblings keep their indices.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteTask {
    pub id: TaskId,
}

impl_operation!(
    DeleteTask,
    verb = "delete",
    noun = "task",
    description = "Delete a task"
);

impl DeleteTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for DeleteTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let task: Task = ctx.read(self.id.as_str()).await?;
            ctx.store().remove_optimistic_task(task.id.as_str()).await;
            ctx.delete(Collection::Tasks, task.id.as_str()).await?;
            info!(task = %task.id, item = %task.item_id, "task deleted");

            Ok(serde_json::json!({
                "deleted": true,
                "id": task.id,
                "item_id": task.item_id,
            }))
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }
}
