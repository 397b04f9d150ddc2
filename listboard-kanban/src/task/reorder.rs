//! ReorderTasks command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::ordering::{ensure_unchanged, index_updates, reorder};
use crate::types::{Item, ItemId, TaskId};
use chrono::Utc;
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Move a task within its item's checklist and renumber the checklist.
///
/// Positions and the optional `expected` guard behave as for
/// [`ReorderItems`](crate::item::ReorderItems).
#[derive(Debug, Deserialize, Serialize)]
pub struct ReorderTasks {
    pub item_id: ItemId,
    pub from: usize,
    pub to: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Vec<TaskId>>,
}

impl_operation!(
    ReorderTasks,
    verb = "reorder",
    noun = "tasks",
    description = "Move a task to a new position within its item"
);

impl ReorderTasks {
    pub fn new(item_id: impl Into<ItemId>, from: usize, to: usize) -> Self {
        Self {
            item_id: item_id.into(),
            from,
            to,
            expected: None,
        }
    }

    /// Reject the reorder unless the item still holds exactly these tasks
    pub fn expecting(mut self, ids: impl IntoIterator<Item = impl Into<TaskId>>) -> Self {
        self.expected = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ReorderTasks {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let item: Item = ctx.read(self.item_id.as_str()).await?;
            let siblings = ctx.tasks_for_item(&item.id).await?;
            if let Some(expected) = &self.expected {
                let expected: Vec<String> = expected.iter().map(|id| id.to_string()).collect();
                ensure_unchanged(item.id.as_str(), &siblings, &expected)?;
            }

            let now = Utc::now();
            let mut reordered = reorder(siblings, self.from, self.to)?;
            for position in reordered.changed.clone() {
                reordered.siblings[position].updated = now;
            }
            ctx.batch_update(index_updates(&reordered, now)).await?;
            for task in reordered.changed() {
                ctx.store().apply_optimistic_task(task.clone()).await;
            }
            info!(
                item = %item.id,
                from = self.from,
                to = self.to,
                changed = reordered.changed.len(),
                "tasks reordered"
            );

            let order: Vec<&TaskId> = reordered.siblings.iter().map(|t| &t.id).collect();
            Ok(serde_json::json!({
                "item_id": item.id,
                "order": order,
                "changed": reordered.changed.len(),
            }))
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.item_id.to_string()]
    }
}
