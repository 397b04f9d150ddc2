//! ReorderItems command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::ordering::{ensure_unchanged, index_updates, reorder};
use crate::types::{ColumnId, ItemId};
use chrono::Utc;
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Move an item within its column and renumber the column densely.
///
/// `from` and `to` are positions in display order. When `expected` is
/// given it must list the column's item ids exactly as the caller saw them;
/// if the column has changed since, the reorder is rejected with
/// [`KanbanError::StaleOrdering`] and nothing is written.
#[derive(Debug, Deserialize, Serialize)]
pub struct ReorderItems {
    pub list_id: ColumnId,
    pub from: usize,
    pub to: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Vec<ItemId>>,
}

impl_operation!(
    ReorderItems,
    verb = "reorder",
    noun = "items",
    description = "Move an item to a new position within its column"
);

impl ReorderItems {
    pub fn new(list_id: impl Into<ColumnId>, from: usize, to: usize) -> Self {
        Self {
            list_id: list_id.into(),
            from,
            to,
            expected: None,
        }
    }

    /// Reject the reorder unless the column still holds exactly these ids
    pub fn expecting(mut self, ids: impl IntoIterator<Item = impl Into<ItemId>>) -> Self {
        self.expected = Some(ids.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ReorderItems {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let siblings = ctx.items_for_column(&self.list_id).await?;
            if let Some(expected) = &self.expected {
                let expected: Vec<String> = expected.iter().map(|id| id.to_string()).collect();
                ensure_unchanged(self.list_id.as_str(), &siblings, &expected)?;
            }

            let now = Utc::now();
            let mut reordered = reorder(siblings, self.from, self.to)?;
            for position in reordered.changed.clone() {
                reordered.siblings[position].updated = now;
            }
            ctx.batch_update(index_updates(&reordered, now)).await?;
            for item in reordered.changed() {
                ctx.store().apply_optimistic_item(item.clone()).await;
            }
            info!(
                column = %self.list_id,
                from = self.from,
                to = self.to,
                changed = reordered.changed.len(),
                "items reordered"
            );

            let order: Vec<&ItemId> = reordered.siblings.iter().map(|i| &i.id).collect();
            Ok(serde_json::json!({
                "list_id": self.list_id,
                "order": order,
                "changed": reordered.changed.len(),
            }))
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.list_id.to_string()]
    }
}
