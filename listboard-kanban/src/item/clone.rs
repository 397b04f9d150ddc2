//! CloneItem command

use super::prepare_item;
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::task::prepare_task;
use crate::types::{Column, ColumnId, Item, ItemId, Task};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Copy an item, with its tasks, to the end of a column
#[derive(Debug, Deserialize, Serialize)]
pub struct CloneItem {
    /// The item to copy
    pub id: ItemId,
    /// Destination column (defaults to the source item's column)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ColumnId>,
}

impl_operation!(
    CloneItem,
    verb = "clone",
    noun = "item",
    description = "Copy an item and its tasks to the end of a column"
);

impl CloneItem {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            list_id: None,
        }
    }

    pub fn into_column(mut self, list_id: impl Into<ColumnId>) -> Self {
        self.list_id = Some(list_id.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CloneItem {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let source: Item = ctx.read(self.id.as_str()).await?;
            let list_id = self.list_id.as_ref().unwrap_or(&source.list_id);
            let column: Column = ctx.read(list_id.as_str()).await?;

            let draft = Item {
                name: source.name.clone(),
                summary: source.summary.clone(),
                description: source.description.clone(),
                image: source.image.clone(),
                color: source.color.clone(),
                background_color: source.background_color.clone(),
                font_color: source.font_color.clone(),
                ..Item::default()
            };
            let item = prepare_item(ctx, draft, &column).await?;
            ctx.store().apply_optimistic_item(item.clone()).await;
            ctx.write(&item).await?;

            let mut tasks = Vec::new();
            for source_task in ctx.tasks_for_item(&source.id).await? {
                let draft = Task {
                    name: source_task.name.clone(),
                    color: source_task.color.clone(),
                    background_color: source_task.background_color.clone(),
                    complete: source_task.complete,
                    ..Task::default()
                };
                let task = prepare_task(ctx, draft, &item).await?;
                ctx.write(&task).await?;
                tasks.push(task);
            }
            info!(source = %source.id, item = %item.id, tasks = tasks.len(), "item cloned");

            let mut value = serde_json::to_value(&item)?;
            value["tasks"] = serde_json::to_value(&tasks)?;
            Ok(value)
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }
}
