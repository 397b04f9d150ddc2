//! AddItem command

use super::prepare_item;
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::types::{normalize_name, palette, Column, ColumnId, Item, Record};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Add an item to the end of a column
#[derive(Debug, Deserialize, Serialize)]
pub struct AddItem {
    /// The column the item goes in
    pub list_id: ColumnId,
    /// The item name; surrounding whitespace is trimmed and runs collapsed
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Background color key. Defaults to the last item's in the column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl_operation!(
    AddItem,
    verb = "add",
    noun = "item",
    description = "Add an item to the end of a column"
);

impl AddItem {
    pub fn new(list_id: impl Into<ColumnId>, name: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            name: name.into(),
            summary: None,
            description: None,
            image: None,
            background_color: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddItem {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let name = normalize_name(&self.name);
            if name.is_empty() {
                return Err(KanbanError::missing_field("name"));
            }

            let column: Column = ctx.read(self.list_id.as_str()).await?;
            let background_color = match &self.background_color {
                Some(color) => color.clone(),
                None => ctx
                    .items_for_column(&column.id)
                    .await?
                    .last()
                    .map(|last| last.background_color.clone())
                    .unwrap_or_else(|| palette::ACTIVE.to_string()),
            };

            let draft = Item {
                summary: self.summary.clone().unwrap_or_default(),
                description: self.description.clone().unwrap_or_default(),
                image: self.image.clone().unwrap_or_default(),
                background_color,
                ..Item::new(column.id.clone(), name)
            };
            let mut item = prepare_item(ctx, draft, &column).await?;
            item.normalize();

            ctx.store().apply_optimistic_item(item.clone()).await;
            ctx.write(&item).await?;
            info!(item = %item.id, column = %column.id, index = item.index, "item added");

            Ok(serde_json::to_value(&item)?)
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        result["id"]
            .as_str()
            .map(|id| vec![id.to_string()])
            .unwrap_or_default()
    }
}
