//! UpdateItem command

use crate::context::{decode, encode, KanbanContext};
use crate::database::{merge_fields, Collection};
use crate::error::KanbanError;
use crate::types::{normalize_name, Item, ItemId};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Change an item's presentational fields. Omitted fields are left as-is.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    /// The item to update
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
}

impl_operation!(
    UpdateItem,
    verb = "update",
    noun = "item",
    description = "Update an item's name, details or colors"
);

impl UpdateItem {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
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

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_font_color(mut self, color: impl Into<String>) -> Self {
        self.font_color = Some(color.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for UpdateItem {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let item: Item = ctx.read(self.id.as_str()).await?;

            let mut fields = encode(self)?;
            fields.remove("id");
            if let Some(name) = &self.name {
                let name = normalize_name(name);
                if name.is_empty() {
                    return Err(KanbanError::missing_field("name"));
                }
                fields.insert("name".into(), json!(name));
            }
            if fields.is_empty() {
                return Ok(serde_json::to_value(&item)?);
            }

            // Full merged copy for the store; the database gets only the delta
            let mut merged = encode(&item)?;
            merge_fields(&mut merged, fields.clone());
            let mut updated: Item = decode(merged)?;
            updated.updated = chrono::Utc::now();

            ctx.store().apply_optimistic_item(updated.clone()).await;
            ctx.update_fields(Collection::Items, item.id.as_str(), fields)
                .await?;
            info!(item = %item.id, "item updated");

            Ok(serde_json::to_value(&updated)?)
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}
