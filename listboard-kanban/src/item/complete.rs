//! CompleteItem command

use crate::context::KanbanContext;
use crate::database::{Collection, Document};
use crate::error::KanbanError;
use crate::types::{Item, ItemId};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Mark an item complete or incomplete. Without an explicit state the
/// current one is toggled.
#[derive(Debug, Deserialize, Serialize)]
pub struct CompleteItem {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

impl_operation!(
    CompleteItem,
    verb = "complete",
    noun = "item",
    description = "Mark an item complete, incomplete, or toggle it"
);

impl CompleteItem {
    /// Toggle completion
    pub fn toggle(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            complete: None,
        }
    }

    /// Set completion explicitly
    pub fn set(id: impl Into<ItemId>, complete: bool) -> Self {
        Self {
            id: id.into(),
            complete: Some(complete),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CompleteItem {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let mut item: Item = ctx.read(self.id.as_str()).await?;
            item.complete = self.complete.unwrap_or(!item.complete);
            item.updated = chrono::Utc::now();

            ctx.store().apply_optimistic_item(item.clone()).await;
            let mut fields = Document::new();
            fields.insert("complete".into(), json!(item.complete));
            ctx.update_fields(Collection::Items, item.id.as_str(), fields)
                .await?;
            info!(item = %item.id, complete = item.complete, "item completion changed");

            Ok(serde_json::to_value(&item)?)
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
    async fn test_toggle_twice() {
        let (ctx, id) = setup().await;

        let first = CompleteItem::toggle(id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(first["complete"], true);

        let second = CompleteItem::toggle(id.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(second["complete"], false);
    }

    #[tokio::test]
    async fn test_set_is_idempotent() {
        let (ctx, id) = setup().await;
        for _ in 0..2 {
            CompleteItem::set(id.as_str(), true)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
        }
        let item: Item = ctx.read(&id).await.unwrap();
        assert!(item.complete);
    }
}
