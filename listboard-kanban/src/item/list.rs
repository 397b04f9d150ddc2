//! ListItems command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::types::{Column, ColumnId};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List a column's items in display order
#[derive(Debug, Deserialize, Serialize)]
pub struct ListItems {
    pub list_id: ColumnId,
}

impl_operation!(
    ListItems,
    verb = "list",
    noun = "items",
    description = "List the items of a column in display order"
);

impl ListItems {
    pub fn new(list_id: impl Into<ColumnId>) -> Self {
        Self {
            list_id: list_id.into(),
        }
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListItems {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            let column: Column = ctx.read(self.list_id.as_str()).await?;
            let items = ctx.items_for_column(&column.id).await?;
            Ok(serde_json::json!({
                "column": column.name,
                "items": items,
                "count": items.len(),
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
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_items() {
        let ctx = KanbanContext::new(Arc::new(InMemoryDatabase::new()));
        let board = InitBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let todo = board["columns"][0]["id"].as_str().unwrap();
        for name in ["a", "b"] {
            AddItem::new(todo, name)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
        }

        let result = ListItems::new(todo).execute(&ctx).await.into_result().unwrap();
        assert_eq!(result["column"], "To Do");
        assert_eq!(result["count"], 2);
        assert_eq!(result["items"][0]["name"], "a");
        assert_eq!(result["items"][1]["name"], "b");
    }

    #[tokio::test]
    async fn test_list_items_unknown_column() {
        let ctx = KanbanContext::new(Arc::new(InMemoryDatabase::new()));
        let result = ListItems::new("Column_404").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(KanbanError::ColumnNotFound { .. })));
    }
}
