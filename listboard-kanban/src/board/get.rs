//! GetBoard command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get the board with its columns in display order
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GetBoard {}

impl_operation!(
    GetBoard,
    verb = "get",
    noun = "board",
    description = "Get the board with its columns"
);

impl GetBoard {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            let board = ctx.board().await?;
            let columns = ctx.columns_for_board(&board.id).await?;

            let mut value = serde_json::to_value(&board)?;
            value["columns"] = serde_json::to_value(&columns)?;
            Ok(value)
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
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_board() {
        let ctx = KanbanContext::new(Arc::new(InMemoryDatabase::new()));
        InitBoard::new("Groceries")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = GetBoard::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(result["name"], "Groceries");
        assert_eq!(result["columns"][0]["name"], "To Do");
        assert_eq!(result["columns"][2]["name"], "Done");
    }

    #[tokio::test]
    async fn test_get_board_uninitialized() {
        let ctx = KanbanContext::new(Arc::new(InMemoryDatabase::new()));
        let result = GetBoard::new().execute(&ctx).await.into_result();
        assert!(matches!(result, Err(KanbanError::NotInitialized)));
    }
}
