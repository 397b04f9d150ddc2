//! ListColumns command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::types::BoardId;
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List the board's columns in display order
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListColumns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<BoardId>,
}

impl_operation!(
    ListColumns,
    verb = "list",
    noun = "columns",
    description = "List columns in display order"
);

impl ListColumns {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListColumns {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            let board_id = match &self.board_id {
                Some(id) => id.clone(),
                None => ctx.board().await?.id,
            };
            let columns = ctx.columns_for_board(&board_id).await?;
            Ok(serde_json::json!({
                "columns": columns,
                "count": columns.len(),
            }))
        }
        .await;

        ExecutionResult::unlogged(result)
    }
}
