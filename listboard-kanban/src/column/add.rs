//! AddColumn command

use crate::context::KanbanContext;
use crate::database::{Collection, Document};
use crate::error::KanbanError;
use crate::identity::IdentityGenerator;
use crate::ordering::next_index;
use crate::types::{normalize_name, Board, BoardId, Column, EntityType};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Append a column to the board
#[derive(Debug, Deserialize, Serialize)]
pub struct AddColumn {
    /// The column display name
    pub name: String,
    /// Board to add to (defaults to the board)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<BoardId>,
}

impl_operation!(
    AddColumn,
    verb = "add",
    noun = "column",
    description = "Append a column to the board"
);

impl AddColumn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            board_id: None,
        }
    }

    pub fn on_board(mut self, board_id: impl Into<BoardId>) -> Self {
        self.board_id = Some(board_id.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddColumn {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let name = normalize_name(&self.name);
            if name.is_empty() {
                return Err(KanbanError::missing_field("name"));
            }

            let board = match &self.board_id {
                Some(id) => ctx.read::<Board>(id.as_str()).await?,
                None => ctx.board().await?,
            };

            let all: Vec<Column> = ctx.list_all().await?;
            let siblings = ctx.columns_for_board(&board.id).await?;
            let count = ctx.claim_count(&all).await?;
            let index = next_index(&siblings);

            let taken = ctx.taken_uuids(Collection::Columns).await?;
            let identity =
                IdentityGenerator::excluding(taken).generate(EntityType::Column, Some(count));
            let (creator, creator_id, creator_role) = ctx.creator();
            let column = Column {
                id: identity.id.into(),
                uuid: identity.uuid,
                key: count,
                count,
                index,
                creator,
                creator_id,
                creator_role,
                created: identity.timestamp,
                updated: identity.timestamp,
                ..Column::new(board.id.clone(), name)
            };

            ctx.store().apply_optimistic_column(column.clone()).await;
            ctx.write(&column).await?;

            let mut list_ids = board.list_ids.clone();
            list_ids.push(column.id.clone());
            let mut fields = Document::new();
            fields.insert("listIDs".into(), json!(list_ids));
            ctx.update_fields(Collection::Boards, board.id.as_str(), fields)
                .await?;

            info!(column = %column.id, index, "column added");
            Ok(serde_json::to_value(&column)?)
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        result["id"].as_str().map(|id| vec![id.to_string()]).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::database::InMemoryDatabase;
    use std::sync::Arc;

    async fn setup() -> KanbanContext {
        let ctx = KanbanContext::new(Arc::new(InMemoryDatabase::new()));
        InitBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_add_column_appends() {
        let ctx = setup().await;

        let result = AddColumn::new("Blocked")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "Blocked");
        assert_eq!(result["index"], 4);
        assert_eq!(result["count"], 4);
        assert!(result["id"].as_str().unwrap().starts_with("Column_4_"));

        let board = ctx.board().await.unwrap();
        assert_eq!(board.list_ids.len(), 4);
        assert_eq!(board.list_ids[3], result["id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_add_column_requires_board() {
        let ctx = KanbanContext::new(Arc::new(InMemoryDatabase::new()));
        let result = AddColumn::new("Blocked").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(KanbanError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_add_column_affects_itself() {
        let ctx = setup().await;
        let cmd = AddColumn::new("Blocked");
        let result = cmd.execute(&ctx).await.into_result().unwrap();
        assert_eq!(
            cmd.affected_resource_ids(&result),
            vec![result["id"].as_str().unwrap().to_string()]
        );
    }
}
