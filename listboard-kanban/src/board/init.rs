//! InitBoard command

use crate::context::KanbanContext;
use crate::database::Collection;
use crate::error::KanbanError;
use crate::identity::IdentityGenerator;
use crate::types::{normalize_name, Board, BoardType, Column, EntityType};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Initialize the board with its default columns
#[derive(Debug, Deserialize, Serialize)]
pub struct InitBoard {
    /// The board name
    pub name: String,
    /// Layout family (defaults to kanban)
    #[serde(default)]
    pub board_type: BoardType,
}

impl_operation!(
    InitBoard,
    verb = "init",
    noun = "board",
    description = "Initialize a new board with To Do, Doing and Done columns"
);

impl InitBoard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            board_type: BoardType::default(),
        }
    }

    pub fn with_board_type(mut self, board_type: BoardType) -> Self {
        self.board_type = board_type;
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for InitBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            if let Ok(existing) = ctx.board().await {
                return Err(KanbanError::AlreadyExists {
                    id: existing.id.to_string(),
                });
            }

            let name = normalize_name(&self.name);
            if name.is_empty() {
                return Err(KanbanError::missing_field("name"));
            }

            let (creator, creator_id, creator_role) = ctx.creator();
            let identity = IdentityGenerator::new().generate(EntityType::Board, Some(1));
            let mut board = Board {
                id: identity.id.into(),
                uuid: identity.uuid,
                creator: creator.clone(),
                creator_id: creator_id.clone(),
                creator_role,
                created: identity.timestamp,
                updated: identity.timestamp,
                ..Board::new(name).with_board_type(self.board_type)
            };

            let mut generator = IdentityGenerator::excluding(
                std::iter::once(board.uuid.clone()).collect(),
            );
            let mut columns = Vec::new();
            for (position, column_name) in Board::default_column_names().into_iter().enumerate() {
                let sequence = position as u64 + 1;
                let identity = generator.generate(EntityType::Column, Some(sequence));
                generator.exclude(identity.uuid.clone());
                columns.push(Column {
                    id: identity.id.into(),
                    uuid: identity.uuid,
                    key: sequence,
                    count: sequence,
                    index: sequence,
                    creator: creator.clone(),
                    creator_id: creator_id.clone(),
                    creator_role,
                    created: identity.timestamp,
                    updated: identity.timestamp,
                    ..Column::new(board.id.clone(), column_name)
                });
            }
            board.list_ids = columns.iter().map(|c| c.id.clone()).collect();

            ctx.record_count(Collection::Boards, board.count).await?;
            ctx.record_count(Collection::Columns, columns.len() as u64)
                .await?;
            ctx.write(&board).await?;
            for column in &columns {
                ctx.write(column).await?;
            }
            info!(board = %board.id, columns = columns.len(), "board initialized");

            let mut value = serde_json::to_value(&board)?;
            value["columns"] = serde_json::to_value(&columns)?;
            Ok(value)
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDatabase;
    use std::sync::Arc;

    fn setup() -> KanbanContext {
        KanbanContext::new(Arc::new(InMemoryDatabase::new()))
    }

    #[tokio::test]
    async fn test_init_board() {
        let ctx = setup();

        let result = InitBoard::new("Groceries")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "Groceries");
        assert_eq!(result["boardType"], "Kanban");
        assert!(result["id"].as_str().unwrap().starts_with("Board_1_"));

        let columns = result["columns"].as_array().unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["To Do", "Doing", "Done"]);
        let indices: Vec<u64> = columns.iter().map(|c| c["index"].as_u64().unwrap()).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(result["listIDs"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_init_board_persists_columns() {
        let ctx = setup();
        InitBoard::new("Groceries")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let board = ctx.board().await.unwrap();
        let columns = ctx.columns_for_board(&board.id).await.unwrap();
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(|c| c.board_id == board.id));
        assert_eq!(
            board.list_ids,
            columns.iter().map(|c| c.id.clone()).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_init_board_twice_fails() {
        let ctx = setup();
        InitBoard::new("Groceries")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = InitBoard::new("Again").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(KanbanError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_init_board_requires_name() {
        let ctx = setup();
        let result = InitBoard::new("   ").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(KanbanError::MissingField { .. })));
    }
}
