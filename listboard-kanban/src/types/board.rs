//! Board-level types: Board and Column

use super::entity::{palette, EntityType, Record, Role};
use super::ids::{BoardId, ColumnId};
use crate::database::Collection;
use crate::error::KanbanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Layout family of a board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardType {
    Tier,
    Grid,
    #[default]
    Kanban,
}

/// The top-level container. Columns reference it through `boardID`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Board {
    pub id: BoardId,
    pub uuid: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub key: u64,
    pub count: u64,
    pub index: u64,
    pub name: String,
    pub board_type: BoardType,
    /// Column ids in display order
    #[serde(rename = "listIDs")]
    pub list_ids: Vec<ColumnId>,
    pub color: String,
    pub background_color: String,
    pub active: bool,
    pub archived: bool,
    pub creator: String,
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    pub creator_role: Role,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Default for Board {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: BoardId::default(),
            uuid: String::new(),
            entity_type: EntityType::Board,
            key: 1,
            count: 1,
            index: 1,
            name: String::new(),
            board_type: BoardType::Kanban,
            list_ids: Vec::new(),
            color: palette::MAIN_BG.to_string(),
            background_color: palette::MAIN_BG.to_string(),
            active: true,
            archived: false,
            creator: String::new(),
            creator_id: String::new(),
            creator_role: Role::default(),
            created: now,
            updated: now,
        }
    }
}

impl Board {
    /// Create a new board with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the layout family
    pub fn with_board_type(mut self, board_type: BoardType) -> Self {
        self.board_type = board_type;
        self
    }

    /// Names of the columns a new board starts with
    pub fn default_column_names() -> [&'static str; 3] {
        ["To Do", "Doing", "Done"]
    }
}

impl Record for Board {
    const COLLECTION: Collection = Collection::Boards;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

/// A column defines a workflow stage. Items reference it through `listID`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Column {
    pub id: ColumnId,
    pub uuid: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub key: u64,
    pub count: u64,
    /// 1-based position among the columns of its board
    pub index: u64,
    #[serde(rename = "boardID")]
    pub board_id: BoardId,
    pub name: String,
    pub color: String,
    pub background_color: String,
    pub colors_enabled: bool,
    pub complete: bool,
    pub creator: String,
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    pub creator_role: Role,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Default for Column {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: ColumnId::default(),
            uuid: String::new(),
            entity_type: EntityType::Column,
            key: 1,
            count: 1,
            index: 1,
            board_id: BoardId::default(),
            name: String::new(),
            color: palette::LISTS_BG.to_string(),
            background_color: palette::LISTS_BG.to_string(),
            colors_enabled: true,
            complete: false,
            creator: String::new(),
            creator_id: String::new(),
            creator_role: Role::default(),
            created: now,
            updated: now,
        }
    }
}

impl Column {
    /// Create a column on a board
    pub fn new(board_id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Record for Column {
    const COLLECTION: Collection = Collection::Columns;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
    fn not_found(id: &str) -> KanbanError {
        KanbanError::ColumnNotFound { id: id.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_defaults() {
        let board = Board::new("Groceries");
        assert_eq!(board.name, "Groceries");
        assert_eq!(board.entity_type, EntityType::Board);
        assert_eq!(board.board_type, BoardType::Kanban);
        assert_eq!(board.index, 1);
        assert_eq!(board.background_color, palette::MAIN_BG);
        assert_eq!(board.created, board.updated);
    }

    #[test]
    fn test_column_serializes_foreign_key() {
        let column = Column::new("Board_1", "Doing");
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["boardID"], "Board_1");
        assert_eq!(json["type"], "Column");
        assert_eq!(json["backgroundColor"], palette::LISTS_BG);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let column: Column =
            serde_json::from_str(r#"{"id": "Column_2", "name": "Done", "index": 3}"#).unwrap();
        assert_eq!(column.id, "Column_2");
        assert_eq!(column.index, 3);
        assert!(!column.complete);
        assert_eq!(column.color, palette::LISTS_BG);
    }
}
