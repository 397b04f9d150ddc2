//! Item and Task records

use super::entity::{palette, EntityType, Record, Role};
use super::ids::{BoardId, ColumnId, ItemId, TaskId};
use crate::database::Collection;
use crate::error::KanbanError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A card in a column. `index` orders it among items sharing its `listID`;
/// `count` is its collection-wide creation sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub id: ItemId,
    pub uuid: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub key: u64,
    pub count: u64,
    pub index: u64,
    #[serde(rename = "listID")]
    pub list_id: ColumnId,
    #[serde(rename = "boardID", skip_serializing_if = "Option::is_none")]
    pub board_id: Option<BoardId>,
    pub name: String,
    pub summary: String,
    pub description: String,
    pub image: String,
    pub color: String,
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    pub complete: bool,
    pub creator: String,
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    pub creator_role: Role,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Default for Item {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::default(),
            uuid: String::new(),
            entity_type: EntityType::Item,
            key: 1,
            count: 1,
            index: 1,
            list_id: ColumnId::default(),
            board_id: None,
            name: String::new(),
            summary: String::new(),
            description: String::new(),
            image: String::new(),
            color: palette::ACTIVE.to_string(),
            background_color: palette::ACTIVE.to_string(),
            font_color: None,
            complete: false,
            creator: String::new(),
            creator_id: String::new(),
            creator_role: Role::default(),
            created: now,
            updated: now,
        }
    }
}

impl Item {
    /// Create an item in a column
    pub fn new(list_id: impl Into<ColumnId>, name: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the summary. An empty description falls back to it.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self.normalize();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self.normalize();
        self
    }

    /// Set the background color key
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    /// True when the item has no summary, description or image
    pub fn has_empty_details(&self) -> bool {
        self.summary.trim().is_empty()
            && self.description.trim().is_empty()
            && self.image.trim().is_empty()
    }
}

impl Record for Item {
    const COLLECTION: Collection = Collection::Items;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn not_found(id: &str) -> KanbanError {
        KanbanError::ItemNotFound { id: id.to_string() }
    }

    fn normalize(&mut self) {
        if self.description.is_empty() {
            self.description = self.summary.clone();
        }
    }
}

/// A checklist entry on an item. `index` orders it among tasks sharing its
/// `itemID`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: TaskId,
    pub uuid: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub key: u64,
    pub count: u64,
    pub index: u64,
    #[serde(rename = "itemID")]
    pub item_id: ItemId,
    #[serde(rename = "listID", skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ColumnId>,
    #[serde(rename = "boardID", skip_serializing_if = "Option::is_none")]
    pub board_id: Option<BoardId>,
    pub name: String,
    pub color: String,
    pub background_color: String,
    pub complete: bool,
    pub creator: String,
    #[serde(rename = "creatorID")]
    pub creator_id: String,
    pub creator_role: Role,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Default for Task {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::default(),
            uuid: String::new(),
            entity_type: EntityType::Task,
            key: 1,
            count: 1,
            index: 1,
            item_id: ItemId::default(),
            list_id: None,
            board_id: None,
            name: String::new(),
            color: palette::MAIN_BG.to_string(),
            background_color: palette::MAIN_BG.to_string(),
            complete: false,
            creator: String::new(),
            creator_id: String::new(),
            creator_role: Role::default(),
            created: now,
            updated: now,
        }
    }
}

impl Task {
    /// Create a task on an item
    pub fn new(item_id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Record for Task {
    const COLLECTION: Collection = Collection::Tasks;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
    fn not_found(id: &str) -> KanbanError {
        KanbanError::TaskNotFound { id: id.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_defaults() {
        let item = Item::new("Column_1", "Milk");
        assert_eq!(item.index, 1);
        assert!(!item.complete);
        assert_eq!(item.entity_type, EntityType::Item);
        assert_eq!(item.background_color, palette::ACTIVE);
        assert!(item.has_empty_details());
    }

    #[test]
    fn test_description_falls_back_to_summary() {
        let item = Item::new("Column_1", "Milk").with_summary("2%");
        assert_eq!(item.description, "2%");

        let item = Item::new("Column_1", "Milk")
            .with_description("whole")
            .with_summary("2%");
        assert_eq!(item.description, "whole");
    }

    #[test]
    fn test_item_document_field_names() {
        let item = Item::new("Column_1", "Milk");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["listID"], "Column_1");
        assert_eq!(json["creatorID"], "");
        assert!(json.get("boardID").is_none());
        assert!(json.get("fontColor").is_none());
    }

    #[test]
    fn test_task_from_partial_document() {
        let mut task: Task =
            serde_json::from_str(r#"{"id": "Task_1", "itemID": "Item_1", "name": "Buy"}"#)
                .unwrap();
        task.normalize();
        assert_eq!(task.item_id, "Item_1");
        assert_eq!(task.index, 1);
        assert_eq!(task.entity_type, EntityType::Task);
    }
}
