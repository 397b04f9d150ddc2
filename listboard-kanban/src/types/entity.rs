//! Shared entity vocabulary: type tags, roles, default colors, and the
//! `Record` trait that maps an entity onto a database collection.

use crate::database::Collection;
use crate::error::KanbanError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity type tag. Appears as the first segment of every generated id
/// and as the `type` field of every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    User,
    Board,
    Column,
    Item,
    Task,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Board => "Board",
            Self::Column => "Column",
            Self::Item => "Item",
            Self::Task => "Task",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission role, ordered from least to most privileged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Guest,
    #[default]
    Subscriber,
    Editor,
    Moderator,
    Administrator,
    Developer,
    Owner,
}

impl Role {
    /// Numeric level, 1 (Guest) through 7 (Owner)
    pub fn level(&self) -> u8 {
        *self as u8 + 1
    }
}

/// Theme color keys used as record defaults. The presentation layer
/// resolves these to concrete colors.
pub mod palette {
    pub const MAIN_BG: &str = "mainBG";
    pub const LISTS_BG: &str = "listsBG";
    pub const ACTIVE: &str = "active";
}

/// A record persisted as one flat document in a collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// The collection this record lives in
    const COLLECTION: Collection;

    /// Document key
    fn record_id(&self) -> &str;

    /// Apply construction-time defaults that depend on other fields.
    /// Called on every record read back from the database.
    fn normalize(&mut self) {}

    /// The error reported when a record with `id` does not exist
    fn not_found(id: &str) -> KanbanError {
        KanbanError::not_found(Self::COLLECTION.name(), id)
    }
}

/// Trim a display name and collapse internal whitespace
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}
