//! Kanban engine over a document database
//!
//! This crate models boards, columns, items and tasks as flat records in a
//! document database, keeps sibling groups ordered by a 1-based `index`, and
//! mirrors the database into an in-process store through snapshot
//! subscriptions.
//!
//! ## Overview
//!
//! - **Identities** - every record gets a readable, sortable id of the form
//!   `{Type}_{count}_{h-mm-AM_M-D-YYYY}_{uuid}`
//! - **Ordering** - appends skip past the highest sibling index, creation
//!   counts never regress, and reorders renumber a group in one atomic batch
//! - **Cascade delete** - deleting an item deletes its tasks first
//! - **Sync** - a `SyncSession` replaces the `BoardStore` wholesale with each
//!   snapshot; local optimistic writes are advisory
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use listboard_kanban::{board::InitBoard, item::AddItem, Execute, InMemoryDatabase, KanbanContext};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = KanbanContext::new(Arc::new(InMemoryDatabase::new()));
//! let board = InitBoard::new("Groceries").execute(&ctx).await.into_result()?;
//!
//! let todo = board["columns"][0]["id"].as_str().unwrap_or_default();
//! let item = AddItem::new(todo, "Milk").execute(&ctx).await.into_result()?;
//!
//! println!("Created item: {}", item["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage
//!
//! Each collection (`users`, `boards`, `columns`, `items`, `tasks`,
//! `events`) holds one flat JSON document per record. Relations are
//! foreign-key fields (`boardID`, `listID`, `itemID`). Outside production
//! every collection name carries a `beta_` prefix.

mod context;
pub mod database;
mod error;
pub mod identity;
pub mod ordering;
mod processor;
pub mod store;
pub mod sync;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Command modules
pub mod activity;
pub mod board;
pub mod column;
pub mod item;
pub mod task;
pub mod user;

// Re-export Execute trait and types from operations crate
pub use listboard_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use context::KanbanContext;
pub use database::{
    Collection, DocumentDatabase, Environment, FileDatabase, InMemoryDatabase, Snapshot,
};
pub use error::{KanbanError, Result};
pub use identity::{Identity, IdentityGenerator};
pub use ordering::SwipeDirection;
pub use processor::KanbanOperationProcessor;
pub use store::{BoardState, BoardStore};
pub use sync::SyncSession;

// Re-export commonly used types
pub use types::{
    Board, BoardId, BoardType, Column, ColumnId, EntityType, Item, ItemId, Role, Task, TaskId,
    User, UserId,
};
