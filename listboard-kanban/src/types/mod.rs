//! Core types for the board engine

mod board;
mod entity;
mod ids;
mod item;
mod user;

// Re-export all types
pub use board::{Board, BoardType, Column};
pub use entity::{normalize_name, palette, EntityType, Record, Role};
pub use ids::{BoardId, ColumnId, ItemId, TaskId, UserId};
pub use item::{Item, Task};
pub use user::{Provider, User, UserKind};
