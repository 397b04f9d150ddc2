//! # Listboard Operations
//!
//! This crate provides the `Operation` trait for defining board operations.
//! Operations are structs where the fields ARE the parameters - no duplication.
//!
//! ## Example
//!
//! ```ignore
//! use listboard_operations::*;
//!
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AddItem {
//!     /// The column the item is created in
//!     pub list_id: String,
//!     /// The item name
//!     pub name: String,
//! }
//!
//! impl_operation!(AddItem, verb = "add", noun = "item", description = "Create a new item");
//!
//! #[async_trait]
//! impl Execute<KanbanContext, KanbanError> for AddItem {
//!     async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
//!         // implementation returns ExecutionResult::Logged or Unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
