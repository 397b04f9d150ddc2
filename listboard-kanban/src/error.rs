//! Error types for the board engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, KanbanError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum KanbanError {
    /// No board has been initialized yet
    #[error("board not initialized")]
    NotInitialized,

    /// Board already exists
    #[error("board already exists: {id}")]
    AlreadyExists { id: String },

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Item not found
    #[error("item not found: {id}")]
    ItemNotFound { id: String },

    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Generic document not found
    #[error("{collection} document not found: {id}")]
    DocumentNotFound { collection: String, id: String },

    /// A reorder was computed against a sibling group that has since changed
    #[error("siblings of {parent} changed since they were read: {expected} expected, {found} present")]
    StaleOrdering {
        parent: String,
        expected: usize,
        found: usize,
    },

    /// Position outside the sibling group
    #[error("position {position} out of range for {len} siblings")]
    PositionOutOfRange { position: usize, len: usize },

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// The backing document database rejected or failed a call
    #[error("database error: {message}")]
    Database { message: String },

    /// Lock is held by another process
    #[error("lock busy - another write in progress at {path}")]
    LockBusy { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KanbanError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Create a document-not-found error
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DocumentNotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Network/database failures that a later snapshot may reconcile
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Database { .. } | Self::LockBusy { .. } | Self::Io(_)
        )
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy { .. } | Self::StaleOrdering { .. })
    }
}
