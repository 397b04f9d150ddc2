//! Log entry types for operation tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A log entry recording an operation execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique ID for this log entry (ULID format)
    pub id: String,

    /// When the operation occurred
    pub timestamp: DateTime<Utc>,

    /// Canonical op string (e.g., "add item", "reorder tasks")
    pub op: String,

    /// The normalized input parameters (as JSON)
    pub input: Value,

    /// The result value or error (as JSON)
    pub output: Value,

    /// Who performed the operation (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// How long the operation took (milliseconds)
    pub duration_ms: u64,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(
        op: impl Into<String>,
        input: Value,
        output: Value,
        actor: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor,
            duration_ms,
        }
    }

    /// Set the actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Whether this entry records a failed operation
    pub fn is_failure(&self) -> bool {
        self.output.get("error").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_ids_are_ulids() {
        let entry = LogEntry::new("add task", Value::Null, Value::Null, None, 3);
        assert_eq!(entry.id.len(), 26);
        assert!(entry.actor.is_none());
        assert!(!entry.is_failure());
    }

    #[test]
    fn test_with_actor_skips_serializing_when_absent() {
        let bare = LogEntry::new("add task", Value::Null, Value::Null, None, 0);
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("actor").is_none());

        let attributed = bare.with_actor("Default");
        let json = serde_json::to_value(&attributed).unwrap();
        assert_eq!(json["actor"], "Default");
    }
}
