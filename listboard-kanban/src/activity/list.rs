//! ListActivity command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read the activity log, newest first
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListActivity {
    /// Maximum number of entries to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl_operation!(
    ListActivity,
    verb = "list",
    noun = "activity",
    description = "List recorded operations, newest first"
);

impl ListActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ListActivity {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            let entries = ctx.read_activity(self.limit).await?;
            Ok(serde_json::json!({
                "entries": entries,
                "count": entries.len(),
            }))
        }
        .await;

        ExecutionResult::unlogged(result)
    }
}
