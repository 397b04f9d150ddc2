//! UpdateTask command

use crate::context::{decode, encode, KanbanContext};
use crate::database::{merge_fields, Collection};
use crate::error::KanbanError;
use crate::types::{normalize_name, Task, TaskId};
use chrono::Utc;
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Rename or recolor a task. Omitted fields are left as-is.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl_operation!(
    UpdateTask,
    verb = "update",
    noun = "task",
    description = "Rename or recolor a task"
);

impl UpdateTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for UpdateTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let task: Task = ctx.read(self.id.as_str()).await?;

            let mut fields = encode(self)?;
            fields.remove("id");
            if let Some(name) = &self.name {
                let name = normalize_name(name);
                if name.is_empty() {
                    return Err(KanbanError::missing_field("name"));
                }
                fields.insert("name".into(), json!(name));
            }
            if fields.is_empty() {
                return Ok(serde_json::to_value(&task)?);
            }

            let mut merged = encode(&task)?;
            merge_fields(&mut merged, fields.clone());
            let mut updated: Task = decode(merged)?;
            updated.updated = Utc::now();

            ctx.store().apply_optimistic_task(updated.clone()).await;
            ctx.update_fields(Collection::Tasks, task.id.as_str(), fields)
                .await?;
            info!(task = %task.id, "task updated");

            Ok(serde_json::to_value(&updated)?)
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }
}
