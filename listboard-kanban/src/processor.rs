//! Operation processor for board commands

use crate::context::KanbanContext;
use crate::error::KanbanError;
use listboard_operations::{async_trait, Execute, OperationProcessor};
use serde_json::Value;
use tracing::{error, warn};

/// Runs board operations and records their activity.
///
/// Log entries from mutating operations are attributed to an actor (the
/// processor's explicit actor, else the session user) and persisted to the
/// events collection. Persisting is best-effort: a failure is logged and the
/// operation's own result is returned unchanged. Operation failures are
/// logged at the boundary and returned to the caller.
#[derive(Debug, Default, Clone)]
pub struct KanbanOperationProcessor {
    actor: Option<String>,
}

impl KanbanOperationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute every logged operation to `actor`
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }
}

#[async_trait]
impl OperationProcessor<KanbanContext, KanbanError> for KanbanOperationProcessor {
    async fn process<O>(&self, op: &O, ctx: &KanbanContext) -> Result<Value, KanbanError>
    where
        O: Execute<KanbanContext, KanbanError>,
    {
        let (result, log_entry) = op.execute(ctx).await.split();

        if let Some(mut entry) = log_entry {
            let actor = self
                .actor
                .clone()
                .or_else(|| ctx.session().map(|user| user.id.to_string()));
            if let Some(actor) = actor {
                entry = entry.with_actor(actor);
            }
            if let Err(e) = ctx.append_activity(&entry).await {
                warn!(op = %entry.op, error = %e, "failed to record activity");
            }
        }

        if let Err(e) = &result {
            error!(
                op = %op.op_string(),
                transient = e.is_transient(),
                error = %e,
                "operation failed"
            );
        }

        result
    }
}
