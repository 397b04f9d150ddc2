//! Operation processors run operations and route their log entries

use crate::Execute;
use async_trait::async_trait;
use serde_json::Value;

/// Runs an operation and takes care of whatever the result asks for:
/// persisting log entries, attributing actors, reporting failures.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    /// Execute `op` against `ctx`, returning its value or error
    async fn process<O>(&self, op: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E>;
}
