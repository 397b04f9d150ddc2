//! The `Operation` metadata trait and the `Execute` trait

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Static metadata describing an operation.
///
/// The verb/noun pair forms the canonical op string ("add item",
/// "reorder tasks") recorded in activity logs.
pub trait Operation {
    /// The action, e.g. "add"
    fn verb(&self) -> &'static str;

    /// The resource acted on, e.g. "item"
    fn noun(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str;

    /// Canonical op string
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Execute an operation against a context.
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    /// Run the operation
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;

    /// IDs of the resources this operation touched, used to route per-resource logs
    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        Vec::new()
    }
}

/// Implement [`Operation`] for a struct.
///
/// ```ignore
/// impl_operation!(AddItem, verb = "add", noun = "item", description = "Create a new item");
/// ```
#[macro_export]
macro_rules! impl_operation {
    ($ty:ty, verb = $verb:literal, noun = $noun:literal, description = $desc:literal) => {
        impl $crate::Operation for $ty {
            fn verb(&self) -> &'static str {
                $verb
            }

            fn noun(&self) -> &'static str {
                $noun
            }

            fn description(&self) -> &'static str {
                $desc
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    impl_operation!(Ping, verb = "ping", noun = "board", description = "Check the board");

    #[async_trait]
    impl Execute<(), String> for Ping {
        async fn execute(&self, _ctx: &()) -> ExecutionResult<Value, String> {
            ExecutionResult::Unlogged {
                value: serde_json::json!("pong"),
            }
        }
    }

    #[test]
    fn test_op_string() {
        assert_eq!(Ping.op_string(), "ping board");
        assert_eq!(Ping.description(), "Check the board");
    }

    #[tokio::test]
    async fn test_execute() {
        let value = Ping.execute(&()).await.into_result().unwrap();
        assert_eq!(value, "pong");
        assert!(Ping.affected_resource_ids(&value).is_empty());
    }
}
