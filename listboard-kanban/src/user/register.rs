//! RegisterUser command

use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::types::{normalize_name, Role, User};
use listboard_operations::{async_trait, impl_operation, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Register a user. The display name defaults to the capitalized local
/// part of the email address.
#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterUser {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl_operation!(
    RegisterUser,
    verb = "register",
    noun = "user",
    description = "Register a user"
);

impl RegisterUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            role: Role::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for RegisterUser {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let email = self.email.trim().to_lowercase();
            if email.is_empty() {
                return Err(KanbanError::missing_field("email"));
            }
            if !email.contains('@') {
                return Err(KanbanError::invalid_value("email", "expected an address"));
            }

            let users: Vec<User> = ctx.list_all().await?;
            if let Some(existing) = users.iter().find(|u| u.email == email) {
                return Err(KanbanError::AlreadyExists {
                    id: existing.id.to_string(),
                });
            }

            let highest = users.iter().map(|u| u.index).max().unwrap_or(0);
            let index = highest.max(users.len() as u64) + 1;
            let name = self
                .name
                .as_deref()
                .map(normalize_name)
                .unwrap_or_default();
            let user = User {
                email,
                name,
                index,
                ..User::default()
            }
            .with_role(self.role)
            .prepared_at(chrono::Utc::now());

            ctx.write(&user).await?;
            info!(user = %user.id, role = ?user.role, "user registered");

            Ok(serde_json::to_value(&user)?)
        }
        .await;

        ExecutionResult::logged(self.op_string(), input, start, result)
    }
}
