//! Task commands

mod add;
mod complete;
mod delete;
mod list;
mod reorder;
mod update;

pub use add::AddTask;
pub use complete::CompleteTask;
pub use delete::DeleteTask;
pub use list::ListTasks;
pub use reorder::ReorderTasks;
pub use update::UpdateTask;

use crate::context::KanbanContext;
use crate::error::Result;
use crate::identity::IdentityGenerator;
use crate::ordering::next_index;
use crate::types::{EntityType, Item, Task};

/// Give a new task its identity, creation count, index among `item`'s
/// tasks, and creator. Only the claimed count is persisted; the task itself
/// is not written.
pub(crate) async fn prepare_task(ctx: &KanbanContext, task: Task, item: &Item) -> Result<Task> {
    let all: Vec<Task> = ctx.list_all().await?;
    let siblings: Vec<Task> = all
        .iter()
        .filter(|t| t.item_id == item.id)
        .cloned()
        .collect();
    let count = ctx.claim_count(&all).await?;
    let index = next_index(&siblings);

    let taken = all.iter().map(|t| t.uuid.clone()).collect();
    let identity = IdentityGenerator::excluding(taken).generate(EntityType::Task, Some(count));
    let (creator, creator_id, creator_role) = ctx.creator();

    Ok(Task {
        id: identity.id.into(),
        uuid: identity.uuid,
        key: count,
        count,
        index,
        item_id: item.id.clone(),
        list_id: Some(item.list_id.clone()),
        board_id: item.board_id.clone(),
        creator,
        creator_id,
        creator_role,
        created: identity.timestamp,
        updated: identity.timestamp,
        ..task
    })
}
