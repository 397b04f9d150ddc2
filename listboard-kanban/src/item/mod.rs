//! Item commands

mod add;
mod clone;
mod complete;
mod delete;
mod list;
mod reorder;
mod swipe;
mod update;

pub use add::AddItem;
pub use clone::CloneItem;
pub use complete::CompleteItem;
pub use delete::DeleteItem;
pub use list::ListItems;
pub use reorder::ReorderItems;
pub use swipe::SwipeItem;
pub use update::UpdateItem;

use crate::context::KanbanContext;
use crate::error::Result;
use crate::identity::IdentityGenerator;
use crate::ordering::next_index;
use crate::types::{Column, EntityType, Item};

/// Give a new item its identity, creation count, index in `column`, and
/// creator. Only the claimed count is persisted; the item itself is not
/// written.
pub(crate) async fn prepare_item(ctx: &KanbanContext, item: Item, column: &Column) -> Result<Item> {
    let all: Vec<Item> = ctx.list_all().await?;
    let siblings: Vec<Item> = all
        .iter()
        .filter(|i| i.list_id == column.id)
        .cloned()
        .collect();
    let count = ctx.claim_count(&all).await?;
    let index = next_index(&siblings);

    let taken = all.iter().map(|i| i.uuid.clone()).collect();
    let identity = IdentityGenerator::excluding(taken).generate(EntityType::Item, Some(count));
    let (creator, creator_id, creator_role) = ctx.creator();

    Ok(Item {
        id: identity.id.into(),
        uuid: identity.uuid,
        key: count,
        count,
        index,
        list_id: column.id.clone(),
        board_id: Some(column.board_id.clone()),
        creator,
        creator_id,
        creator_role,
        created: identity.timestamp,
        updated: identity.timestamp,
        ..item
    })
}
