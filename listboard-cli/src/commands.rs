//! Maps parsed subcommands onto board operations

use crate::cli::{ColumnAction, Commands, ItemAction, TaskAction, UserAction};
use listboard_kanban::{
    activity::ListActivity,
    board::{GetBoard, InitBoard},
    column::{AddColumn, ListColumns},
    item::{
        AddItem, CloneItem, CompleteItem, DeleteItem, ListItems, ReorderItems, SwipeItem,
        UpdateItem,
    },
    task::{AddTask, CompleteTask, DeleteTask, ListTasks, ReorderTasks, UpdateTask},
    types::normalize_name,
    user::RegisterUser,
    Column, ColumnId, Execute, KanbanContext, KanbanError, KanbanOperationProcessor,
    Operation, OperationProcessor, Result,
};
use serde_json::Value;
use tracing::debug;

/// Run one subcommand and return the operation's JSON result
pub async fn run(
    command: Commands,
    ctx: &KanbanContext,
    processor: &KanbanOperationProcessor,
) -> Result<Value> {
    match command {
        Commands::Init { name } => process(processor, ctx, InitBoard::new(name)).await,
        Commands::Board => process(processor, ctx, GetBoard::new()).await,
        Commands::Column { action } => run_column(action, ctx, processor).await,
        Commands::Item { action } => run_item(action, ctx, processor).await,
        Commands::Task { action } => run_task(action, ctx, processor).await,
        Commands::User { action } => run_user(action, ctx, processor).await,
        Commands::Activity { limit } => {
            let op = match limit {
                Some(limit) => ListActivity::new().with_limit(limit),
                None => ListActivity::new(),
            };
            process(processor, ctx, op).await
        }
    }
}

async fn process<O>(
    processor: &KanbanOperationProcessor,
    ctx: &KanbanContext,
    op: O,
) -> Result<Value>
where
    O: Execute<KanbanContext, KanbanError>,
{
    debug!(op = %op.op_string(), "running");
    processor.process(&op, ctx).await
}

async fn run_column(
    action: ColumnAction,
    ctx: &KanbanContext,
    processor: &KanbanOperationProcessor,
) -> Result<Value> {
    match action {
        ColumnAction::Add { name } => process(processor, ctx, AddColumn::new(name)).await,
        ColumnAction::List => process(processor, ctx, ListColumns::new()).await,
    }
}

async fn run_item(
    action: ItemAction,
    ctx: &KanbanContext,
    processor: &KanbanOperationProcessor,
) -> Result<Value> {
    match action {
        ItemAction::Add {
            column,
            name,
            summary,
            description,
            image,
            color,
        } => {
            let mut op = AddItem::new(resolve_column(ctx, &column).await?, name);
            op.summary = summary;
            op.description = description;
            op.image = image;
            op.background_color = color;
            process(processor, ctx, op).await
        }
        ItemAction::Clone { id, to } => {
            let mut op = CloneItem::new(id);
            if let Some(column) = to {
                op = op.into_column(resolve_column(ctx, &column).await?);
            }
            process(processor, ctx, op).await
        }
        ItemAction::Update {
            id,
            name,
            summary,
            description,
            image,
            color,
            background_color,
            font_color,
        } => {
            let mut op = UpdateItem::new(id);
            op.name = name;
            op.summary = summary;
            op.description = description;
            op.image = image;
            op.color = color;
            op.background_color = background_color;
            op.font_color = font_color;
            process(processor, ctx, op).await
        }
        ItemAction::Complete { id, set } => {
            let op = match set {
                Some(complete) => CompleteItem::set(id, complete),
                None => CompleteItem::toggle(id),
            };
            process(processor, ctx, op).await
        }
        ItemAction::Delete { id } => process(processor, ctx, DeleteItem::new(id)).await,
        ItemAction::Move { column, from, to } => {
            let list_id = resolve_column(ctx, &column).await?;
            process(processor, ctx, ReorderItems::new(list_id, from, to)).await
        }
        ItemAction::Swipe { id, direction } => {
            process(processor, ctx, SwipeItem::new(id, direction.into())).await
        }
        ItemAction::List { column } => {
            let list_id = resolve_column(ctx, &column).await?;
            process(processor, ctx, ListItems::new(list_id)).await
        }
    }
}

async fn run_task(
    action: TaskAction,
    ctx: &KanbanContext,
    processor: &KanbanOperationProcessor,
) -> Result<Value> {
    match action {
        TaskAction::Add { item, name } => process(processor, ctx, AddTask::new(item, name)).await,
        TaskAction::Update {
            id,
            name,
            color,
            background_color,
        } => {
            let mut op = UpdateTask::new(id);
            op.name = name;
            op.color = color;
            op.background_color = background_color;
            process(processor, ctx, op).await
        }
        TaskAction::Complete { id, set } => {
            let op = match set {
                Some(complete) => CompleteTask::set(id, complete),
                None => CompleteTask::toggle(id),
            };
            process(processor, ctx, op).await
        }
        TaskAction::Delete { id } => process(processor, ctx, DeleteTask::new(id)).await,
        TaskAction::Move { item, from, to } => {
            process(processor, ctx, ReorderTasks::new(item, from, to)).await
        }
        TaskAction::List { item } => process(processor, ctx, ListTasks::new(item)).await,
    }
}

async fn run_user(
    action: UserAction,
    ctx: &KanbanContext,
    processor: &KanbanOperationProcessor,
) -> Result<Value> {
    match action {
        UserAction::Register { email, name, role } => {
            let mut op = RegisterUser::new(email).with_role(role.into());
            if let Some(name) = name {
                op = op.with_name(name);
            }
            process(processor, ctx, op).await
        }
    }
}

/// Resolve a column given by id, or by name (case-insensitive) on the board
pub async fn resolve_column(ctx: &KanbanContext, reference: &str) -> Result<ColumnId> {
    if let Some(column) = ctx.find::<Column>(reference).await? {
        return Ok(column.id);
    }

    let board = ctx.board().await?;
    let wanted = normalize_name(reference).to_lowercase();
    ctx.columns_for_board(&board.id)
        .await?
        .into_iter()
        .find(|column| normalize_name(&column.name).to_lowercase() == wanted)
        .map(|column| column.id)
        .ok_or_else(|| KanbanError::ColumnNotFound {
            id: reference.to_string(),
        })
}
