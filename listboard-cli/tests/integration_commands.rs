//! Subcommands against a file-backed board

use clap::Parser;
use listboard::cli::Cli;
use listboard::commands::run;
use listboard::config::Settings;
use listboard_kanban::{Environment, FileDatabase, KanbanContext, KanbanOperationProcessor};
use std::sync::Arc;
use tempfile::TempDir;

fn context(temp: &TempDir) -> KanbanContext {
    let settings = Settings {
        data_dir: temp.path().join(".listboard"),
        environment: Environment::Beta,
        email: Some("pat@example.com".into()),
        ..Settings::default()
    };
    let db = FileDatabase::new(&settings.data_dir, settings.environment);
    let mut ctx = KanbanContext::new(Arc::new(db));
    if let Some(user) = settings.session_user() {
        ctx = ctx.with_session(user);
    }
    ctx
}

async fn exec(ctx: &KanbanContext, args: &[&str]) -> serde_json::Value {
    let cli = Cli::try_parse_from(std::iter::once("listboard").chain(args.iter().copied()))
        .unwrap();
    run(cli.command, ctx, &KanbanOperationProcessor::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_item_lifecycle_through_subcommands() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);

    exec(&ctx, &["init", "Roadmap"]).await;
    let added = exec(&ctx, &["item", "add", "To Do", "Design"]).await;
    let item_id = added["id"].as_str().unwrap().to_string();
    assert_eq!(added["creator"], "Pat");

    exec(&ctx, &["task", "add", &item_id, "Sketch"]).await;
    exec(&ctx, &["task", "add", &item_id, "Review"]).await;
    let tasks = exec(&ctx, &["task", "list", &item_id]).await;
    assert_eq!(tasks["count"], 2);

    let swiped = exec(&ctx, &["item", "swipe", &item_id, "left"]).await;
    assert_eq!(swiped["moved"], true);
    let done = exec(&ctx, &["item", "list", "Done"]).await;
    assert_eq!(done["count"], 1);

    let deleted = exec(&ctx, &["item", "delete", &item_id]).await;
    assert_eq!(deleted["tasks_deleted"].as_array().unwrap().len(), 2);

    let reopened = context(&temp);
    let done = exec(&reopened, &["item", "list", "done"]).await;
    assert_eq!(done["count"], 0);
}

#[tokio::test]
async fn test_failed_subcommand_returns_error() {
    let temp = TempDir::new().unwrap();
    let ctx = context(&temp);
    exec(&ctx, &["init", "Roadmap"]).await;

    let cli = Cli::try_parse_from(["listboard", "item", "list", "Backlog"]).unwrap();
    let result = run(cli.command, &ctx, &KanbanOperationProcessor::new()).await;
    assert!(result.is_err());
}
