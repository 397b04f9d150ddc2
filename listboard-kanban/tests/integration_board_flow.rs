//! End-to-end board flow over a file-backed database

use listboard_kanban::{
    board::{GetBoard, InitBoard},
    item::{AddItem, DeleteItem, ReorderItems, SwipeItem},
    task::{AddTask, ListTasks},
    types::Record,
    user::RegisterUser,
    Environment, Execute, FileDatabase, Item, KanbanContext, KanbanOperationProcessor,
    OperationProcessor, Task, User,
};
use std::sync::Arc;
use tempfile::TempDir;

async fn setup(temp: &TempDir) -> KanbanContext {
    let db = FileDatabase::new(temp.path().join(".listboard"), Environment::Beta);
    KanbanContext::new(Arc::new(db)).with_session(User::new("sam@example.com"))
}

#[tokio::test]
async fn test_board_flow_end_to_end() {
    let temp = TempDir::new().unwrap();
    let ctx = setup(&temp).await;
    let processor = KanbanOperationProcessor::new();

    let board = processor
        .process(&InitBoard::new("Groceries"), &ctx)
        .await
        .unwrap();
    let todo = board["columns"][0]["id"].as_str().unwrap().to_string();
    let doing = board["columns"][1]["id"].as_str().unwrap().to_string();

    let mut ids = Vec::new();
    for name in ["milk", "bread", "eggs"] {
        let item = processor
            .process(&AddItem::new(todo.as_str(), name), &ctx)
            .await
            .unwrap();
        ids.push(item["id"].as_str().unwrap().to_string());
    }

    processor
        .process(&AddTask::new(ids[0].as_str(), "oat"), &ctx)
        .await
        .unwrap();
    processor
        .process(&AddTask::new(ids[0].as_str(), "whole"), &ctx)
        .await
        .unwrap();

    // Drag eggs to the top
    processor
        .process(
            &ReorderItems::new(todo.as_str(), 2, 0).expecting(ids.iter().map(String::as_str)),
            &ctx,
        )
        .await
        .unwrap();
    let order: Vec<String> = ctx
        .items_for_column(&todo.as_str().into())
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(order, vec!["eggs", "milk", "bread"]);

    // Swipe milk to Doing
    let swiped = processor
        .process(&SwipeItem::right(ids[0].as_str()), &ctx)
        .await
        .unwrap();
    assert_eq!(swiped["listID"], doing.as_str());
    assert_eq!(swiped["index"], 1);

    // Tasks follow the item by itemID
    let tasks = processor
        .process(&ListTasks::new(ids[0].as_str()), &ctx)
        .await
        .unwrap();
    assert_eq!(tasks["count"], 2);

    processor
        .process(&DeleteItem::new(ids[0].as_str()), &ctx)
        .await
        .unwrap();
    let remaining: Vec<Task> = ctx.list_all().await.unwrap();
    assert!(remaining.is_empty());

    let board = processor.process(&GetBoard::new(), &ctx).await.unwrap();
    assert_eq!(board["name"], "Groceries");

    // init + 3 adds + 2 tasks + reorder + swipe + delete
    let activity = ctx.read_activity(None).await.unwrap();
    assert_eq!(activity.len(), 9);
    assert_eq!(activity[0].op, "delete item");
    assert!(activity.iter().all(|e| e.actor.is_some()));
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let item_id = {
        let ctx = setup(&temp).await;
        let board = InitBoard::new("Groceries")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let item = AddItem::new(board["columns"][0]["id"].as_str().unwrap(), "milk")
            .with_summary("oat")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        item["id"].as_str().unwrap().to_string()
    };

    let ctx = setup(&temp).await;
    let item: Item = ctx.read(&item_id).await.unwrap();
    assert_eq!(item.record_id(), item_id);
    assert_eq!(item.name, "milk");
    assert_eq!(item.description, "oat");
    assert_eq!(item.background_color, "active");
    assert_eq!(item.index, 1);
    assert!(!item.complete);
}

#[tokio::test]
async fn test_environments_are_isolated() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join(".listboard");

    let beta = KanbanContext::new(Arc::new(FileDatabase::new(&root, Environment::Beta)));
    let production =
        KanbanContext::new(Arc::new(FileDatabase::new(&root, Environment::Production)));

    RegisterUser::new("a@example.com")
        .execute(&beta)
        .await
        .into_result()
        .unwrap();

    assert!(root.join("beta_users").is_dir());
    let users: Vec<User> = production.list_all().await.unwrap();
    assert!(users.is_empty());
}
