use clap::Parser;
use listboard::cli::Cli;
use listboard::commands;
use listboard::config::Settings;
use listboard_kanban::{FileDatabase, KanbanContext, KanbanOperationProcessor};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    let filter = if cli.debug {
        EnvFilter::new("listboard=debug,listboard_kanban=debug,listboard_operations=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(settings.log.clone().unwrap_or_else(|| "warn".into()))
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(cli, settings).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };

    process::exit(exit_code);
}

async fn run(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    tracing::debug!(
        data_dir = %settings.data_dir.display(),
        environment = ?settings.environment,
        "opening board"
    );

    let db = FileDatabase::new(&settings.data_dir, settings.environment);
    let mut ctx = KanbanContext::new(Arc::new(db));
    if let Some(user) = settings.session_user() {
        ctx = ctx.with_session(user);
    }

    let processor = KanbanOperationProcessor::new();
    let value = commands::run(cli.command, &ctx, &processor).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
