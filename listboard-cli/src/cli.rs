use clap::{Parser, Subcommand, ValueEnum};
use listboard_kanban::{Role, SwipeDirection};
use std::path::PathBuf;

/// Listboard - a kanban board of columns, items and tasks
#[derive(Parser, Debug)]
#[command(name = "listboard")]
#[command(version)]
#[command(about = "Listboard - a kanban board of columns, items and tasks")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Config file to load instead of ./listboard.toml
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the board with its default columns
    Init {
        /// Board name
        name: String,
    },

    /// Show the board
    Board,

    /// Manage columns
    Column {
        #[command(subcommand)]
        action: ColumnAction,
    },

    /// Manage items
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Manage the tasks of an item
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show recent activity, newest first
    Activity {
        /// Maximum number of entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ColumnAction {
    /// Append a column to the board
    Add {
        /// Column name
        name: String,
    },
    /// List the board's columns in order
    List,
}

#[derive(Subcommand, Debug)]
pub enum ItemAction {
    /// Add an item to the end of a column
    Add {
        /// Column id or name
        column: String,
        /// Item name
        name: String,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// Background color; defaults to the last item's color
        #[arg(long)]
        color: Option<String>,
    },
    /// Copy an item and its tasks
    Clone {
        /// Item id
        id: String,
        /// Column id or name to copy into; defaults to the item's column
        #[arg(long)]
        to: Option<String>,
    },
    /// Change an item's fields
    Update {
        /// Item id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        background_color: Option<String>,
        #[arg(long)]
        font_color: Option<String>,
    },
    /// Toggle or set an item's completion
    Complete {
        /// Item id
        id: String,
        /// Set explicitly instead of toggling
        #[arg(long)]
        set: Option<bool>,
    },
    /// Delete an item and its tasks
    Delete {
        /// Item id
        id: String,
    },
    /// Move the item at one position of a column to another (0-based)
    Move {
        /// Column id or name
        column: String,
        from: usize,
        to: usize,
    },
    /// Move an item to the neighbouring column, wrapping around
    Swipe {
        /// Item id
        id: String,
        #[arg(value_enum)]
        direction: Direction,
    },
    /// List the items of a column
    List {
        /// Column id or name
        column: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Add a task to the end of an item's checklist
    Add {
        /// Item id
        item: String,
        /// Task name
        name: String,
    },
    /// Change a task's fields
    Update {
        /// Task id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        background_color: Option<String>,
    },
    /// Toggle or set a task's completion
    Complete {
        /// Task id
        id: String,
        #[arg(long)]
        set: Option<bool>,
    },
    /// Delete a task
    Delete {
        /// Task id
        id: String,
    },
    /// Move the task at one position of an item to another (0-based)
    Move {
        /// Item id
        item: String,
        from: usize,
        to: usize,
    },
    /// List the tasks of an item
    List {
        /// Item id
        item: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Register a user
    Register {
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum, default_value_t = RoleArg::Subscriber)]
        role: RoleArg,
    },
}

/// Swipe direction
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl From<Direction> for SwipeDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Left => SwipeDirection::Left,
            Direction::Right => SwipeDirection::Right,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Guest,
    Subscriber,
    Editor,
    Moderator,
    Administrator,
    Developer,
    Owner,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Guest => Role::Guest,
            RoleArg::Subscriber => Role::Subscriber,
            RoleArg::Editor => Role::Editor,
            RoleArg::Moderator => Role::Moderator,
            RoleArg::Administrator => Role::Administrator,
            RoleArg::Developer => Role::Developer,
            RoleArg::Owner => Role::Owner,
        }
    }
}
