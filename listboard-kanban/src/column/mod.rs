//! Column commands

mod add;
mod list;

pub use add::AddColumn;
pub use list::ListColumns;
