//! Board commands

mod get;
mod init;

pub use get::GetBoard;
pub use init::InitBoard;
