//! User commands

mod register;

pub use register::RegisterUser;
