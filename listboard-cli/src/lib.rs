//! Command line front end for the listboard kanban engine.
//!
//! Settings come from `listboard.toml` and `LISTBOARD_*` variables (see
//! [`config`]). Every subcommand runs one board operation through the
//! activity-recording processor and prints its JSON result.

pub mod cli;
pub mod commands;
pub mod config;
