//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`conductor download`, `conductor new`)
//! - One workspace opened per invocation
//! - Consistent global flag handling

pub mod completions;
pub mod create_template;
pub mod depots;
pub mod dispatcher;
pub mod download;
pub mod project;
pub mod templates;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
