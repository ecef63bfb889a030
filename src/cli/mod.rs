//! Command-line interface for conductor.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    AddDepotArgs, Cli, Commands, CompletionsArgs, CreateTemplateArgs, DownloadArgs,
    ListDepotsArgs, ListTemplatesArgs, NewArgs, RemoveDepotArgs, UpgradeArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
