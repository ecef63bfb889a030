//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::Workspace;
use crate::error::Result;
use crate::ui::UserInterface;

use super::create_template::CreateTemplateCommand;
use super::depots::{AddDepotCommand, ListDepotsCommand, RemoveDepotCommand};
use super::download::DownloadCommand;
use super::project::{NewCommand, UpgradeCommand};
use super::templates::ListTemplatesCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    home: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given conductor home.
    pub fn new(home: PathBuf) -> Self {
        Self { home }
    }

    /// Get the conductor home.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Dispatch and execute a command.
    ///
    /// The workspace is opened per command so every command sees fresh
    /// settings, depots and storage.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Commands::Completions(args) = &cli.command {
            return super::completions::CompletionsCommand::new(args.clone()).execute(ui);
        }

        let workspace = Workspace::open(&self.home)?;
        match &cli.command {
            Commands::ListDepots(args) => {
                ListDepotsCommand::new(workspace, args.clone()).execute(ui)
            }
            Commands::AddDepot(args) => AddDepotCommand::new(workspace, args.clone()).execute(ui),
            Commands::RemoveDepot(args) => {
                RemoveDepotCommand::new(workspace, args.clone()).execute(ui)
            }
            Commands::ListTemplates(args) => {
                ListTemplatesCommand::new(workspace, args.clone()).execute(ui)
            }
            Commands::Download(args) => DownloadCommand::new(workspace, args.clone()).execute(ui),
            Commands::New(args) => NewCommand::new(workspace, args.clone()).execute(ui),
            Commands::Upgrade(args) => UpgradeCommand::new(workspace, args.clone()).execute(ui),
            Commands::CreateTemplate(args) => {
                CreateTemplateCommand::new(workspace, args.clone()).execute(ui)
            }
            Commands::Completions(_) => Ok(CommandResult::success()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"));
        assert_eq!(dispatcher.home(), Path::new("/test"));
    }

    #[test]
    fn dispatch_opens_workspace_in_home() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let cli = Cli::parse_from(["conductor", "list-depots"]);
        let mut ui = MockUI::new();

        let result = CommandDispatcher::new(home.clone())
            .dispatch(&cli, &mut ui)
            .unwrap();
        assert!(result.success);
        assert!(home.is_dir());
    }
}
