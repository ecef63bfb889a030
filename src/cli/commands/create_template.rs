//! Create template command implementation.

use crate::cli::args::CreateTemplateArgs;
use crate::config::Workspace;
use crate::error::Result;
use crate::project::create_template;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The create-template command implementation.
pub struct CreateTemplateCommand {
    workspace: Workspace,
    args: CreateTemplateArgs,
}

impl CreateTemplateCommand {
    /// Create a new create-template command.
    pub fn new(workspace: Workspace, args: CreateTemplateArgs) -> Self {
        Self { workspace, args }
    }
}

impl Command for CreateTemplateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let dir = match &self.args.location {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let registry = self.workspace.registry()?;
        if registry.get(&self.args.depot).is_none() {
            ui.warning(&format!(
                "No depot named '{}' is registered yet",
                self.args.depot
            ));
        }

        let path = create_template(&dir, &self.args.name, &self.args.version, &self.args.depot)?;
        ui.success(&format!("Created template at {}", path.display()));
        Ok(CommandResult::success())
    }
}
