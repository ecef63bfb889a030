//! Project commands.
//!
//! `new` and `upgrade` resolve a kernel against downloaded templates only
//! and never prompt: ties go to the mainline depot, then registry order.

use std::path::{Path, PathBuf};

use crate::catalog::{build_local, InstalledTemplate, TemplateKind};
use crate::cli::args::{NewArgs, UpgradeArgs};
use crate::config::Workspace;
use crate::error::Result;
use crate::project::{create_project, upgrade_project};
use crate::resolution::{Mode, RawRequest, Resolver};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Find the downloaded kernel matching `version` and `depot`.
fn local_kernel(workspace: &Workspace, version: &str, depot: &str) -> Result<InstalledTemplate> {
    let request = RawRequest::new(TemplateKind::KERNEL_NAME, version, depot).normalize();
    let registry = workspace.registry()?;
    let store = workspace.store();
    let catalog = build_local(&store, &registry, &[TemplateKind::Kernel])?;

    let selection = Resolver::new(&catalog, &registry, Mode::Local)
        .with_latest_scope(workspace.settings().latest_scope)
        .resolve(&request)?
        .resolved()
        .ok_or_else(|| anyhow::anyhow!("Local resolution of {} was ambiguous", request))?;

    store
        .load(selection.depot_name(), selection.identifier())?
        .ok_or_else(|| {
            anyhow::anyhow!(
                "{} from {} disappeared from local storage",
                selection.identifier(),
                selection.depot_name()
            )
            .into()
        })
}

fn absolute(location: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(location)?)
}

/// The new command implementation.
pub struct NewCommand {
    workspace: Workspace,
    args: NewArgs,
}

impl NewCommand {
    /// Create a new `new` command.
    pub fn new(workspace: Workspace, args: NewArgs) -> Self {
        Self { workspace, args }
    }
}

impl Command for NewCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let template = local_kernel(&self.workspace, &self.args.kernel, &self.args.depot)?;
        let location = absolute(&self.args.location)?;

        ui.message(&format!(
            "Creating new project from {} on {} at {}",
            template.identifier(),
            template.depot_name(),
            location.display()
        ));
        let created = create_project(&template, &location)?;

        ui.success(&format!("Created project at {}", created.display()));
        Ok(CommandResult::success())
    }
}

/// The upgrade command implementation.
pub struct UpgradeCommand {
    workspace: Workspace,
    args: UpgradeArgs,
}

impl UpgradeCommand {
    /// Create a new upgrade command.
    pub fn new(workspace: Workspace, args: UpgradeArgs) -> Self {
        Self { workspace, args }
    }
}

impl Command for UpgradeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let template = local_kernel(&self.workspace, &self.args.kernel, &self.args.depot)?;
        let location = absolute(&self.args.location)?;

        ui.message(&format!(
            "Upgrading project at {} to {} on {}",
            location.display(),
            template.identifier(),
            template.depot_name()
        ));
        let upgraded = upgrade_project(&template, &location)?;

        ui.success(&format!("Upgraded project at {}", upgraded.display()));
        Ok(CommandResult::success())
    }
}
