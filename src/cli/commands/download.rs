//! Download command implementation.
//!
//! The `conductor download` command resolves a request against the
//! federated catalog, asks the user to pick a depot when several offer
//! the template, and installs it into local storage.

use crate::catalog::{build_federated, Identifier, TemplateKind};
use crate::cli::args::DownloadArgs;
use crate::config::Workspace;
use crate::depot::{Depot, DepotRegistry};
use crate::error::{ConductorError, Result};
use crate::registrar::download;
use crate::resolution::{
    choose_depot, DepotSelector, Mode, RawRequest, Request, Resolution, ResolvedSelection,
    Resolver, VersionSelector,
};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The download command implementation.
pub struct DownloadCommand {
    workspace: Workspace,
    args: DownloadArgs,
}

impl DownloadCommand {
    /// Create a new download command.
    pub fn new(workspace: Workspace, args: DownloadArgs) -> Self {
        Self { workspace, args }
    }

    /// The normalized request this command was invoked with.
    pub fn request(&self) -> Request {
        RawRequest::new(&self.args.name, &self.args.version, &self.args.depot).normalize()
    }

    /// Look the request up in every depot's listing.
    fn resolve(
        &self,
        ui: &mut dyn UserInterface,
        request: &Request,
        registry: &DepotRegistry,
    ) -> Result<ResolvedSelection> {
        ui.message("Fetching online listing to verify available templates.");
        let registrars = self.workspace.registrars()?;
        let catalog = build_federated(
            &self.workspace.store(),
            registry,
            &registrars,
            &[request.kind()],
            &[],
        )?;

        let resolver = Resolver::new(&catalog, registry, Mode::Federated)
            .with_latest_scope(self.workspace.settings().latest_scope);

        let selection = match resolver.resolve(request)? {
            Resolution::Resolved(selection) => selection,
            Resolution::Ambiguous(choice) => {
                let depot = choose_depot(ui, &choice)?;
                let refined = request.clone().with_depot(depot);
                resolver.resolve(&refined)?.resolved().ok_or_else(|| {
                    anyhow::anyhow!("{} is still ambiguous after choosing a depot", refined)
                })?
            }
        };

        if request.version == VersionSelector::Latest {
            ui.message(&format!(
                "Resolved {} {} to {}",
                request.name,
                request.version,
                selection.identifier()
            ));
        }
        Ok(selection)
    }
}

impl Command for DownloadCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let request = self.request();
        let registry = self.workspace.registry()?;

        // Fully explicit requests may skip the listing.
        let (identifier, depot): (Identifier, Depot) = match (&request.version, &request.depot) {
            (VersionSelector::Exact(version), DepotSelector::Named(depot)) if self.args.no_check => {
                (
                    Identifier::new(&request.name, version),
                    registry.find(depot)?.clone(),
                )
            }
            _ => {
                let selection = self.resolve(ui, &request, &registry)?;
                let depot = registry.find(selection.depot_name())?.clone();
                (selection.identifier().clone(), depot)
            }
        };

        let registrars = self.workspace.registrars()?;
        let registrar = registrars.for_depot(&depot);
        let mut spinner = ui.start_spinner(&format!(
            "Downloading {} from {} using {}",
            identifier, depot.name, depot.registrar
        ));

        let installed = registrar
            .manifest(&depot, &identifier)
            .map_err(ConductorError::from)
            .and_then(|manifest| download(registrar, &self.workspace.store(), &depot, &manifest));

        match installed {
            Ok(template) => {
                spinner.finish_success(&format!("Downloaded {} from {}", identifier, depot.name));
                tracing::debug!("Stored at {}", template.dir.display());
                if ui.output_mode().shows_details() {
                    for file in &template.manifest.files {
                        ui.message(&format!("  {}", file));
                    }
                }
                if identifier.kind() == TemplateKind::Kernel {
                    ui.show_hint(&format!(
                        "Use `conductor new <location> {} {}` to create a project",
                        identifier.version, depot.name
                    ));
                }
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error(&format!("Failed to download {}", identifier));
                Err(e)
            }
        }
    }
}
