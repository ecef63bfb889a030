//! List templates command implementation.
//!
//! The `conductor list-templates` command shows what depots offer and
//! what has already been downloaded.

use regex::Regex;
use serde::Serialize;

use crate::catalog::{
    build_federated, build_local, compare_versions, Catalog, TemplateDescriptor, TemplateKind,
};
use crate::cli::args::ListTemplatesArgs;
use crate::config::Workspace;
use crate::error::{ConductorError, Result};
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// One row of the template listing.
#[derive(Debug, Serialize)]
struct TemplateRow<'a> {
    name: &'a str,
    version: &'a str,
    kind: TemplateKind,
    depot: &'a str,
    online: bool,
    offline: bool,
}

impl<'a> From<&'a TemplateDescriptor> for TemplateRow<'a> {
    fn from(descriptor: &'a TemplateDescriptor) -> Self {
        let identifier = descriptor.identifier();
        Self {
            name: &identifier.name,
            version: &identifier.version,
            kind: identifier.kind(),
            depot: descriptor.depot_name(),
            online: descriptor.is_online(),
            offline: descriptor.is_offline(),
        }
    }
}

/// The list-templates command implementation.
pub struct ListTemplatesCommand {
    workspace: Workspace,
    args: ListTemplatesArgs,
}

impl ListTemplatesCommand {
    /// Create a new list-templates command.
    pub fn new(workspace: Workspace, args: ListTemplatesArgs) -> Self {
        Self { workspace, args }
    }

    fn filters(&self) -> Result<Vec<Regex>> {
        self.args
            .filters
            .iter()
            .filter(|f| f.as_str() != ".*")
            .map(|f| {
                Regex::new(f).map_err(|e| {
                    ConductorError::Other(anyhow::anyhow!("Invalid filter '{}': {}", f, e))
                })
            })
            .collect()
    }

    fn catalog(&self, filters: &[Regex], kinds: &[TemplateKind]) -> Result<Catalog> {
        let registry = self.workspace.registry()?;
        let store = self.workspace.store();

        if self.args.offline {
            let catalog = build_local(&store, &registry, kinds)?;
            return Ok(catalog
                .descriptors()
                .filter(|d| filters.is_empty() || filters.iter().any(|f| f.is_match(d.depot_name())))
                .cloned()
                .collect());
        }

        let registrars = self.workspace.registrars()?;
        build_federated(&store, &registry, &registrars, kinds, filters)
    }
}

impl Command for ListTemplatesCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let filters = self.filters()?;
        let kinds = self.args.kinds();

        if !filters.is_empty() && !self.args.json {
            let registry = self.workspace.registry()?;
            let matching: Vec<&str> = registry
                .matching(&filters)
                .iter()
                .map(|d| d.name.as_str())
                .collect();
            ui.message(&format!(
                "Depots matching any of {}: {}",
                self.args.filters.join(", "),
                if matching.is_empty() {
                    "(none)".to_string()
                } else {
                    matching.join(", ")
                }
            ));
        }

        let catalog = self.catalog(&filters, &kinds)?;

        let mut descriptors: Vec<&TemplateDescriptor> = catalog.descriptors().collect();
        descriptors.sort_by(|a, b| {
            let (a_id, b_id) = (a.identifier(), b.identifier());
            a_id.name
                .cmp(&b_id.name)
                .then_with(|| compare_versions(&b_id.version, &a_id.version))
                .then_with(|| a.depot_name().cmp(b.depot_name()))
        });

        if self.args.json {
            let rows: Vec<TemplateRow> = descriptors.iter().map(|d| TemplateRow::from(*d)).collect();
            let json =
                serde_json::to_string_pretty(&rows).map_err(|e| ConductorError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        for kind in &kinds {
            let of_kind: Vec<&&TemplateDescriptor> = descriptors
                .iter()
                .filter(|d| d.identifier().kind() == *kind)
                .collect();

            ui.show_header(&format!("Available {}:", kind.plural()));
            if of_kind.is_empty() {
                ui.message(&format!("No {} found", kind.plural()));
                continue;
            }

            let mut table = Table::new(vec!["Name", "Version", "Depot", "Online", "Offline"]);
            for descriptor in of_kind {
                let row = TemplateRow::from(*descriptor);
                table.add_row(vec![
                    row.name,
                    row.version,
                    row.depot,
                    if row.online { "online" } else { "" },
                    if row.offline { "offline" } else { "" },
                ]);
            }
            ui.show_table(&table);
        }

        if catalog.is_empty() && self.args.offline {
            ui.show_hint("Use `conductor download` to download a template");
        }
        Ok(CommandResult::success())
    }
}
