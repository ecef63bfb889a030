//! Depot management commands.
//!
//! `list-depots`, `add-depot` and `remove-depot` operate on the registry
//! persisted in the conductor home.

use crate::cli::args::{AddDepotArgs, ListDepotsArgs, RemoveDepotArgs};
use crate::config::Workspace;
use crate::depot::{Depot, DepotRegistry, RegistrarKind, RegistryError};
use crate::error::{ConductorError, Result};
use crate::ui::{Prompt, Table, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The list-depots command implementation.
pub struct ListDepotsCommand {
    workspace: Workspace,
    args: ListDepotsArgs,
}

impl ListDepotsCommand {
    /// Create a new list-depots command.
    pub fn new(workspace: Workspace, args: ListDepotsArgs) -> Self {
        Self { workspace, args }
    }
}

impl Command for ListDepotsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = self.workspace.registry()?;
        let depots = registry.list();

        if self.args.json {
            let json = serde_json::to_string_pretty(&depots)
                .map_err(|e| ConductorError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let mut table = Table::new(vec!["Name", "Registrar", "Location"]);
        for depot in &depots {
            table.add_row(vec![
                depot.name.as_str(),
                depot.registrar.as_str(),
                depot.location.as_str(),
            ]);
        }
        ui.show_table(&table);

        if depots.len() <= 1 {
            ui.show_hint("Use `conductor add-depot` to register another depot");
        }
        Ok(CommandResult::success())
    }
}

/// The add-depot command implementation.
pub struct AddDepotCommand {
    workspace: Workspace,
    args: AddDepotArgs,
}

impl AddDepotCommand {
    /// Create a new add-depot command.
    pub fn new(workspace: Workspace, args: AddDepotArgs) -> Self {
        Self { workspace, args }
    }

    /// Ask before overwriting a depot that is already registered.
    fn overwrite(
        &self,
        ui: &mut dyn UserInterface,
        registry: &DepotRegistry,
        name: &str,
    ) -> Result<bool> {
        if registry.is_protected(name) {
            return Err(RegistryError::ProtectedDepot {
                name: name.to_string(),
            }
            .into());
        }
        if registry.get(name).is_none() {
            return Ok(false);
        }

        let question = format!(
            "A depot with the name {} already exists. Do you want to overwrite it?",
            name
        );
        let confirmed = ui
            .prompt(&Prompt::confirm("overwrite", &question, false))?
            .as_bool()
            .unwrap_or(false);
        if !confirmed {
            return Err(RegistryError::DuplicateDepot {
                name: name.to_string(),
            }
            .into());
        }
        Ok(true)
    }

    fn registrar(&self, ui: &mut dyn UserInterface) -> Result<RegistrarKind> {
        if let Some(kind) = self.args.registrar {
            return Ok(kind);
        }

        let kinds = RegistrarKind::all();
        let values: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();
        let answer = ui
            .prompt(&Prompt::select("registrar", "Registrar of the new depot", &values))?
            .as_string();
        answer
            .parse::<RegistrarKind>()
            .map_err(|e| anyhow::anyhow!(e).into())
    }
}

impl Command for AddDepotCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut registry = self.workspace.registry()?;

        let name = match &self.args.name {
            Some(name) => name.clone(),
            None => ui
                .prompt(&Prompt::input("name", "Unique name of the new depot"))?
                .as_string(),
        };
        let name = name.trim().to_string();
        let overwrite = self.overwrite(ui, &registry, &name)?;
        let registrar = self.registrar(ui)?;
        let location = match &self.args.location {
            Some(location) => location.clone(),
            None => ui
                .prompt(&Prompt::input("location", "Location of the new depot"))?
                .as_string(),
        };

        // Directory depots are read from wherever conductor runs next.
        let location = match registrar {
            RegistrarKind::Directory => std::path::absolute(&location)?
                .to_string_lossy()
                .to_string(),
            RegistrarKind::Http => location,
        };

        let depot = Depot::new(name, registrar, location).registered_now();
        let summary = depot.to_string();
        if overwrite {
            let previous = registry.replace(depot)?;
            tracing::debug!("Overwrote depot {}", previous);
        } else {
            registry.add(depot)?;
        }
        registry.save()?;

        ui.success(&format!("Added depot {}", summary));
        Ok(CommandResult::success())
    }
}

/// The remove-depot command implementation.
pub struct RemoveDepotCommand {
    workspace: Workspace,
    args: RemoveDepotArgs,
}

impl RemoveDepotCommand {
    /// Create a new remove-depot command.
    pub fn new(workspace: Workspace, args: RemoveDepotArgs) -> Self {
        Self { workspace, args }
    }
}

impl Command for RemoveDepotCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut registry = self.workspace.registry()?;

        let name = match &self.args.name {
            Some(name) => name.clone(),
            None => ui.prompt(&Prompt::input("name", "Name of the depot"))?.as_string(),
        };

        let removed = registry.remove(&name)?;
        ui.message(&format!("Removing {}", removed));

        if self.workspace.store().remove_depot(&removed.name)? {
            tracing::debug!("Deleted templates downloaded from {}", removed.name);
        }
        registry.save()?;

        ui.success(&format!("Removed depot {}", removed.name));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::install;
    use crate::catalog::Identifier;
    use crate::config::Settings;
    use crate::depot::MAINLINE_DEPOT;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn workspace(temp: &TempDir) -> Workspace {
        Workspace::with_settings(temp.path(), Settings::default())
    }

    fn add(temp: &TempDir, name: &str, location: &str) -> Result<CommandResult> {
        let args = AddDepotArgs {
            name: Some(name.into()),
            registrar: Some(RegistrarKind::Directory),
            location: Some(location.into()),
        };
        AddDepotCommand::new(workspace(temp), args).execute(&mut MockUI::new())
    }

    #[test]
    fn list_shows_mainline_and_hint() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();

        let result = ListDepotsCommand::new(workspace(&temp), ListDepotsArgs::default())
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.tables()[0].rows()[0][0], MAINLINE_DEPOT);
        assert!(ui.has_hint("add-depot"));
    }

    #[test]
    fn list_json() {
        let temp = TempDir::new().unwrap();
        add(&temp, "alt", "/srv/alt").unwrap();
        let mut ui = MockUI::new();

        ListDepotsCommand::new(workspace(&temp), ListDepotsArgs { json: true })
            .execute(&mut ui)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["name"], "alt");
        assert_eq!(parsed[1]["registrar"], "directory");
    }

    #[test]
    fn add_persists_depot() {
        let temp = TempDir::new().unwrap();
        add(&temp, "alt", "/srv/alt").unwrap();

        let registry = workspace(&temp).registry().unwrap();
        let depot = registry.find("alt").unwrap();
        assert_eq!(depot.location, "/srv/alt");
        assert!(depot.added_at.is_some());
    }

    #[test]
    fn add_prompts_for_missing_values() {
        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        ui.set_prompt_response("name", "beta");
        ui.set_prompt_response("registrar", "http");
        ui.set_prompt_response("location", "https://beta.example.org");

        AddDepotCommand::new(workspace(&temp), AddDepotArgs::default())
            .execute(&mut ui)
            .unwrap();

        let registry = workspace(&temp).registry().unwrap();
        assert_eq!(registry.find("beta").unwrap().registrar, RegistrarKind::Http);
        assert_eq!(ui.prompts_shown(), &["name", "registrar", "location"]);
        assert!(ui.has_success("beta"));
    }

    #[test]
    fn add_rejects_duplicates_and_mainline() {
        let temp = TempDir::new().unwrap();
        add(&temp, "alt", "/srv/alt").unwrap();

        let err = add(&temp, "alt", "/srv/other").unwrap_err();
        assert!(matches!(
            err,
            ConductorError::Registry(RegistryError::DuplicateDepot { .. })
        ));

        let err = add(&temp, MAINLINE_DEPOT, "/srv/other").unwrap_err();
        assert!(matches!(
            err,
            ConductorError::Registry(RegistryError::ProtectedDepot { .. })
        ));
    }

    #[test]
    fn add_overwrites_existing_depot_when_confirmed() {
        let temp = TempDir::new().unwrap();
        add(&temp, "alt", "/srv/alt").unwrap();
        add(&temp, "beta", "/srv/beta").unwrap();

        let mut ui = MockUI::new();
        ui.set_prompt_response("overwrite", "yes");
        let args = AddDepotArgs {
            name: Some("alt".into()),
            registrar: Some(RegistrarKind::Http),
            location: Some("https://alt.example.org".into()),
        };
        AddDepotCommand::new(workspace(&temp), args)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(ui.prompts_shown(), &["overwrite"]);
        let registry = workspace(&temp).registry().unwrap();
        let names: Vec<_> = registry.list().iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec![MAINLINE_DEPOT, "alt", "beta"]);
        assert_eq!(registry.find("alt").unwrap().location, "https://alt.example.org");
    }

    #[test]
    fn add_keeps_existing_depot_when_declined() {
        let temp = TempDir::new().unwrap();
        add(&temp, "alt", "/srv/alt").unwrap();

        let mut ui = MockUI::new();
        ui.set_prompt_response("overwrite", "no");
        let args = AddDepotArgs {
            name: Some("alt".into()),
            registrar: Some(RegistrarKind::Directory),
            location: Some("/srv/other".into()),
        };
        let err = AddDepotCommand::new(workspace(&temp), args)
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(
            err,
            ConductorError::Registry(RegistryError::DuplicateDepot { .. })
        ));
        assert_eq!(
            workspace(&temp).registry().unwrap().find("alt").unwrap().location,
            "/srv/alt"
        );
    }

    #[test]
    fn remove_deletes_depot_and_storage() {
        let temp = TempDir::new().unwrap();
        add(&temp, "alt", "/srv/alt").unwrap();
        let store = workspace(&temp).store();
        install(&store, "alt", "kernel", "1.0.0");

        let mut ui = MockUI::new();
        RemoveDepotCommand::new(
            workspace(&temp),
            RemoveDepotArgs {
                name: Some("alt".into()),
            },
        )
        .execute(&mut ui)
        .unwrap();

        assert!(workspace(&temp).registry().unwrap().get("alt").is_none());
        assert!(!store.contains("alt", &Identifier::new("kernel", "1.0.0")));
        assert!(ui.has_message("Removing alt"));
    }

    #[test]
    fn remove_mainline_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = RemoveDepotCommand::new(
            workspace(&temp),
            RemoveDepotArgs {
                name: Some(MAINLINE_DEPOT.into()),
            },
        )
        .execute(&mut MockUI::new())
        .unwrap_err();

        assert!(matches!(
            err,
            ConductorError::Registry(RegistryError::ProtectedDepot { .. })
        ));
    }
}
