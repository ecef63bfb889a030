//! The conductor home and the collaborators rooted in it.

use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Settings;
use crate::catalog::TemplateStore;
use crate::depot::DepotRegistry;
use crate::error::Result;
use crate::registrar::Registrars;

/// Directory under the home that holds downloaded templates.
pub const TEMPLATES_DIR: &str = "templates";

/// A conductor home with its settings loaded.
///
/// Every command opens one workspace and asks it for fresh snapshots;
/// nothing read from disk outlives the command.
#[derive(Debug, Clone)]
pub struct Workspace {
    home: PathBuf,
    settings: Settings,
}

impl Workspace {
    /// Open the home at `home`, creating it if needed.
    pub fn open(home: impl Into<PathBuf>) -> Result<Self> {
        let home = home.into();
        fs::create_dir_all(&home)?;
        let settings = Settings::load(&home)?;
        tracing::debug!("Using conductor home {}", home.display());
        Ok(Self { home, settings })
    }

    /// Workspace with explicit settings, bypassing `config.yml`.
    pub fn with_settings(home: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            home: home.into(),
            settings,
        }
    }

    /// The conductor home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The loaded settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load the depot registry, with the mainline depot from settings.
    pub fn registry(&self) -> Result<DepotRegistry> {
        DepotRegistry::load(&self.home, self.settings.mainline())
    }

    /// Local template storage.
    pub fn store(&self) -> TemplateStore {
        TemplateStore::new(self.home.join(TEMPLATES_DIR))
    }

    /// Registrars configured with the HTTP timeout from settings.
    pub fn registrars(&self) -> Result<Registrars> {
        Ok(Registrars::new(self.settings.http_timeout())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::SETTINGS_FILE;
    use crate::depot::{RegistrarKind, MAINLINE_DEPOT};
    use tempfile::TempDir;

    #[test]
    fn open_creates_home() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("nested").join("home");
        let workspace = Workspace::open(&home).unwrap();
        assert!(home.is_dir());
        assert_eq!(workspace.home(), home.as_path());
    }

    #[test]
    fn registry_starts_with_mainline_from_settings() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILE),
            "mainline_location: /srv/mainline\nmainline_registrar: directory\n",
        )
        .unwrap();

        let workspace = Workspace::open(temp.path()).unwrap();
        let registry = workspace.registry().unwrap();
        let mainline = registry.default_depot().unwrap();
        assert_eq!(mainline.name, MAINLINE_DEPOT);
        assert_eq!(mainline.registrar, RegistrarKind::Directory);
        assert_eq!(mainline.location, "/srv/mainline");
    }

    #[test]
    fn store_lives_under_templates() {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::with_settings(temp.path(), Settings::default());
        assert_eq!(workspace.store().root(), temp.path().join(TEMPLATES_DIR));
    }

    #[test]
    fn malformed_settings_fail_open() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(SETTINGS_FILE), "latest_scope: [").unwrap();
        assert!(Workspace::open(temp.path()).is_err());
    }
}
