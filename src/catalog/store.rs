//! Local template storage.
//!
//! Downloaded templates live at `<root>/<depot>/<name>@<version>/`. A
//! directory only counts as installed once its `template.yml` exists;
//! in-progress downloads are staged under a dot-prefixed sibling.

use std::fs;
use std::path::{Path, PathBuf};

use super::identifier::{is_path_segment, Identifier};
use super::manifest::{TemplateManifest, MANIFEST_FILE};
use crate::error::Result;

/// A template present in local storage.
#[derive(Debug, Clone)]
pub struct InstalledTemplate {
    /// Directory holding the template files.
    pub dir: PathBuf,
    /// The template's manifest.
    pub manifest: TemplateManifest,
}

impl InstalledTemplate {
    /// Identifier of the installed template.
    pub fn identifier(&self) -> Identifier {
        self.manifest.identifier()
    }

    /// Absolute path of a file listed in the manifest.
    pub fn file_path(&self, relative: &str) -> PathBuf {
        self.dir.join(relative)
    }

    /// Depot the template was downloaded from.
    ///
    /// Falls back to the storage directory the template sits in when the
    /// manifest does not record it.
    pub fn depot_name(&self) -> &str {
        self.manifest
            .depot
            .as_deref()
            .or_else(|| self.dir.parent()?.file_name()?.to_str())
            .unwrap_or_default()
    }
}

/// Filesystem-backed template storage.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    /// Storage rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every template downloaded from `depot`.
    pub fn depot_dir(&self, depot: &str) -> PathBuf {
        self.root.join(depot)
    }

    /// Final location of a template.
    pub fn template_dir(&self, depot: &str, identifier: &Identifier) -> PathBuf {
        self.depot_dir(depot).join(identifier.dir_name())
    }

    /// Staging location used while a download is in progress.
    pub fn staging_dir(&self, depot: &str, identifier: &Identifier) -> PathBuf {
        self.depot_dir(depot)
            .join(format!(".{}.partial", identifier.dir_name()))
    }

    /// Every template installed from `depot`, ordered by identifier.
    ///
    /// Directories without a readable manifest are skipped with a warning.
    pub fn installed(&self, depot: &str) -> Result<Vec<InstalledTemplate>> {
        let dir = self.depot_dir(depot);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut templates = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if hidden || !path.is_dir() {
                continue;
            }

            let manifest_path = path.join(MANIFEST_FILE);
            if !manifest_path.is_file() {
                continue;
            }

            match TemplateManifest::load(&manifest_path) {
                Ok(manifest) => templates.push(InstalledTemplate {
                    dir: path,
                    manifest,
                }),
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        templates.sort_by(|a, b| a.identifier().cmp(&b.identifier()));
        Ok(templates)
    }

    /// Look up one installed template.
    pub fn load(&self, depot: &str, identifier: &Identifier) -> Result<Option<InstalledTemplate>> {
        let dir = self.template_dir(depot, identifier);
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Ok(None);
        }

        let manifest = TemplateManifest::load(&manifest_path)?;
        Ok(Some(InstalledTemplate { dir, manifest }))
    }

    /// Whether a template is installed.
    pub fn contains(&self, depot: &str, identifier: &Identifier) -> bool {
        self.template_dir(depot, identifier)
            .join(MANIFEST_FILE)
            .is_file()
    }

    /// Delete everything downloaded from `depot`. Returns whether anything
    /// was removed.
    pub fn remove_depot(&self, depot: &str) -> Result<bool> {
        if !is_path_segment(depot) {
            return Err(anyhow::anyhow!(
                "Refusing to delete '{}': not a depot directory below {}",
                depot,
                self.root.display()
            )
            .into());
        }
        let dir = self.depot_dir(depot);
        if !dir.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&dir)?;
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Install a template with the given files directly into `store`.
    pub(crate) fn install(store: &TemplateStore, depot: &str, name: &str, version: &str) {
        let id = Identifier::new(name, version);
        let dir = store.template_dir(depot, &id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("main.c"), format!("// {} {}\n", name, version)).unwrap();

        let mut manifest = TemplateManifest::new(&id);
        manifest.depot = Some(depot.to_string());
        manifest.files = vec!["main.c".into()];
        manifest.save(&dir.join(MANIFEST_FILE)).unwrap();
    }

    #[test]
    fn installed_lists_templates_in_order() {
        let temp = TempDir::new().unwrap();
        let store = TemplateStore::new(temp.path());
        install(&store, "mainline", "kernel", "1.1.0");
        install(&store, "mainline", "kernel", "1.0.0");

        let ids: Vec<_> = store
            .installed("mainline")
            .unwrap()
            .iter()
            .map(|t| t.identifier().version)
            .collect();
        assert_eq!(ids, vec!["1.0.0", "1.1.0"]);
    }

    #[test]
    fn installed_for_unknown_depot_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = TemplateStore::new(temp.path());
        assert!(store.installed("ghost").unwrap().is_empty());
    }

    #[test]
    fn staging_and_manifestless_dirs_are_ignored() {
        let temp = TempDir::new().unwrap();
        let store = TemplateStore::new(temp.path());
        let id = Identifier::new("kernel", "2.0.0");
        fs::create_dir_all(store.staging_dir("mainline", &id)).unwrap();
        fs::create_dir_all(store.template_dir("mainline", &id)).unwrap();

        assert!(store.installed("mainline").unwrap().is_empty());
        assert!(!store.contains("mainline", &id));
    }

    #[test]
    fn load_finds_installed_template() {
        let temp = TempDir::new().unwrap();
        let store = TemplateStore::new(temp.path());
        install(&store, "alt", "okapilib", "3.0.0");

        let id = Identifier::new("okapilib", "3.0.0");
        let template = store.load("alt", &id).unwrap().unwrap();
        assert_eq!(template.manifest.depot.as_deref(), Some("alt"));
        assert_eq!(template.depot_name(), "alt");
        assert!(template.file_path("main.c").is_file());
        assert!(store.load("mainline", &id).unwrap().is_none());
    }

    #[test]
    fn remove_depot_deletes_storage() {
        let temp = TempDir::new().unwrap();
        let store = TemplateStore::new(temp.path());
        install(&store, "alt", "kernel", "1.0.0");

        assert!(store.remove_depot("alt").unwrap());
        assert!(!store.depot_dir("alt").exists());
        assert!(!store.remove_depot("alt").unwrap());
    }

    #[test]
    fn remove_depot_refuses_paths_outside_a_depot_dir() {
        let temp = TempDir::new().unwrap();
        let store = TemplateStore::new(temp.path().join("templates"));
        install(&store, "mainline", "kernel", "1.0.0");

        for name in [".", "..", "", "mainline/..", "../templates"] {
            assert!(store.remove_depot(name).is_err(), "{name}");
        }
        assert!(store.contains("mainline", &Identifier::new("kernel", "1.0.0")));
    }
}
