//! The `project.yml` marker written into every project.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{Identifier, InstalledTemplate};
use crate::error::{ConductorError, Result};

/// File name of the project marker, relative to the project root.
pub const PROJECT_FILE: &str = "project.yml";

/// The kernel a project was created from or last upgraded to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelRecord {
    pub name: String,
    pub version: String,
    pub depot: String,
}

impl KernelRecord {
    /// Record for an installed template.
    pub fn of(template: &InstalledTemplate) -> Self {
        Self {
            name: template.manifest.name.clone(),
            version: template.manifest.version.clone(),
            depot: template.depot_name().to_string(),
        }
    }

    /// Identifier of the recorded kernel.
    pub fn identifier(&self) -> Identifier {
        Identifier::new(&self.name, &self.version)
    }
}

/// Contents of a `project.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Kernel the project currently tracks.
    pub kernel: KernelRecord,

    /// When the project was created.
    pub created_at: DateTime<Utc>,

    /// When the project was last upgraded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgraded_at: Option<DateTime<Utc>>,
}

impl ProjectFile {
    /// A fresh project record.
    pub fn new(kernel: KernelRecord) -> Self {
        Self {
            kernel,
            created_at: Utc::now(),
            upgraded_at: None,
        }
    }

    /// Path of the marker inside `root`.
    pub fn path(root: &Path) -> PathBuf {
        root.join(PROJECT_FILE)
    }

    /// Whether `root` holds a project.
    pub fn exists(root: &Path) -> bool {
        Self::path(root).is_file()
    }

    /// Load the marker from `root`.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        if !path.is_file() {
            return Err(ConductorError::ProjectNotFound {
                path: root.to_path_buf(),
            });
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content).map_err(|e| ConductorError::ConfigParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Write the marker into `root` using write-then-rename.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);
        let content = serde_yaml::to_string(self).map_err(|e| ConductorError::ConfigParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let temp_path = path.with_extension("yml.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record() -> KernelRecord {
        KernelRecord {
            name: "kernel".into(),
            version: "1.2.0".into(),
            depot: "mainline".into(),
        }
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let file = ProjectFile::new(record());
        file.save(temp.path()).unwrap();

        assert!(ProjectFile::exists(temp.path()));
        let loaded = ProjectFile::load(temp.path()).unwrap();
        assert_eq!(loaded, file);
        assert_eq!(loaded.kernel.identifier(), Identifier::new("kernel", "1.2.0"));
    }

    #[test]
    fn load_without_marker_is_project_not_found() {
        let temp = TempDir::new().unwrap();
        let err = ProjectFile::load(temp.path()).unwrap_err();
        assert!(matches!(err, ConductorError::ProjectNotFound { .. }));
    }

    #[test]
    fn load_malformed_marker_is_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROJECT_FILE), "kernel: 3").unwrap();
        let err = ProjectFile::load(temp.path()).unwrap_err();
        assert!(matches!(err, ConductorError::ConfigParseError { .. }));
    }

    #[test]
    fn upgraded_at_is_omitted_until_set() {
        let yaml = serde_yaml::to_string(&ProjectFile::new(record())).unwrap();
        assert!(!yaml.contains("upgraded_at"));
    }
}
