//! Template manifests.
//!
//! Every template directory, remote or local, carries a `template.yml`
//! naming the template and the files it is made of. Local copies also
//! record which depot they came from and when.

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};

use super::identifier::{is_path_segment, Identifier};
use crate::error::{ConductorError, Result};

/// File name of a template manifest.
pub const MANIFEST_FILE: &str = "template.yml";

/// Contents of a `template.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Template name.
    pub name: String,

    /// Template version.
    pub version: String,

    /// Depot the template was downloaded from (local copies only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depot: Option<String>,

    /// Files making up the template, relative to the template directory.
    #[serde(default)]
    pub files: Vec<String>,

    /// Files replaced by `upgrade`; empty means every file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upgrade_files: Vec<String>,

    /// SHA-256 hex digests keyed by file path.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub checksums: BTreeMap<String, String>,

    /// When the local copy was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded_at: Option<DateTime<Utc>>,
}

impl TemplateManifest {
    /// A manifest with no files.
    pub fn new(identifier: &Identifier) -> Self {
        Self {
            name: identifier.name.clone(),
            version: identifier.version.clone(),
            depot: None,
            files: Vec::new(),
            upgrade_files: Vec::new(),
            checksums: BTreeMap::new(),
            downloaded_at: None,
        }
    }

    /// Parse a manifest document.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let manifest: Self =
            serde_yaml::from_str(content).context("Invalid template manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| ConductorError::ConfigParseError {
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        })
    }

    /// Write the manifest to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(|e| ConductorError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, content)?;
        Ok(())
    }

    /// The identifier this manifest describes.
    pub fn identifier(&self) -> Identifier {
        Identifier::new(&self.name, &self.version)
    }

    /// Files copied over an existing project by `upgrade`.
    pub fn effective_upgrade_files(&self) -> &[String] {
        if self.upgrade_files.is_empty() {
            &self.files
        } else {
            &self.upgrade_files
        }
    }

    /// Reject manifests whose paths could escape the template directory.
    ///
    /// Name and version become the `<name>@<version>` storage directory,
    /// so each must be a single path segment without `@`.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (field, value) in [("name", &self.name), ("version", &self.version)] {
            if !is_path_segment(value) || value.contains('@') {
                bail!("Template {} '{}' is not a valid directory name", field, value);
            }
        }
        for file in self.files.iter().chain(self.upgrade_files.iter()) {
            check_relative(file)?;
            if file == MANIFEST_FILE {
                bail!("Template files may not include {}", MANIFEST_FILE);
            }
        }
        for file in &self.upgrade_files {
            if !self.files.contains(file) {
                bail!("Upgrade file '{}' is not listed in files", file);
            }
        }
        Ok(())
    }
}

/// Ensure `path` is relative and stays below its base directory.
pub fn check_relative(path: &str) -> anyhow::Result<()> {
    if path.is_empty() {
        bail!("Empty file path in template manifest");
    }
    let parsed = Path::new(path);
    let escapes = parsed
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        bail!("File path '{}' must be relative and may not contain '..'", path);
    }
    Ok(())
}
