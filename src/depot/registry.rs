//! The ordered collection of registered depots.
//!
//! User depots are persisted in `<home>/depots.yml` in registration
//! order. The default-priority depot is never written to disk; it is
//! supplied by settings on every load and always listed first.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::model::{Depot, MAINLINE_DEPOT};
use crate::catalog::is_path_segment;
use crate::error::{ConductorError, Result};

/// File name of the persisted registry, relative to the conductor home.
pub const REGISTRY_FILE: &str = "depots.yml";

/// Rejections raised by registry mutations and lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The built-in depot cannot be removed or replaced.
    #[error("Cannot remove or replace the built-in depot '{name}'")]
    ProtectedDepot { name: String },

    /// A depot with this name already exists.
    #[error("A depot named '{name}' is already registered")]
    DuplicateDepot { name: String },

    /// No depot with this name exists.
    #[error("No depot named '{name}' is registered")]
    UnknownDepot { name: String },

    /// The name cannot be used as a depot name.
    #[error("Invalid depot name '{name}': names must be a single path segment other than '.' or '..'")]
    InvalidName { name: String },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    depots: Vec<Depot>,
}

/// Registered depots in registry order.
#[derive(Debug, Clone)]
pub struct DepotRegistry {
    path: Option<PathBuf>,
    default_depot: Option<Depot>,
    depots: Vec<Depot>,
}

impl DepotRegistry {
    /// Build a registry from a default-priority depot and user depots.
    ///
    /// Later duplicates of a name are dropped.
    pub fn new(default_depot: Option<Depot>, depots: Vec<Depot>) -> Self {
        let mut registry = Self {
            path: None,
            default_depot,
            depots: Vec::with_capacity(depots.len()),
        };

        for depot in depots {
            if registry.get(&depot.name).is_some() {
                tracing::warn!("Ignoring duplicate depot entry '{}'", depot.name);
                continue;
            }
            registry.depots.push(depot);
        }

        registry
    }

    /// Registry without a default-priority depot and without persistence.
    pub fn in_memory(depots: Vec<Depot>) -> Self {
        Self::new(None, depots)
    }

    /// Load the registry persisted under `home`.
    pub fn load(home: &Path, mainline: Depot) -> Result<Self> {
        let path = home.join(REGISTRY_FILE);

        let file = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_yaml::from_str::<RegistryFile>(&content).map_err(|e| {
                ConductorError::ConfigParseError {
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?
        } else {
            RegistryFile::default()
        };

        let mut registry = Self::new(Some(mainline), file.depots);
        registry.path = Some(path);
        Ok(registry)
    }

    /// Persist user depots using a write-then-rename.
    ///
    /// In-memory registries have nowhere to write and succeed trivially.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = RegistryFile {
            depots: self.depots.clone(),
        };
        let content =
            serde_yaml::to_string(&file).map_err(|e| ConductorError::ConfigParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;

        let temp_path = path.with_extension("yml.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// All depots in registry order, default-priority depot first.
    pub fn list(&self) -> Vec<&Depot> {
        self.default_depot.iter().chain(self.depots.iter()).collect()
    }

    /// Number of registered depots, including the default.
    pub fn len(&self) -> usize {
        self.depots.len() + usize::from(self.default_depot.is_some())
    }

    /// Whether no depot at all is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a depot by name.
    pub fn get(&self, name: &str) -> Option<&Depot> {
        self.list().into_iter().find(|d| d.name == name)
    }

    /// Look up a depot by name, failing when it is not registered.
    pub fn find(&self, name: &str) -> std::result::Result<&Depot, RegistryError> {
        self.get(name).ok_or_else(|| RegistryError::UnknownDepot {
            name: name.to_string(),
        })
    }

    /// The default-priority depot, if one is configured.
    pub fn default_depot(&self) -> Option<&Depot> {
        self.default_depot.as_ref()
    }

    /// Whether `name` is the default-priority depot.
    pub fn is_default(&self, name: &str) -> bool {
        self.default_depot.as_ref().is_some_and(|d| d.name == name)
    }

    /// Position of a depot in registry order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.list().iter().position(|d| d.name == name)
    }

    /// Depots whose names match any of `filters`; all depots when empty.
    pub fn matching(&self, filters: &[Regex]) -> Vec<&Depot> {
        self.list()
            .into_iter()
            .filter(|d| filters.is_empty() || filters.iter().any(|f| f.is_match(&d.name)))
            .collect()
    }

    /// Register a new depot at the end of registry order.
    pub fn add(&mut self, depot: Depot) -> std::result::Result<(), RegistryError> {
        if self.is_protected(&depot.name) {
            return Err(RegistryError::ProtectedDepot { name: depot.name });
        }
        if !is_path_segment(&depot.name) {
            return Err(RegistryError::InvalidName { name: depot.name });
        }
        if self.get(&depot.name).is_some() {
            return Err(RegistryError::DuplicateDepot { name: depot.name });
        }

        self.depots.push(depot);
        Ok(())
    }

    /// Swap the depot registered under the same name for `depot`, keeping
    /// its place in registry order. Returns the previous entry.
    pub fn replace(&mut self, depot: Depot) -> std::result::Result<Depot, RegistryError> {
        if self.is_protected(&depot.name) {
            return Err(RegistryError::ProtectedDepot { name: depot.name });
        }
        let slot = self
            .depots
            .iter_mut()
            .find(|d| d.name == depot.name)
            .ok_or_else(|| RegistryError::UnknownDepot {
                name: depot.name.clone(),
            })?;
        Ok(std::mem::replace(slot, depot))
    }

    /// Unregister a depot, returning its description.
    pub fn remove(&mut self, name: &str) -> std::result::Result<Depot, RegistryError> {
        if self.is_protected(name) {
            return Err(RegistryError::ProtectedDepot {
                name: name.to_string(),
            });
        }

        let index = self
            .depots
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| RegistryError::UnknownDepot {
                name: name.to_string(),
            })?;

        Ok(self.depots.remove(index))
    }

    /// Whether `name` is the built-in depot.
    pub fn is_protected(&self, name: &str) -> bool {
        name == MAINLINE_DEPOT || self.is_default(name)
    }
}
