//! Directory depots: the location is a path on the local filesystem.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::Registrar;
use crate::catalog::manifest::check_relative;
use crate::depot::{Depot, RegistrarKind};

/// Reaches depots laid out on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryRegistrar;

impl DirectoryRegistrar {
    /// Filesystem path of `path` within `depot`.
    pub fn resolve(depot: &Depot, path: &str) -> Result<PathBuf> {
        check_relative(path)?;
        Ok(PathBuf::from(&depot.location).join(path))
    }
}

impl Registrar for DirectoryRegistrar {
    fn kind(&self) -> RegistrarKind {
        RegistrarKind::Directory
    }

    fn fetch(&self, depot: &Depot, path: &str) -> Result<Vec<u8>> {
        let full = Self::resolve(depot, path)?;
        tracing::debug!("Reading {}", full.display());
        fs::read(&full).with_context(|| format!("Failed to read {}", full.display()))
    }
}
