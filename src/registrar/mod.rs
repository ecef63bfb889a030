//! Registrars: how depots are reached.
//!
//! A registrar knows how to read files relative to a depot's location.
//! Everything a depot offers is described by files at fixed paths:
//!
//! - `index.yml` lists every template with its manifest inline
//! - `<name>/<version>/template.yml` is the manifest of one template
//! - `<name>/<version>/<file>` are the template files themselves
//!
//! Listing and downloading are implemented once on top of
//! [`Registrar::fetch`], so HTTP and directory depots behave identically.

pub mod directory;
pub mod download;
pub mod http;

pub use directory::DirectoryRegistrar;
pub use download::download;
pub use http::HttpRegistrar;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::catalog::{Identifier, TemplateKind, TemplateManifest, MANIFEST_FILE};
use crate::depot::{Depot, RegistrarKind};

/// File name of a depot's listing.
pub const INDEX_FILE: &str = "index.yml";

/// A depot's listing document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepotIndex {
    /// Every template the depot offers.
    #[serde(default)]
    pub templates: Vec<TemplateManifest>,
}

/// Access to the files of a depot.
pub trait Registrar: Send + Sync {
    /// Which registrar kind this is.
    fn kind(&self) -> RegistrarKind;

    /// Read a file at `path`, relative to the depot location.
    fn fetch(&self, depot: &Depot, path: &str) -> Result<Vec<u8>>;

    /// Templates of the given kinds offered by `depot`.
    fn list(&self, depot: &Depot, kinds: &[TemplateKind]) -> Result<Vec<TemplateManifest>> {
        let bytes = self.fetch(depot, INDEX_FILE)?;
        let content = String::from_utf8(bytes)
            .with_context(|| format!("Listing of depot '{}' is not UTF-8", depot.name))?;
        let index: DepotIndex = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid listing for depot '{}'", depot.name))?;

        let mut templates = Vec::with_capacity(index.templates.len());
        for manifest in index.templates {
            if !kinds.contains(&manifest.identifier().kind()) {
                continue;
            }
            match manifest.validate() {
                Ok(()) => templates.push(manifest),
                Err(e) => tracing::warn!(
                    "Ignoring {} from depot '{}': {}",
                    manifest.identifier(),
                    depot.name,
                    e
                ),
            }
        }
        Ok(templates)
    }

    /// The manifest of one template, read without consulting the listing.
    fn manifest(&self, depot: &Depot, identifier: &Identifier) -> Result<TemplateManifest> {
        let path = template_path(identifier, MANIFEST_FILE);
        let bytes = self.fetch(depot, &path)?;
        let content = String::from_utf8(bytes)
            .with_context(|| format!("{} from depot '{}' is not UTF-8", path, depot.name))?;
        let manifest = TemplateManifest::parse(&content)
            .with_context(|| format!("Invalid manifest {} from depot '{}'", path, depot.name))?;

        if manifest.identifier() != *identifier {
            anyhow::bail!(
                "Manifest {} from depot '{}' describes {}",
                path,
                depot.name,
                manifest.identifier()
            );
        }
        Ok(manifest)
    }
}

/// Path of a template file relative to a depot location.
pub fn template_path(identifier: &Identifier, file: &str) -> String {
    format!("{}/{}/{}", identifier.name, identifier.version, file)
}

/// One registrar per kind, dispatched on a depot's registrar.
pub struct Registrars {
    http: HttpRegistrar,
    directory: DirectoryRegistrar,
}

impl Registrars {
    /// Registrars with the given HTTP timeout.
    pub fn new(http_timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: HttpRegistrar::with_timeout(http_timeout)?,
            directory: DirectoryRegistrar,
        })
    }

    /// The registrar that reaches `depot`.
    pub fn for_depot(&self, depot: &Depot) -> &dyn Registrar {
        match depot.registrar {
            RegistrarKind::Http => &self.http,
            RegistrarKind::Directory => &self.directory,
        }
    }
}
