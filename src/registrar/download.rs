//! Template downloads.
//!
//! Files are staged in a hidden sibling directory, verified against the
//! checksums the depot advertises, and moved into place only after the
//! local manifest has been written. An interrupted or rejected download
//! never shows up in the local catalog.

use anyhow::Context;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use super::{template_path, Registrar};
use crate::catalog::manifest::check_relative;
use crate::catalog::{InstalledTemplate, TemplateManifest, TemplateStore, MANIFEST_FILE};
use crate::depot::Depot;
use crate::error::{ConductorError, Result};

/// Download the template described by `manifest` from `depot` into `store`.
///
/// An existing local copy of the same template is replaced.
pub fn download(
    registrar: &dyn Registrar,
    store: &TemplateStore,
    depot: &Depot,
    manifest: &TemplateManifest,
) -> Result<InstalledTemplate> {
    manifest.validate()?;
    let identifier = manifest.identifier();
    let staging = store.staging_dir(&depot.name, &identifier);

    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    let staged = stage(registrar, depot, manifest, &staging);
    if let Err(e) = staged {
        if let Err(cleanup) = fs::remove_dir_all(&staging) {
            tracing::warn!("Failed to clean up {}: {}", staging.display(), cleanup);
        }
        return Err(e);
    }

    let target = store.template_dir(&depot.name, &identifier);
    if target.exists() {
        fs::remove_dir_all(&target)?;
    }
    fs::rename(&staging, &target)?;

    tracing::debug!("Installed {} from {} at {}", identifier, depot.name, target.display());
    store
        .load(&depot.name, &identifier)?
        .ok_or_else(|| anyhow::anyhow!("{} vanished after download", target.display()).into())
}

fn stage(
    registrar: &dyn Registrar,
    depot: &Depot,
    manifest: &TemplateManifest,
    staging: &Path,
) -> Result<()> {
    let identifier = manifest.identifier();

    for file in &manifest.files {
        check_relative(file)?;
        let bytes = registrar
            .fetch(depot, &template_path(&identifier, file))
            .with_context(|| format!("Failed to download {} of {}", file, identifier))?;

        if let Some(expected) = manifest.checksums.get(file) {
            let actual = hex::encode(Sha256::digest(&bytes));
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(ConductorError::ChecksumMismatch {
                    file: file.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let dest = staging.join(file);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &bytes)?;
    }

    let mut local = manifest.clone();
    local.depot = Some(depot.name.clone());
    local.downloaded_at = Some(Utc::now());
    local.save(&staging.join(MANIFEST_FILE))
}
