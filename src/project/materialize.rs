//! Creating and upgrading projects from installed templates.

use anyhow::Context;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use super::file::{KernelRecord, ProjectFile};
use crate::catalog::manifest::check_relative;
use crate::catalog::InstalledTemplate;
use crate::error::{ConductorError, Result};

/// Create a new project at `dest` from `template`.
///
/// Relative destinations are resolved against the current directory.
/// Returns the absolute project path.
pub fn create_project(template: &InstalledTemplate, dest: &Path) -> Result<PathBuf> {
    let dest = std::path::absolute(dest)?;
    if ProjectFile::exists(&dest) {
        return Err(ConductorError::ProjectExists { path: dest });
    }

    fs::create_dir_all(&dest)?;
    let copied = copy_files(template, &template.manifest.files, &dest)?;
    ProjectFile::new(KernelRecord::of(template)).save(&dest)?;

    tracing::debug!(
        "Created project at {} from {} ({} files)",
        dest.display(),
        template.identifier(),
        copied
    );
    Ok(dest)
}

/// Upgrade the project at `dest` to `template`.
///
/// Only the template's upgrade files are copied; everything else in the
/// project is left alone. Returns the absolute project path.
pub fn upgrade_project(template: &InstalledTemplate, dest: &Path) -> Result<PathBuf> {
    let dest = std::path::absolute(dest)?;
    let mut project = ProjectFile::load(&dest)?;

    let copied = copy_files(template, template.manifest.effective_upgrade_files(), &dest)?;

    let previous = project.kernel.identifier();
    project.kernel = KernelRecord::of(template);
    project.upgraded_at = Some(Utc::now());
    project.save(&dest)?;

    tracing::debug!(
        "Upgraded project at {} from {} to {} ({} files)",
        dest.display(),
        previous,
        template.identifier(),
        copied
    );
    Ok(dest)
}

fn copy_files(template: &InstalledTemplate, files: &[String], dest: &Path) -> Result<usize> {
    for file in files {
        check_relative(file)?;
        let source = template.file_path(file);
        let target = dest.join(file);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, &target)
            .with_context(|| format!("Failed to copy {} into {}", file, dest.display()))?;
    }
    Ok(files.len())
}
