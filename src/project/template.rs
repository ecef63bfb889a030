//! Turning a directory into a publishable template.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{Identifier, TemplateManifest, MANIFEST_FILE};
use crate::error::Result;
use crate::project::file::PROJECT_FILE;

/// Write a `template.yml` into `dir` describing every file beneath it.
///
/// Hidden entries, the manifest itself and the project marker are left
/// out. Each file gets a SHA-256 checksum so the directory can be served
/// as a depot entry as-is. Returns the manifest path.
pub fn create_template(dir: &Path, name: &str, version: &str, depot: &str) -> Result<PathBuf> {
    let identifier = Identifier::new(name, version);
    let mut manifest = TemplateManifest::new(&identifier);
    manifest.depot = Some(depot.to_string());

    let mut files = Vec::new();
    collect_files(dir, dir, &mut files)?;
    files.sort();

    for file in files {
        let bytes = fs::read(dir.join(&file))?;
        manifest
            .checksums
            .insert(file.clone(), hex::encode(Sha256::digest(&bytes)));
        manifest.files.push(file);
    }

    manifest.validate()?;
    let path = dir.join(MANIFEST_FILE);
    manifest.save(&path)?;
    tracing::debug!("Wrote {} with {} files", path.display(), manifest.files.len());
    Ok(path)
}

fn collect_files(root: &Path, dir: &Path, files: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(root, &path, files)?;
        } else if file_type.is_file() {
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if relative != MANIFEST_FILE && relative != PROJECT_FILE {
                files.push(relative);
            }
        }
    }
    Ok(())
}
