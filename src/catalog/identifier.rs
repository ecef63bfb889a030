//! Template identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

/// Kinds of templates a depot can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// The primary artifact a project is created from.
    Kernel,
    /// Add-on templates layered onto a project.
    Library,
}

impl TemplateKind {
    /// Template name that denotes the primary artifact.
    pub const KERNEL_NAME: &'static str = "kernel";

    /// Kind of the template called `name`.
    pub fn of(name: &str) -> Self {
        if name == Self::KERNEL_NAME {
            TemplateKind::Kernel
        } else {
            TemplateKind::Library
        }
    }

    /// Every kind.
    pub fn all() -> Vec<TemplateKind> {
        vec![TemplateKind::Kernel, TemplateKind::Library]
    }

    /// Plural label used in listings.
    pub fn plural(&self) -> &'static str {
        match self {
            TemplateKind::Kernel => "kernels",
            TemplateKind::Library => "libraries",
        }
    }
}

/// The `(name, version)` key of a template.
///
/// Equality is exact on both strings. The derived ordering only keeps map
/// iteration deterministic; version precedence lives in
/// [`compare_versions`](super::version::compare_versions).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    /// Template name.
    pub name: String,
    /// Version string as published by the depot.
    pub version: String,
}

impl Identifier {
    /// Create an identifier.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Kind of template this identifier names.
    pub fn kind(&self) -> TemplateKind {
        TemplateKind::of(&self.name)
    }

    /// Directory name used for this template in local storage.
    pub fn dir_name(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// Whether `value` names exactly one directory entry, so joining it onto
/// a storage path can never leave that path.
pub fn is_path_segment(value: &str) -> bool {
    if value.trim().is_empty() || value.contains(['/', '\\']) {
        return false;
    }
    let components: Vec<Component> = Path::new(value).components().collect();
    matches!(components.as_slice(), [Component::Normal(_)])
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
