//! Template requests.
//!
//! Users type requests as three strings, where `latest` and `auto` are
//! wildcards. [`normalize`] collapses the historical aliases and turns the
//! wildcards into tagged selectors, so the engine never compares against
//! magic strings.

use std::fmt;

use crate::catalog::TemplateKind;

const LATEST: &str = "latest";
const AUTO: &str = "auto";

/// Which version of a template is wanted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionSelector {
    /// The highest version available.
    Latest,
    /// Exactly this version string.
    Exact(String),
}

impl VersionSelector {
    /// The exact version, if one was given.
    pub fn exact(&self) -> Option<&str> {
        match self {
            VersionSelector::Latest => None,
            VersionSelector::Exact(v) => Some(v),
        }
    }
}

impl From<&str> for VersionSelector {
    fn from(s: &str) -> Self {
        if s == LATEST {
            VersionSelector::Latest
        } else {
            VersionSelector::Exact(s.to_string())
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Latest => f.write_str(LATEST),
            VersionSelector::Exact(v) => f.write_str(v),
        }
    }
}

/// Which depot a template should come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DepotSelector {
    /// Let the engine pick.
    Auto,
    /// Only this depot.
    Named(String),
}

impl From<&str> for DepotSelector {
    fn from(s: &str) -> Self {
        if s == AUTO {
            DepotSelector::Auto
        } else {
            DepotSelector::Named(s.to_string())
        }
    }
}

impl fmt::Display for DepotSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepotSelector::Auto => f.write_str(AUTO),
            DepotSelector::Named(n) => f.write_str(n),
        }
    }
}

/// A request exactly as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    pub name: String,
    pub version: String,
    pub depot: String,
}

impl RawRequest {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        depot: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            depot: depot.into(),
        }
    }

    /// Shorthand for [`normalize`].
    pub fn normalize(self) -> Request {
        normalize(self)
    }
}

/// A normalized request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    pub name: String,
    pub version: VersionSelector,
    pub depot: DepotSelector,
}

impl Request {
    pub fn new(name: impl Into<String>, version: VersionSelector, depot: DepotSelector) -> Self {
        Self {
            name: name.into(),
            version,
            depot,
        }
    }

    /// The same request pinned to a specific depot.
    pub fn with_depot(mut self, depot: impl Into<String>) -> Self {
        self.depot = DepotSelector::Named(depot.into());
        self
    }

    /// Kind of template being asked for.
    pub fn kind(&self) -> TemplateKind {
        TemplateKind::of(&self.name)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} from {}", self.name, self.version, self.depot)
    }
}

/// Canonicalize a raw request.
///
/// Any capitalisation of `kernel`, and the bare word `latest`, name the
/// kernel. `latest kernel` is accepted as an old argument order for
/// `kernel latest`.
pub fn normalize(raw: RawRequest) -> Request {
    let RawRequest {
        mut name,
        mut version,
        depot,
    } = raw;

    if name.eq_ignore_ascii_case(TemplateKind::KERNEL_NAME) {
        name = TemplateKind::KERNEL_NAME.to_string();
    } else if name == LATEST {
        name = TemplateKind::KERNEL_NAME.to_string();
        if version == TemplateKind::KERNEL_NAME {
            version = LATEST.to_string();
        }
    }

    Request {
        name,
        version: VersionSelector::from(version.as_str()),
        depot: DepotSelector::from(depot.as_str()),
    }
}
