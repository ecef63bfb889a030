//! Depot definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the built-in default-priority depot.
pub const MAINLINE_DEPOT: &str = "mainline";

/// How a depot's location is reached.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RegistrarKind {
    /// `location` is a base URL served over HTTP(S).
    Http,
    /// `location` is a directory on the local filesystem.
    Directory,
}

impl RegistrarKind {
    /// All registrar kinds, in display order.
    pub fn all() -> [RegistrarKind; 2] {
        [RegistrarKind::Http, RegistrarKind::Directory]
    }

    /// Lowercase name used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrarKind::Http => "http",
            RegistrarKind::Directory => "directory",
        }
    }
}

impl fmt::Display for RegistrarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "https" => Ok(Self::Http),
            "directory" | "dir" => Ok(Self::Directory),
            _ => Err(format!("unknown registrar: {}", s)),
        }
    }
}

/// A registered source of templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depot {
    /// Unique depot name.
    pub name: String,

    /// Registrar used to reach the depot.
    pub registrar: RegistrarKind,

    /// URL or path, interpreted by the registrar.
    pub location: String,

    /// When the depot was registered (absent for the built-in depot).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl Depot {
    /// Create a depot description.
    pub fn new(
        name: impl Into<String>,
        registrar: RegistrarKind,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            registrar,
            location: location.into(),
            added_at: None,
        }
    }

    /// The built-in mainline depot at the given location.
    pub fn mainline(registrar: RegistrarKind, location: impl Into<String>) -> Self {
        Self::new(MAINLINE_DEPOT, registrar, location)
    }

    /// Stamp the registration time.
    pub fn registered_now(mut self) -> Self {
        self.added_at = Some(Utc::now());
        self
    }
}

impl fmt::Display for Depot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}
