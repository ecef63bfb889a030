//! User settings stored in `<home>/config.yml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::depot::{Depot, RegistrarKind};
use crate::error::{ConductorError, Result};
use crate::resolution::LatestScope;

/// File name of the settings file, relative to the conductor home.
pub const SETTINGS_FILE: &str = "config.yml";

/// Environment variable overriding the conductor home.
pub const HOME_ENV: &str = "CONDUCTOR_HOME";

/// Settings that apply to every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Location of the built-in mainline depot.
    #[serde(default = "default_mainline_location")]
    pub mainline_location: String,

    /// Registrar used to reach the mainline depot.
    #[serde(default = "default_mainline_registrar")]
    pub mainline_registrar: RegistrarKind,

    /// Per-request timeout for HTTP depots, in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Whether `latest` is resolved across all depots or within a named one.
    pub latest_scope: LatestScope,
}

fn default_mainline_location() -> String {
    "https://depot.conductor.dev/mainline".to_string()
}

fn default_mainline_registrar() -> RegistrarKind {
    RegistrarKind::Http
}

fn default_http_timeout() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mainline_location: default_mainline_location(),
            mainline_registrar: default_mainline_registrar(),
            http_timeout_secs: default_http_timeout(),
            latest_scope: LatestScope::default(),
        }
    }
}

impl Settings {
    /// Load `<home>/config.yml`, falling back to defaults when it is absent.
    pub fn load(home: &Path) -> Result<Self> {
        let path = home.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ConductorError::ConfigParseError {
            path,
            message: e.to_string(),
        })
    }

    /// The built-in mainline depot these settings describe.
    pub fn mainline(&self) -> Depot {
        Depot::mainline(self.mainline_registrar, self.mainline_location.clone())
    }

    /// HTTP request timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// The conductor home used when neither `--home` nor `CONDUCTOR_HOME`
/// is given: `~/.conductor`.
pub fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".conductor")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depot::MAINLINE_DEPOT;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(temp.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.http_timeout(), Duration::from_secs(30));
        assert_eq!(settings.latest_scope, LatestScope::Global);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(SETTINGS_FILE),
            "mainline_location: /srv/mainline\nmainline_registrar: directory\nlatest_scope: depot\n",
        )
        .unwrap();

        let settings = Settings::load(temp.path()).unwrap();
        assert_eq!(settings.mainline_location, "/srv/mainline");
        assert_eq!(settings.mainline_registrar, RegistrarKind::Directory);
        assert_eq!(settings.latest_scope, LatestScope::Depot);
        assert_eq!(settings.http_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(SETTINGS_FILE), "http_timeout_secs: soon\n").unwrap();

        let err = Settings::load(temp.path()).unwrap_err();
        assert!(matches!(err, ConductorError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.yml"));
    }

    #[test]
    fn mainline_depot_uses_settings() {
        let settings = Settings {
            mainline_location: "/srv/mainline".into(),
            mainline_registrar: RegistrarKind::Directory,
            ..Settings::default()
        };
        let depot = settings.mainline();
        assert_eq!(depot.name, MAINLINE_DEPOT);
        assert_eq!(depot.location, "/srv/mainline");
    }

    #[test]
    fn default_home_ends_with_dot_conductor() {
        assert!(default_home().ends_with(".conductor"));
    }
}
