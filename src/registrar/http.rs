//! HTTP depots.
//!
//! The depot location is a base URL; files are fetched with plain GET
//! requests below it.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

use super::Registrar;
use crate::depot::{Depot, RegistrarKind};

/// Reaches depots served over HTTP/HTTPS.
pub struct HttpRegistrar {
    client: Client,
    timeout: Duration,
}

impl HttpRegistrar {
    /// Create a registrar with the default 30-second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a registrar with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("conductor/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, timeout })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL of `path` within `depot`.
    pub fn url(depot: &Depot, path: &str) -> String {
        format!("{}/{}", depot.location.trim_end_matches('/'), path)
    }
}

impl Registrar for HttpRegistrar {
    fn kind(&self) -> RegistrarKind {
        RegistrarKind::Http
    }

    fn fetch(&self, depot: &Depot, path: &str) -> Result<Vec<u8>> {
        let url = Self::url(depot, path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), url);
        }

        let bytes = response
            .bytes()
            .with_context(|| format!("Failed to read response from {}", url))?;
        Ok(bytes.to_vec())
    }
}
