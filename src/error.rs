//! Error types for conductor operations.
//!
//! This module defines [`ConductorError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Resolution failures live in [`ResolutionError`] and registry
//!   rejections in [`RegistryError`]; both convert into `ConductorError`
//! - Transport and filesystem plumbing uses `anyhow::Error` (via
//!   `ConductorError::Other`) with context attached at the call site
//! - Every message names the field the user has to change

use std::path::PathBuf;
use thiserror::Error;

use crate::depot::RegistryError;
use crate::resolution::ResolutionError;

/// Core error type for conductor operations.
#[derive(Debug, Error)]
pub enum ConductorError {
    /// A request could not be narrowed to a single template.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The depot registry rejected an operation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Every queried depot failed to produce a listing.
    #[error("Could not fetch a template listing from any depot ({})", failed.join(", "))]
    CatalogUnavailable { failed: Vec<String> },

    /// Failed to parse a settings, registry or manifest file.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// `new` was pointed at a directory that already holds a project.
    #[error("A project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// `upgrade` was pointed at a directory without a project.
    #[error("No project found at {path}. Use `conductor new` to create one")]
    ProjectNotFound { path: PathBuf },

    /// A downloaded file did not match the checksum its depot advertised.
    #[error("Checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    /// A value was needed but the session cannot prompt for it.
    #[error("Cannot ask for {what} in non-interactive mode")]
    NonInteractive { what: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for conductor operations.
pub type Result<T> = std::result::Result<T, ConductorError>;
