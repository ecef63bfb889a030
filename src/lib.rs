//! Conductor - resolve, download and materialize project templates.
//!
//! Conductor keeps a registry of depots, each offering versioned kernel
//! and library templates. A request such as `kernel latest auto` is
//! narrowed to exactly one template from exactly one depot, which is then
//! downloaded or turned into a project.
//!
//! # Modules
//!
//! - [`catalog`] - Template identity, manifests, local storage and catalog snapshots
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings and the conductor home
//! - [`depot`] - Depots and the depot registry
//! - [`error`] - Error types and result aliases
//! - [`project`] - Creating and upgrading projects
//! - [`registrar`] - Reaching depots over HTTP or the filesystem
//! - [`resolution`] - The template resolution engine
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use conductor::catalog::{Catalog, Identifier, TemplateDescriptor};
//! use conductor::depot::{Depot, DepotRegistry, RegistrarKind};
//! use conductor::resolution::{resolve, Mode, RawRequest};
//!
//! let mainline = Depot::mainline(RegistrarKind::Http, "https://example.org");
//! let registry = DepotRegistry::new(Some(mainline.clone()), Vec::new());
//! let catalog: Catalog = ["1.0.0", "1.2.0", "1.1.5"]
//!     .into_iter()
//!     .map(|v| TemplateDescriptor::online(Identifier::new("kernel", v), mainline.clone()))
//!     .collect();
//!
//! let request = RawRequest::new("kernel", "latest", "auto").normalize();
//! let selection = resolve(&request, &catalog, &registry, Mode::Federated)
//!     .unwrap()
//!     .resolved()
//!     .unwrap();
//! assert_eq!(selection.identifier().version, "1.2.0");
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod depot;
pub mod error;
pub mod project;
pub mod registrar;
pub mod resolution;
pub mod ui;

pub use error::{ConductorError, Result};
