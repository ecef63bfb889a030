//! Template catalogs.
//!
//! A catalog is a read-only snapshot mapping each template [`Identifier`]
//! to the depots offering it. Two sources build one:
//!
//! - [`build_local`] scans templates that have already been downloaded
//! - [`build_federated`] queries every registered depot's listing and
//!   merges in local storage
//!
//! Snapshots are rebuilt for every command.

pub mod federated;
pub mod identifier;
pub mod local;
pub mod manifest;
pub mod snapshot;
pub mod store;
pub mod version;

pub use federated::build_federated;
pub use identifier::{is_path_segment, Identifier, TemplateKind};
pub use local::build_local;
pub use manifest::{TemplateManifest, MANIFEST_FILE};
pub use snapshot::{Catalog, TemplateDescriptor};
pub use store::{InstalledTemplate, TemplateStore};
pub use version::compare_versions;
