//! Depots and the depot registry.
//!
//! A depot is a named source of templates. The registry keeps depots in
//! a stable order with the built-in `mainline` depot first; `mainline` is
//! the default-priority depot and can be neither added nor removed.
//!
//! # Example
//!
//! ```
//! use conductor::depot::{Depot, DepotRegistry, RegistrarKind};
//!
//! let mut registry = DepotRegistry::in_memory(Vec::new());
//! registry
//!     .add(Depot::new("mirror", RegistrarKind::Directory, "/srv/templates"))
//!     .unwrap();
//! assert!(registry.find("mirror").is_ok());
//! ```

pub mod model;
pub mod registry;

pub use model::{Depot, RegistrarKind, MAINLINE_DEPOT};
pub use registry::{DepotRegistry, RegistryError};
