//! Template resolution.
//!
//! Turns a user's `(name, version, depot)` request into exactly one
//! template offered by exactly one depot:
//!
//! - [`request`] normalizes raw arguments into tagged selectors
//! - [`engine`] narrows a catalog snapshot to a selection, an error, or
//!   an ambiguity the caller must settle
//! - [`prompter`] settles an ambiguity by asking the user
//!
//! # Example
//!
//! ```
//! use conductor::catalog::{Catalog, Identifier, TemplateDescriptor};
//! use conductor::depot::{Depot, DepotRegistry, RegistrarKind};
//! use conductor::resolution::{resolve, Mode, RawRequest, Resolution};
//!
//! let mainline = Depot::mainline(RegistrarKind::Http, "https://example.org");
//! let alt = Depot::new("alt", RegistrarKind::Directory, "/srv/alt");
//! let registry = DepotRegistry::new(Some(mainline.clone()), vec![alt.clone()]);
//!
//! let catalog: Catalog = vec![
//!     TemplateDescriptor::online(Identifier::new("kernel", "1.0.0"), mainline),
//!     TemplateDescriptor::online(Identifier::new("kernel", "1.0.0"), alt),
//! ]
//! .into_iter()
//! .collect();
//!
//! let request = RawRequest::new("kernel", "latest", "auto").normalize();
//! let Resolution::Resolved(selection) =
//!     resolve(&request, &catalog, &registry, Mode::Federated).unwrap()
//! else {
//!     panic!("kernels shared with mainline resolve to mainline");
//! };
//! assert_eq!(selection.depot_name(), "mainline");
//! ```

pub mod engine;
pub mod prompter;
pub mod request;

pub use engine::{
    resolve, AmbiguousChoice, DepotOption, LatestScope, Mode, Resolution, ResolutionError,
    ResolvedSelection, Resolver,
};
pub use prompter::{choose_depot, DEPOT_PROMPT_KEY};
pub use request::{normalize, DepotSelector, RawRequest, Request, VersionSelector};
