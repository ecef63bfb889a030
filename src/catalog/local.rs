//! The local catalog: what has already been downloaded.

use super::identifier::TemplateKind;
use super::snapshot::{Catalog, TemplateDescriptor};
use super::store::TemplateStore;
use crate::depot::{Depot, DepotRegistry};
use crate::error::Result;

/// Build a catalog of every installed template of the given kinds.
///
/// Storage left behind by depots that are no longer registered is ignored.
pub fn build_local(
    store: &TemplateStore,
    registry: &DepotRegistry,
    kinds: &[TemplateKind],
) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    add_installed(&mut catalog, store, &registry.list(), kinds)?;
    tracing::debug!("Local catalog has {} templates", catalog.len());
    Ok(catalog)
}

/// Add offline descriptors for the templates installed from `depots`.
pub(crate) fn add_installed(
    catalog: &mut Catalog,
    store: &TemplateStore,
    depots: &[&Depot],
    kinds: &[TemplateKind],
) -> Result<()> {
    for depot in depots {
        for template in store.installed(&depot.name)? {
            let identifier = template.identifier();
            if kinds.contains(&identifier.kind()) {
                catalog.insert(TemplateDescriptor::offline(identifier, (*depot).clone()));
            }
        }
    }
    Ok(())
}
