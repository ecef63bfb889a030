//! Catalog snapshots.
//!
//! A [`Catalog`] maps each [`Identifier`] to the descriptors of the depots
//! offering it. Snapshots are built fresh for every command and are
//! read-only once handed to the resolver.

use serde::Serialize;
use std::collections::BTreeMap;

use super::identifier::Identifier;
use crate::depot::Depot;

/// One depot's offering of one template.
///
/// A descriptor is always online, offline, or both; the constructors make
/// a descriptor with neither flag unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    identifier: Identifier,
    depot: Depot,
    online: bool,
    offline: bool,
}

impl TemplateDescriptor {
    /// A template discovered through the depot's listing.
    pub fn online(identifier: Identifier, depot: Depot) -> Self {
        Self {
            identifier,
            depot,
            online: true,
            offline: false,
        }
    }

    /// A template already present in local storage.
    pub fn offline(identifier: Identifier, depot: Depot) -> Self {
        Self {
            identifier,
            depot,
            online: false,
            offline: true,
        }
    }

    /// The template this descriptor offers.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The depot offering the template.
    pub fn depot(&self) -> &Depot {
        &self.depot
    }

    /// Shorthand for the depot name.
    pub fn depot_name(&self) -> &str {
        &self.depot.name
    }

    /// Discoverable via the depot's listing.
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Present in local storage.
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    fn absorb(&mut self, other: &TemplateDescriptor) {
        self.online |= other.online;
        self.offline |= other.offline;
    }
}

/// Identifiers mapped to the depots offering them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<Identifier, Vec<TemplateDescriptor>>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor.
    ///
    /// A depot appears at most once per identifier: a second descriptor
    /// for the same pair is merged into the first (online/offline flags
    /// are OR-ed together). Depots keep their insertion order.
    pub fn insert(&mut self, descriptor: TemplateDescriptor) {
        let offers = self
            .entries
            .entry(descriptor.identifier.clone())
            .or_default();

        match offers
            .iter_mut()
            .find(|d| d.depot.name == descriptor.depot.name)
        {
            Some(existing) => existing.absorb(&descriptor),
            None => offers.push(descriptor),
        }
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptors offering `identifier`.
    pub fn get(&self, identifier: &Identifier) -> Option<&[TemplateDescriptor]> {
        self.entries.get(identifier).map(|v| v.as_slice())
    }

    /// Iterate identifiers with their offering descriptors.
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &[TemplateDescriptor])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Iterate every descriptor.
    pub fn descriptors(&self) -> impl Iterator<Item = &TemplateDescriptor> {
        self.entries.values().flatten()
    }
}

impl FromIterator<TemplateDescriptor> for Catalog {
    fn from_iter<T: IntoIterator<Item = TemplateDescriptor>>(iter: T) -> Self {
        let mut catalog = Catalog::new();
        for descriptor in iter {
            catalog.insert(descriptor);
        }
        catalog
    }
}
