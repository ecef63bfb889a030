//! The federated catalog: every registered depot's listing plus local
//! storage.

use regex::Regex;
use std::thread;

use super::identifier::TemplateKind;
use super::local::add_installed;
use super::snapshot::{Catalog, TemplateDescriptor};
use super::store::TemplateStore;
use crate::depot::{Depot, DepotRegistry};
use crate::error::{ConductorError, Result};
use crate::registrar::Registrars;

/// Build a catalog from the listings of every depot matching
/// `depot_filter` (all depots when empty), merged with local storage.
///
/// Depots are queried in parallel. A depot whose listing fails is logged
/// and contributes nothing; if every queried depot fails the build fails
/// with [`ConductorError::CatalogUnavailable`].
pub fn build_federated(
    store: &TemplateStore,
    registry: &DepotRegistry,
    registrars: &Registrars,
    kinds: &[TemplateKind],
    depot_filter: &[Regex],
) -> Result<Catalog> {
    let depots = registry.matching(depot_filter);
    let mut catalog = Catalog::new();

    if depots.is_empty() {
        tracing::debug!("No depots match the filter");
        return Ok(catalog);
    }

    let listings: Vec<(&Depot, anyhow::Result<_>)> = thread::scope(|scope| {
        let handles: Vec<_> = depots
            .iter()
            .map(|&depot| {
                let registrar = registrars.for_depot(depot);
                (depot, scope.spawn(move || registrar.list(depot, kinds)))
            })
            .collect();

        handles
            .into_iter()
            .map(|(depot, handle)| {
                let listed = handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("listing thread panicked")));
                (depot, listed)
            })
            .collect()
    });

    let mut failed = Vec::new();
    for (depot, listed) in listings {
        match listed {
            Ok(manifests) => {
                tracing::debug!("Depot '{}' lists {} templates", depot.name, manifests.len());
                for manifest in manifests {
                    catalog.insert(TemplateDescriptor::online(manifest.identifier(), depot.clone()));
                }
            }
            Err(e) => {
                tracing::warn!("Could not list templates from depot '{}': {:#}", depot.name, e);
                failed.push(depot.name.clone());
            }
        }
    }

    if failed.len() == depots.len() {
        return Err(ConductorError::CatalogUnavailable { failed });
    }

    add_installed(&mut catalog, store, &depots, kinds)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::install;
    use crate::catalog::Identifier;
    use crate::registrar::tests::{directory_depot, publish};
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        home: TempDir,
        alt: TempDir,
        beta: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                home: TempDir::new().unwrap(),
                alt: TempDir::new().unwrap(),
                beta: TempDir::new().unwrap(),
            }
        }

        fn store(&self) -> TemplateStore {
            TemplateStore::new(self.home.path().join("templates"))
        }

        fn registry(&self) -> DepotRegistry {
            DepotRegistry::in_memory(vec![
                directory_depot("alt", self.alt.path()),
                directory_depot("beta", self.beta.path()),
            ])
        }
    }

    fn registrars() -> Registrars {
        Registrars::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn merges_listings_from_all_depots() {
        let fx = Fixture::new();
        publish(fx.alt.path(), "kernel", "1.0.0", &[("main.c", "a")]);
        publish(fx.beta.path(), "kernel", "1.0.0", &[("main.c", "a")]);
        publish(fx.beta.path(), "okapilib", "3.0.0", &[("okapi.h", "b")]);

        let catalog = build_federated(
            &fx.store(),
            &fx.registry(),
            &registrars(),
            &TemplateKind::all(),
            &[],
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        let offers = catalog.get(&Identifier::new("kernel", "1.0.0")).unwrap();
        let names: Vec<_> = offers.iter().map(|d| d.depot_name()).collect();
        assert_eq!(names, vec!["alt", "beta"]);
        assert!(offers.iter().all(|d| d.is_online()));
    }

    #[test]
    fn local_copies_are_marked_offline() {
        let fx = Fixture::new();
        publish(fx.alt.path(), "kernel", "1.0.0", &[("main.c", "a")]);
        publish(fx.beta.path(), "kernel", "2.0.0", &[("main.c", "a")]);
        let store = fx.store();
        install(&store, "alt", "kernel", "1.0.0");
        install(&store, "alt", "kernel", "0.9.0");

        let catalog = build_federated(
            &store,
            &fx.registry(),
            &registrars(),
            &TemplateKind::all(),
            &[],
        )
        .unwrap();

        let both = &catalog.get(&Identifier::new("kernel", "1.0.0")).unwrap()[0];
        assert!(both.is_online() && both.is_offline());

        let local_only = &catalog.get(&Identifier::new("kernel", "0.9.0")).unwrap()[0];
        assert!(local_only.is_offline() && !local_only.is_online());
    }

    #[test]
    fn failed_depot_contributes_nothing() {
        let fx = Fixture::new();
        publish(fx.alt.path(), "kernel", "1.0.0", &[("main.c", "a")]);

        let catalog = build_federated(
            &fx.store(),
            &fx.registry(),
            &registrars(),
            &TemplateKind::all(),
            &[],
        )
        .unwrap();

        let offers = catalog.get(&Identifier::new("kernel", "1.0.0")).unwrap();
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].depot_name(), "alt");
    }

    #[test]
    fn every_depot_failing_is_an_error() {
        let fx = Fixture::new();

        let err = build_federated(
            &fx.store(),
            &fx.registry(),
            &registrars(),
            &TemplateKind::all(),
            &[],
        )
        .unwrap_err();

        match err {
            ConductorError::CatalogUnavailable { failed } => {
                assert_eq!(failed, vec!["alt", "beta"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn depot_filter_limits_queried_depots() {
        let fx = Fixture::new();
        publish(fx.beta.path(), "kernel", "1.0.0", &[("main.c", "a")]);
        let store = fx.store();
        install(&store, "alt", "kernel", "0.1.0");

        let filter = vec![Regex::new("^be").unwrap()];
        let catalog = build_federated(
            &store,
            &fx.registry(),
            &registrars(),
            &TemplateKind::all(),
            &filter,
        )
        .unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(&Identifier::new("kernel", "0.1.0")).is_none());
    }
}
