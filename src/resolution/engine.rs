//! The resolution engine.
//!
//! Narrows a [`Request`] against a [`Catalog`] in three stages: name,
//! version, depot. Each stage fails with its own [`ResolutionError`] so the
//! user learns exactly which field to change. When several depots offer
//! the chosen template and none can be preferred automatically, the
//! engine returns [`Resolution::Ambiguous`] instead of asking; prompting
//! is the caller's job.
//!
//! The engine performs no I/O and keeps no state between calls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::request::{DepotSelector, Request, VersionSelector};
use crate::catalog::{compare_versions, Catalog, Identifier, TemplateDescriptor, TemplateKind};
use crate::depot::DepotRegistry;

/// Where the catalog came from, which decides how ties are broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Downloaded templates only; never ambiguous.
    Local,
    /// Listings of every depot; ambiguity is reported to the caller.
    Federated,
}

/// How `latest` interacts with an explicitly named depot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatestScope {
    /// Highest version across every depot, then the depot filter.
    #[default]
    Global,
    /// Depot filter first, then the highest version that depot offers.
    Depot,
}

/// Ways a request can fail to match anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Nothing matches the name, or the name and version.
    #[error("{}", not_found_message(.name, .version))]
    NotFound {
        name: String,
        version: Option<String>,
    },

    /// The named depot does not offer the template.
    #[error("{}", depot_mismatch_message(.name, .version, .depot))]
    DepotMismatch {
        name: String,
        version: Option<String>,
        depot: String,
    },

    /// Nothing matching has been downloaded yet, from `depot` when one
    /// was requested.
    #[error("{}", no_local_message(.name, .version, .depot))]
    NoLocalTemplate {
        name: String,
        version: Option<String>,
        depot: Option<String>,
    },
}

fn not_found_message(name: &str, version: &Option<String>) -> String {
    match version {
        Some(v) => format!("No templates for {} were found with the version {}", name, v),
        None => format!("No templates were found with the name {}", name),
    }
}

fn depot_mismatch_message(name: &str, version: &Option<String>, depot: &str) -> String {
    match version {
        Some(v) => format!("No templates for {} {} were found on {}", name, v, depot),
        None => format!("No templates for {} were found on {}", name, depot),
    }
}

fn no_local_message(name: &str, version: &Option<String>, depot: &Option<String>) -> String {
    match (version, depot) {
        (Some(v), None) => format!(
            "{} {} has not been downloaded. Use `conductor download {} {}` first",
            name, v, name, v
        ),
        (None, None) => format!(
            "No {} templates have been downloaded. Use `conductor download {}` first",
            name, name
        ),
        (Some(v), Some(d)) => format!(
            "{} {} has not been downloaded from {}. Use `conductor download {} {} {}` first",
            name, v, d, name, v, d
        ),
        (None, Some(d)) => format!(
            "No {} templates have been downloaded from {}. Use `conductor download {} latest {}` first",
            name, d, name, d
        ),
    }
}

/// A single template from a single depot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSelection {
    descriptor: TemplateDescriptor,
}

impl ResolvedSelection {
    fn new(descriptor: &TemplateDescriptor) -> Self {
        Self {
            descriptor: descriptor.clone(),
        }
    }

    /// The selected template.
    pub fn identifier(&self) -> &Identifier {
        self.descriptor.identifier()
    }

    /// The selected depot's offering.
    pub fn descriptor(&self) -> &TemplateDescriptor {
        &self.descriptor
    }

    /// Name of the selected depot.
    pub fn depot_name(&self) -> &str {
        self.descriptor.depot_name()
    }
}

/// One depot the user can pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepotOption {
    /// Position in the option list.
    pub index: usize,
    pub descriptor: TemplateDescriptor,
}

impl DepotOption {
    pub fn depot_name(&self) -> &str {
        self.descriptor.depot_name()
    }
}

/// Several depots offer the resolved template and none is preferred.
///
/// Options are sorted by depot name and indexed from zero in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousChoice {
    identifier: Identifier,
    options: Vec<DepotOption>,
}

impl AmbiguousChoice {
    fn new(identifier: Identifier, mut candidates: Vec<&TemplateDescriptor>) -> Self {
        candidates.sort_by(|a, b| a.depot_name().cmp(b.depot_name()));
        let options = candidates
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| DepotOption {
                index,
                descriptor: descriptor.clone(),
            })
            .collect();
        Self {
            identifier,
            options,
        }
    }

    /// The template every option offers.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn options(&self) -> &[DepotOption] {
        &self.options
    }

    /// The option taken when the user accepts the default.
    pub fn default_option(&self) -> Option<&DepotOption> {
        self.options.first()
    }

    /// Match user input against an option index or depot name.
    pub fn select(&self, input: &str) -> Option<&DepotOption> {
        let input = input.trim();
        if let Ok(index) = input.parse::<usize>() {
            if let Some(option) = self.options.get(index) {
                return Some(option);
            }
        }
        self.options.iter().find(|o| o.depot_name() == input)
    }
}

/// Outcome of a successful resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one template from exactly one depot.
    Resolved(ResolvedSelection),
    /// The caller must choose a depot and resolve again.
    Ambiguous(AmbiguousChoice),
}

impl Resolution {
    /// The selection, if resolution finished.
    pub fn resolved(self) -> Option<ResolvedSelection> {
        match self {
            Resolution::Resolved(selection) => Some(selection),
            Resolution::Ambiguous(_) => None,
        }
    }
}

/// Resolves requests against one catalog snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    catalog: &'a Catalog,
    registry: &'a DepotRegistry,
    mode: Mode,
    latest_scope: LatestScope,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog, registry: &'a DepotRegistry, mode: Mode) -> Self {
        Self {
            catalog,
            registry,
            mode,
            latest_scope: LatestScope::default(),
        }
    }

    pub fn with_latest_scope(mut self, scope: LatestScope) -> Self {
        self.latest_scope = scope;
        self
    }

    /// Narrow `request` to a single template and depot.
    pub fn resolve(&self, request: &Request) -> Result<Resolution, ResolutionError> {
        let mut working: Vec<(&Identifier, Vec<&TemplateDescriptor>)> = self
            .catalog
            .iter()
            .filter(|(id, _)| id.name == request.name)
            .map(|(id, offers)| (id, offers.iter().collect()))
            .collect();

        if working.is_empty() {
            return Err(self.missing(request, None));
        }

        if let (LatestScope::Depot, DepotSelector::Named(depot)) =
            (self.latest_scope, &request.depot)
        {
            for (_, offers) in working.iter_mut() {
                offers.retain(|d| d.depot_name() == depot);
            }
            working.retain(|(_, offers)| !offers.is_empty());
            if working.is_empty() {
                return Err(self.not_on_depot(
                    &request.name,
                    request.version.exact().map(String::from),
                    depot,
                ));
            }
        }

        let (identifier, offers) = match &request.version {
            VersionSelector::Latest => working
                .into_iter()
                .max_by(|(a, _), (b, _)| compare_versions(&a.version, &b.version))
                .ok_or_else(|| self.missing(request, None))?,
            VersionSelector::Exact(version) => working
                .into_iter()
                .find(|(id, _)| &id.version == version)
                .ok_or_else(|| self.missing(request, Some(version)))?,
        };
        tracing::debug!("Resolved {} {} to {}", request.name, request.version, identifier);

        match &request.depot {
            DepotSelector::Named(depot) => offers
                .into_iter()
                .find(|d| d.depot_name() == depot)
                .map(|d| Resolution::Resolved(ResolvedSelection::new(d)))
                .ok_or_else(|| {
                    self.not_on_depot(&identifier.name, Some(identifier.version.clone()), depot)
                }),
            DepotSelector::Auto => self.disambiguate(request, identifier, offers),
        }
    }

    fn disambiguate(
        &self,
        request: &Request,
        identifier: &Identifier,
        offers: Vec<&TemplateDescriptor>,
    ) -> Result<Resolution, ResolutionError> {
        let chosen = match offers.as_slice() {
            [] => return Err(self.missing(request, Some(&identifier.version))),
            [only] => Some(*only),
            _ => match self.mode {
                Mode::Local => self.first_by_priority(&offers),
                Mode::Federated if identifier.kind() == TemplateKind::Kernel => offers
                    .iter()
                    .copied()
                    .find(|d| self.registry.is_default(d.depot_name())),
                Mode::Federated => None,
            },
        };

        match chosen {
            Some(descriptor) => {
                tracing::debug!("Resolved auto depot to {}", descriptor.depot_name());
                Ok(Resolution::Resolved(ResolvedSelection::new(descriptor)))
            }
            None => {
                tracing::debug!("{} depots offer {}", offers.len(), identifier);
                Ok(Resolution::Ambiguous(AmbiguousChoice::new(
                    identifier.clone(),
                    offers,
                )))
            }
        }
    }

    /// Default-priority depot first, then registry order, then catalog order.
    fn first_by_priority<'c>(
        &self,
        offers: &[&'c TemplateDescriptor],
    ) -> Option<&'c TemplateDescriptor> {
        offers.iter().copied().min_by(|a, b| {
            let rank = |d: &TemplateDescriptor| {
                (
                    !self.registry.is_default(d.depot_name()),
                    self.registry.position(d.depot_name()).unwrap_or(usize::MAX),
                )
            };
            rank(*a).cmp(&rank(*b))
        })
    }

    fn missing(&self, request: &Request, version: Option<&String>) -> ResolutionError {
        let name = request.name.clone();
        let version = version.cloned();
        match self.mode {
            Mode::Local => ResolutionError::NoLocalTemplate {
                name,
                version,
                depot: None,
            },
            Mode::Federated => ResolutionError::NotFound { name, version },
        }
    }

    /// The requested depot does not offer the template. Locally that
    /// means it was never downloaded from there.
    fn not_on_depot(&self, name: &str, version: Option<String>, depot: &str) -> ResolutionError {
        let name = name.to_string();
        let depot = depot.to_string();
        match self.mode {
            Mode::Local => ResolutionError::NoLocalTemplate {
                name,
                version,
                depot: Some(depot),
            },
            Mode::Federated => ResolutionError::DepotMismatch {
                name,
                version,
                depot,
            },
        }
    }
}

/// Resolve `request` with the default `latest` scope.
pub fn resolve(
    request: &Request,
    catalog: &Catalog,
    registry: &DepotRegistry,
    mode: Mode,
) -> Result<Resolution, ResolutionError> {
    Resolver::new(catalog, registry, mode).resolve(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depot::{Depot, RegistrarKind};
    use crate::resolution::request::RawRequest;

    fn depot(name: &str) -> Depot {
        Depot::new(name, RegistrarKind::Directory, format!("/srv/{}", name))
    }

    fn registry() -> DepotRegistry {
        DepotRegistry::new(
            Some(Depot::mainline(RegistrarKind::Http, "https://example.org")),
            vec![depot("alt"), depot("beta"), depot("zeta")],
        )
    }

    fn online(name: &str, version: &str, depot_name: &str) -> TemplateDescriptor {
        let found = registry().get(depot_name).cloned();
        TemplateDescriptor::online(
            Identifier::new(name, version),
            found.unwrap_or_else(|| depot(depot_name)),
        )
    }

    fn offline(name: &str, version: &str, depot_name: &str) -> TemplateDescriptor {
        let found = registry().get(depot_name).cloned();
        TemplateDescriptor::offline(
            Identifier::new(name, version),
            found.unwrap_or_else(|| depot(depot_name)),
        )
    }

    fn request(name: &str, version: &str, depot: &str) -> Request {
        RawRequest::new(name, version, depot).normalize()
    }

    fn resolved(resolution: Resolution) -> (String, String, String) {
        let selection = resolution.resolved().expect("expected a resolved selection");
        assert_eq!(selection.identifier(), selection.descriptor().identifier());
        (
            selection.identifier().name.clone(),
            selection.identifier().version.clone(),
            selection.depot_name().to_string(),
        )
    }

    fn scenario_catalog() -> Catalog {
        vec![
            online("kernel", "1.0.0", "mainline"),
            online("kernel", "1.0.0", "alt"),
            online("kernel", "1.1.0", "alt"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn latest_resolves_to_single_depot_with_max_version() {
        let registry = registry();
        let result = resolve(
            &request("kernel", "latest", "auto"),
            &scenario_catalog(),
            &registry,
            Mode::Federated,
        )
        .unwrap();
        assert_eq!(resolved(result), ("kernel".into(), "1.1.0".into(), "alt".into()));
    }

    #[test]
    fn kernel_shared_with_mainline_prefers_mainline() {
        let registry = registry();
        let result = resolve(
            &request("kernel", "1.0.0", "auto"),
            &scenario_catalog(),
            &registry,
            Mode::Federated,
        )
        .unwrap();
        assert_eq!(
            resolved(result),
            ("kernel".into(), "1.0.0".into(), "mainline".into())
        );
    }

    #[test]
    fn latest_uses_semantic_order() {
        let registry = registry();
        let catalog: Catalog = vec![
            online("okapilib", "1.0.0", "alt"),
            online("okapilib", "1.2.0", "alt"),
            online("okapilib", "1.1.5", "alt"),
            online("okapilib", "1.10.0-rc.1", "alt"),
        ]
        .into_iter()
        .collect();

        let result = resolve(
            &request("okapilib", "latest", "auto"),
            &catalog,
            &registry,
            Mode::Federated,
        )
        .unwrap();
        assert_eq!(resolved(result).1, "1.10.0-rc.1");

        let catalog: Catalog = vec![
            online("okapilib", "1.0.0", "alt"),
            online("okapilib", "1.2.0", "alt"),
            online("okapilib", "1.1.5", "alt"),
        ]
        .into_iter()
        .collect();
        let result = resolve(
            &request("okapilib", "latest", "auto"),
            &catalog,
            &registry,
            Mode::Federated,
        )
        .unwrap();
        assert_eq!(resolved(result).1, "1.2.0");
    }

    #[test]
    fn two_non_default_depots_are_ambiguous_sorted_by_name() {
        let registry = registry();
        let catalog: Catalog = vec![
            online("kernel", "2.0.0", "zeta"),
            online("kernel", "2.0.0", "beta"),
        ]
        .into_iter()
        .collect();

        let result = resolve(
            &request("kernel", "2.0.0", "auto"),
            &catalog,
            &registry,
            Mode::Federated,
        )
        .unwrap();

        let Resolution::Ambiguous(choice) = result else {
            panic!("expected an ambiguous choice");
        };
        let names: Vec<_> = choice.options().iter().map(|o| o.depot_name()).collect();
        assert_eq!(names, vec!["beta", "zeta"]);
        let indices: Vec<_> = choice.options().iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(choice.default_option().unwrap().depot_name(), "beta");
        assert_eq!(choice.identifier(), &Identifier::new("kernel", "2.0.0"));
    }

    #[test]
    fn library_shared_with_mainline_is_ambiguous() {
        let registry = registry();
        let catalog: Catalog = vec![
            online("okapilib", "3.0.0", "mainline"),
            online("okapilib", "3.0.0", "alt"),
        ]
        .into_iter()
        .collect();

        let result = resolve(
            &request("okapilib", "3.0.0", "auto"),
            &catalog,
            &registry,
            Mode::Federated,
        )
        .unwrap();
        assert!(matches!(result, Resolution::Ambiguous(_)));
    }

    #[test]
    fn explicit_depot_narrows_without_prompt() {
        let registry = registry();
        let catalog: Catalog = vec![
            online("okapilib", "3.0.0", "beta"),
            online("okapilib", "3.0.0", "zeta"),
        ]
        .into_iter()
        .collect();

        let result = resolve(
            &request("okapilib", "3.0.0", "zeta"),
            &catalog,
            &registry,
            Mode::Federated,
        )
        .unwrap();
        assert_eq!(resolved(result).2, "zeta");
    }

    #[test]
    fn explicit_depot_missing_is_depot_mismatch() {
        let registry = registry();
        let err = resolve(
            &request("kernel", "1.1.0", "mainline"),
            &scenario_catalog(),
            &registry,
            Mode::Federated,
        )
        .unwrap_err();

        assert_eq!(
            err,
            ResolutionError::DepotMismatch {
                name: "kernel".into(),
                version: Some("1.1.0".into()),
                depot: "mainline".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "No templates for kernel 1.1.0 were found on mainline"
        );
    }

    #[test]
    fn unknown_name_is_not_found() {
        let registry = registry();
        let err = resolve(
            &request("okapilib", "latest", "auto"),
            &scenario_catalog(),
            &registry,
            Mode::Federated,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "No templates were found with the name okapilib");
    }

    #[test]
    fn unknown_version_is_not_found_with_version() {
        let registry = registry();
        let err = resolve(
            &request("kernel", "9.9.9", "auto"),
            &scenario_catalog(),
            &registry,
            Mode::Federated,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ResolutionError::NotFound {
                name: "kernel".into(),
                version: Some("9.9.9".into()),
            }
        );
        assert!(err.to_string().contains("with the version 9.9.9"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let registry = registry();
        let catalog = scenario_catalog();
        let req = request("kernel", "1.0.0", "alt");
        let first = resolve(&req, &catalog, &registry, Mode::Federated);
        let second = resolve(&req, &catalog, &registry, Mode::Federated);
        assert_eq!(first, second);
    }

    #[test]
    fn local_empty_catalog_is_no_local_template() {
        let registry = registry();
        let err = resolve(
            &request("kernel", "latest", "auto"),
            &Catalog::new(),
            &registry,
            Mode::Local,
        )
        .unwrap_err();
        assert!(matches!(err, ResolutionError::NoLocalTemplate { .. }));
        assert!(err.to_string().contains("conductor download"));
        assert_ne!(
            err.to_string(),
            ResolutionError::NotFound {
                name: "kernel".into(),
                version: None
            }
            .to_string()
        );
    }

    #[test]
    fn local_missing_version_is_no_local_template() {
        let registry = registry();
        let catalog: Catalog = vec![offline("kernel", "1.0.0", "alt")].into_iter().collect();
        let err = resolve(
            &request("kernel", "2.0.0", "auto"),
            &catalog,
            &registry,
            Mode::Local,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ResolutionError::NoLocalTemplate {
                name: "kernel".into(),
                version: Some("2.0.0".into()),
                depot: None,
            }
        );
    }

    #[test]
    fn local_explicit_depot_without_copy_asks_for_download() {
        let registry = registry();
        let catalog: Catalog = vec![offline("kernel", "1.0.0", "alt")].into_iter().collect();
        let err = resolve(
            &request("kernel", "1.0.0", "beta"),
            &catalog,
            &registry,
            Mode::Local,
        )
        .unwrap_err();

        assert_eq!(
            err,
            ResolutionError::NoLocalTemplate {
                name: "kernel".into(),
                version: Some("1.0.0".into()),
                depot: Some("beta".into()),
            }
        );
        assert_eq!(
            err.to_string(),
            "kernel 1.0.0 has not been downloaded from beta. Use `conductor download kernel 1.0.0 beta` first"
        );
    }

    #[test]
    fn local_mode_prefers_default_depot() {
        let registry = registry();
        let catalog: Catalog = vec![
            offline("okapilib", "3.0.0", "zeta"),
            offline("okapilib", "3.0.0", "mainline"),
        ]
        .into_iter()
        .collect();

        let result = resolve(
            &request("okapilib", "3.0.0", "auto"),
            &catalog,
            &registry,
            Mode::Local,
        )
        .unwrap();
        assert_eq!(resolved(result).2, "mainline");
    }

    #[test]
    fn local_mode_falls_back_to_registry_order() {
        let registry = registry();
        let catalog: Catalog = vec![
            offline("kernel", "1.0.0", "zeta"),
            offline("kernel", "1.0.0", "beta"),
        ]
        .into_iter()
        .collect();

        let result = resolve(
            &request("kernel", "1.0.0", "auto"),
            &catalog,
            &registry,
            Mode::Local,
        )
        .unwrap();
        assert_eq!(resolved(result).2, "beta");
    }

    #[test]
    fn global_latest_scope_reports_mismatch_for_older_depot() {
        let registry = registry();
        let result = resolve(
            &request("kernel", "latest", "mainline"),
            &scenario_catalog(),
            &registry,
            Mode::Federated,
        );
        assert!(matches!(
            result,
            Err(ResolutionError::DepotMismatch { .. })
        ));
    }

    #[test]
    fn depot_latest_scope_picks_latest_on_that_depot() {
        let registry = registry();
        let catalog = scenario_catalog();
        let result = Resolver::new(&catalog, &registry, Mode::Federated)
            .with_latest_scope(LatestScope::Depot)
            .resolve(&request("kernel", "latest", "mainline"))
            .unwrap();
        assert_eq!(
            resolved(result),
            ("kernel".into(), "1.0.0".into(), "mainline".into())
        );
    }

    #[test]
    fn depot_latest_scope_unknown_depot_is_mismatch() {
        let registry = registry();
        let catalog = scenario_catalog();
        let err = Resolver::new(&catalog, &registry, Mode::Federated)
            .with_latest_scope(LatestScope::Depot)
            .resolve(&request("kernel", "latest", "zeta"))
            .unwrap_err();
        assert_eq!(err.to_string(), "No templates for kernel were found on zeta");
    }

    #[test]
    fn choice_selects_by_index_or_name() {
        let registry = registry();
        let catalog: Catalog = vec![
            online("okapilib", "3.0.0", "zeta"),
            online("okapilib", "3.0.0", "beta"),
        ]
        .into_iter()
        .collect();
        let Resolution::Ambiguous(choice) = resolve(
            &request("okapilib", "3.0.0", "auto"),
            &catalog,
            &registry,
            Mode::Federated,
        )
        .unwrap() else {
            panic!("expected an ambiguous choice");
        };

        assert_eq!(choice.select("1").unwrap().depot_name(), "zeta");
        assert_eq!(choice.select(" beta ").unwrap().depot_name(), "beta");
        assert!(choice.select("2").is_none());
        assert!(choice.select("mainline").is_none());
    }

    #[test]
    fn rerunning_with_chosen_depot_resolves() {
        let registry = registry();
        let catalog: Catalog = vec![
            online("okapilib", "3.0.0", "zeta"),
            online("okapilib", "3.0.0", "beta"),
        ]
        .into_iter()
        .collect();
        let req = request("okapilib", "latest", "auto");
        let Resolution::Ambiguous(choice) =
            resolve(&req, &catalog, &registry, Mode::Federated).unwrap()
        else {
            panic!("expected an ambiguous choice");
        };

        let picked = choice.select("zeta").unwrap().depot_name().to_string();
        let result = resolve(&req.with_depot(picked), &catalog, &registry, Mode::Federated).unwrap();
        assert_eq!(resolved(result).2, "zeta");
    }

    #[test]
    fn latest_scope_deserializes_lowercase() {
        let scope: LatestScope = serde_yaml::from_str("depot").unwrap();
        assert_eq!(scope, LatestScope::Depot);
        assert_eq!(LatestScope::default(), LatestScope::Global);
    }
}
