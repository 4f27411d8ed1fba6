//! The ecosystem root aggregate
//!
//! An `Ecosystem` owns the complete declarative model: infrastructure
//! vendors, governance repositories, runtime environments, datastores and
//! workspaces. Construction never resolves cross-references; forward
//! references between sibling declarations are legal. A later
//! [`Ecosystem::lint_and_hydrate_caches`] pass validates the whole tree,
//! collects every problem into a [`ValidationTree`], and rebuilds the
//! derived lookup caches.
//!
//! Two failure taxonomies are deliberately separated: defects in
//! user-authored declarations are *collected* in the validation tree, while
//! misuse of this API (looking up an undeclared environment, re-binding a
//! governed repository) fails immediately with an [`EcosystemError`].

use crate::location::{InfrastructureLocation, InfrastructureVendor, LocationKey};
use crate::platform::{DataPlatform, PlatformServiceProvider};
use crate::repository::GitHubRepository;
use crate::runtime::{RuntimeDeclaration, RuntimeEnvironment, RuntimeEnvironmentState};
use crate::validation::{ProblemKind, TreeHandle, ValidationTree};
use crate::workspace::{Datastore, Workspace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from misuse of the ecosystem API
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EcosystemError {
    #[error("runtime environment '{0}' was never declared")]
    RuntimeEnvironmentNotFound(String),

    #[error("data platform '{0}' is not provided by any bound PSP")]
    DataPlatformNotFound(String),

    #[error("location key '{0}' does not resolve")]
    LocationNotFound(String),

    #[error(
        "runtime environment '{environment}' is governed by repository '{existing}' and cannot be re-bound to '{requested}'"
    )]
    ConfigurationConflict {
        environment: String,
        existing: String,
        requested: String,
    },
}

/// The root aggregate of a declarative data-platform model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ecosystem {
    /// Ecosystem name
    pub name: String,

    /// Repository that owns the model as a whole
    pub owning_repository: GitHubRepository,

    /// Repository tracking the live (deployed) model state
    pub live_repository: GitHubRepository,

    /// Infrastructure vendors and their location trees
    pub vendors: Vec<InfrastructureVendor>,

    /// Runtime environments, materialized from their declarations
    pub runtime_environments: Vec<RuntimeEnvironment>,

    /// Datastores data is captured from
    pub datastores: Vec<Datastore>,

    /// Workspaces consuming datasets through data platforms
    pub workspaces: Vec<Workspace>,

    // Derived caches, rebuilt by lint_and_hydrate_caches. Never serialized;
    // a deserialized ecosystem must be re-hydrated.
    #[serde(skip)]
    hydrated: bool,
    #[serde(skip)]
    location_keys: BTreeSet<LocationKey>,
    #[serde(skip)]
    datastore_index: BTreeMap<String, usize>,
}

impl Ecosystem {
    /// Start building an ecosystem
    pub fn builder(name: impl Into<String>, owning_repository: GitHubRepository) -> EcosystemBuilder {
        EcosystemBuilder {
            name: name.into(),
            owning_repository,
            live_repository: None,
            vendors: Vec::new(),
            runtime_declarations: Vec::new(),
            datastores: Vec::new(),
            workspaces: Vec::new(),
        }
    }

    /// Whether the last lint pass succeeded and the caches are usable
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Every location key declared by any vendor (available after hydration)
    pub fn location_keys(&self) -> &BTreeSet<LocationKey> {
        &self.location_keys
    }

    /// Look up a runtime environment by name.
    ///
    /// Querying a name that was never declared is a programming error and
    /// fails hard; it is not a validation-tree entry.
    pub fn runtime_environment(&self, name: &str) -> Result<&RuntimeEnvironment, EcosystemError> {
        self.runtime_environments
            .iter()
            .find(|env| env.name == name)
            .ok_or_else(|| EcosystemError::RuntimeEnvironmentNotFound(name.to_string()))
    }

    /// Mutable lookup of a runtime environment by name
    pub fn runtime_environment_mut(
        &mut self,
        name: &str,
    ) -> Result<&mut RuntimeEnvironment, EcosystemError> {
        self.runtime_environments
            .iter_mut()
            .find(|env| env.name == name)
            .ok_or_else(|| EcosystemError::RuntimeEnvironmentNotFound(name.to_string()))
    }

    /// Look up a data platform by name across every bound PSP
    pub fn data_platform(&self, name: &str) -> Result<&DataPlatform, EcosystemError> {
        self.bound_data_platforms()
            .find(|(_, _, platform)| platform.name == name)
            .map(|(_, _, platform)| platform)
            .ok_or_else(|| EcosystemError::DataPlatformNotFound(name.to_string()))
    }

    /// Iterate `(environment, psp, platform)` over every platform provided
    /// by a bound PSP
    pub fn bound_data_platforms(
        &self,
    ) -> impl Iterator<Item = (&RuntimeEnvironment, &PlatformServiceProvider, &DataPlatform)> {
        self.runtime_environments.iter().flat_map(|env| {
            env.psp().into_iter().flat_map(move |psp| {
                psp.data_platforms
                    .iter()
                    .map(move |platform| (env, psp, platform))
            })
        })
    }

    /// Resolve a location key against the vendor trees
    pub fn resolve_location(
        &self,
        key: &LocationKey,
    ) -> Result<&InfrastructureLocation, EcosystemError> {
        let vendor = self
            .vendors
            .iter()
            .find(|v| v.name == key.vendor())
            .ok_or_else(|| EcosystemError::LocationNotFound(key.to_string()))?;
        vendor
            .find(&key.path_segments())
            .ok_or_else(|| EcosystemError::LocationNotFound(key.to_string()))
    }

    /// Look up a datastore by name (available after hydration; falls back
    /// to a linear scan when the caches are stale)
    pub fn datastore(&self, name: &str) -> Option<&Datastore> {
        if self.hydrated {
            self.datastore_index
                .get(name)
                .map(|idx| &self.datastores[*idx])
        } else {
            self.datastores.iter().find(|store| store.name == name)
        }
    }

    /// Validate the whole declarative tree and rebuild the derived caches.
    ///
    /// Every component validates everything it can before returning, so one
    /// pass reports the full defect set. The pass is idempotent: repeated
    /// calls without intervening mutation produce trees with identical
    /// error and warning counts. The ecosystem counts as hydrated only when
    /// the pass finds no errors.
    pub fn lint_and_hydrate_caches(&mut self) -> ValidationTree {
        debug!(ecosystem = %self.name, "linting ecosystem");
        let mut tree = ValidationTree::new(format!("Ecosystem '{}'", self.name));

        // Rebuild caches from scratch so the pass never sees stale state.
        self.location_keys.clear();
        self.datastore_index.clear();

        self.lint_vendors(&mut tree);
        self.lint_datastores(&mut tree);
        self.lint_workspaces(&mut tree);
        self.lint_runtime_environments(&mut tree);

        self.hydrated = !tree.has_errors();
        info!(
            ecosystem = %self.name,
            errors = tree.error_count(),
            warnings = tree.warning_count(),
            hydrated = self.hydrated,
            "lint pass complete"
        );
        tree
    }

    fn lint_vendors(&mut self, tree: &mut ValidationTree) {
        let vendors_node = tree.child(tree.root(), "vendors");

        let mut vendor_names: BTreeMap<&str, usize> = BTreeMap::new();
        for vendor in &self.vendors {
            *vendor_names.entry(&vendor.name).or_insert(0) += 1;
        }
        for (name, count) in &vendor_names {
            if *count > 1 {
                tree.error(
                    vendors_node,
                    ProblemKind::DuplicateKey,
                    format!("vendor '{name}' is declared {count} times"),
                );
            }
        }

        for vendor in &self.vendors {
            let node = tree.child(vendors_node, format!("vendor '{}'", vendor.name));
            if vendor.documentation.is_none() {
                tree.warning(
                    node,
                    ProblemKind::MissingDocumentation,
                    format!("vendor '{}' has no documentation", vendor.name),
                );
            }

            let mut key_counts: BTreeMap<LocationKey, usize> = BTreeMap::new();
            for key in vendor.collect_keys() {
                *key_counts.entry(key).or_insert(0) += 1;
            }
            for (key, count) in key_counts {
                if !key.is_well_formed() {
                    tree.error(
                        node,
                        ProblemKind::InvalidValue,
                        format!("location key '{key}' contains an empty name segment"),
                    );
                }
                if count > 1 {
                    tree.error(
                        node,
                        ProblemKind::DuplicateKey,
                        format!("location '{key}' is declared {count} times"),
                    );
                }
                self.location_keys.insert(key);
            }
        }
    }

    fn lint_datastores(&mut self, tree: &mut ValidationTree) {
        let stores_node = tree.child(tree.root(), "datastores");

        for (idx, store) in self.datastores.iter().enumerate() {
            let node = tree.child(stores_node, format!("datastore '{}'", store.name));

            if self.datastore_index.insert(store.name.clone(), idx).is_some() {
                tree.error(
                    stores_node,
                    ProblemKind::DuplicateKey,
                    format!("datastore '{}' is declared more than once", store.name),
                );
            }

            if store.datasets.is_empty() {
                tree.warning(
                    node,
                    ProblemKind::InvalidValue,
                    format!("datastore '{}' declares no datasets", store.name),
                );
            }

            let mut dataset_names: BTreeSet<&str> = BTreeSet::new();
            for dataset in &store.datasets {
                if !dataset_names.insert(&dataset.name) {
                    tree.error(
                        node,
                        ProblemKind::DuplicateKey,
                        format!(
                            "dataset '{}' is declared more than once in datastore '{}'",
                            dataset.name, store.name
                        ),
                    );
                }
            }

            let consumed = self
                .workspaces
                .iter()
                .flat_map(|ws| ws.sinks.iter())
                .any(|sink| sink.datastore == store.name);
            if !consumed {
                tree.warning(
                    node,
                    ProblemKind::InvalidValue,
                    format!("datastore '{}' has no consuming workspaces", store.name),
                );
            }
        }
    }

    fn lint_workspaces(&mut self, tree: &mut ValidationTree) {
        let workspaces_node = tree.child(tree.root(), "workspaces");

        let platform_names: BTreeSet<&str> = self
            .bound_data_platforms()
            .map(|(_, _, platform)| platform.name.as_str())
            .collect();

        let mut workspace_names: BTreeSet<&str> = BTreeSet::new();
        for workspace in &self.workspaces {
            if !workspace_names.insert(&workspace.name) {
                tree.error(
                    workspaces_node,
                    ProblemKind::DuplicateKey,
                    format!("workspace '{}' is declared more than once", workspace.name),
                );
            }
        }

        for workspace in &self.workspaces {
            let node = tree.child(workspaces_node, format!("workspace '{}'", workspace.name));

            if !platform_names.contains(workspace.platform.as_str()) {
                tree.error(
                    node,
                    ProblemKind::UnresolvedReference,
                    format!(
                        "workspace '{}' requires data platform '{}' which no bound PSP provides",
                        workspace.name, workspace.platform
                    ),
                );
            }

            for sink in &workspace.sinks {
                match self.datastores.iter().find(|s| s.name == sink.datastore) {
                    None => tree.error(
                        node,
                        ProblemKind::UnresolvedReference,
                        format!("sink '{sink}' references an undeclared datastore"),
                    ),
                    Some(store) if !store.has_dataset(&sink.dataset) => tree.error(
                        node,
                        ProblemKind::UnresolvedReference,
                        format!(
                            "sink '{sink}' references a dataset not served by datastore '{}'",
                            store.name
                        ),
                    ),
                    Some(_) => {}
                }
            }

            if let Some(output) = &workspace.transform_output {
                if !self.datastores.iter().any(|s| &s.name == output) {
                    tree.error(
                        node,
                        ProblemKind::UnresolvedReference,
                        format!(
                            "workspace '{}' produces undeclared datastore '{}'",
                            workspace.name, output
                        ),
                    );
                }
            }
        }
    }

    fn lint_runtime_environments(&mut self, tree: &mut ValidationTree) {
        let runtimes_node = tree.child(tree.root(), "runtime environments");

        let mut platform_owner: BTreeMap<&str, &str> = BTreeMap::new();
        for (env, _, platform) in self.bound_data_platforms() {
            if let Some(previous) = platform_owner.insert(&platform.name, &env.name) {
                tree.error(
                    runtimes_node,
                    ProblemKind::DuplicateKey,
                    format!(
                        "data platform '{}' is provided by both '{}' and '{}'",
                        platform.name, previous, env.name
                    ),
                );
            }
        }

        let environments: Vec<&RuntimeEnvironment> = self.runtime_environments.iter().collect();
        for env in environments {
            let node = tree.child(runtimes_node, format!("runtime environment '{}'", env.name));

            match env.state() {
                RuntimeEnvironmentState::Unconfigured => {
                    tree.warning(
                        node,
                        ProblemKind::InvalidValue,
                        format!("runtime environment '{}' was never configured", env.name),
                    );
                }
                RuntimeEnvironmentState::Configured => {
                    tree.warning(
                        node,
                        ProblemKind::InvalidValue,
                        format!("runtime environment '{}' has no PSP bound", env.name),
                    );
                }
                RuntimeEnvironmentState::PspBound => {}
            }

            if let Some(selector) = env.release_selector() {
                if selector.pattern.wildcard_count() == 0 {
                    tree.warning(
                        node,
                        ProblemKind::UnmatchedReleasePattern,
                        format!(
                            "release pattern '{}' has no version wildcards and matches a single literal tag",
                            selector.pattern.as_str()
                        ),
                    );
                }
            }

            if let Some(psp) = env.psp() {
                self.lint_psp(tree, node, psp);
            }
        }
    }

    fn lint_psp(&self, tree: &mut ValidationTree, parent: TreeHandle, psp: &PlatformServiceProvider) {
        let node = tree.child(parent, format!("PSP '{}'", psp.name));

        if psp.documentation.is_none() {
            tree.warning(
                node,
                ProblemKind::MissingDocumentation,
                format!("PSP '{}' has no documentation", psp.name),
            );
        }

        if psp.docker_image.is_empty() {
            tree.warning(
                node,
                ProblemKind::InvalidValue,
                format!("PSP '{}' pins no pipeline container image", psp.name),
            );
        }

        for key in psp.locations.iter().chain(psp.merge_container.locations.iter()) {
            if !self.location_keys.contains(key) {
                tree.error(
                    node,
                    ProblemKind::UnresolvedReference,
                    format!("location key '{key}' does not resolve against any vendor"),
                );
            }
        }

        let mut platform_names: BTreeSet<&str> = BTreeSet::new();
        for platform in &psp.data_platforms {
            if !platform_names.insert(&platform.name) {
                tree.error(
                    node,
                    ProblemKind::DuplicateKey,
                    format!(
                        "data platform '{}' is declared more than once in PSP '{}'",
                        platform.name, psp.name
                    ),
                );
            }
            if platform.staging_batches_to_keep < 1 {
                tree.error(
                    node,
                    ProblemKind::InvalidValue,
                    format!(
                        "data platform '{}' must keep at least one staging batch",
                        platform.name
                    ),
                );
            }
            if platform.documentation.is_none() {
                tree.warning(
                    node,
                    ProblemKind::MissingDocumentation,
                    format!("data platform '{}' has no documentation", platform.name),
                );
            }
        }
    }
}

/// Builder for the ecosystem root aggregate
pub struct EcosystemBuilder {
    name: String,
    owning_repository: GitHubRepository,
    live_repository: Option<GitHubRepository>,
    vendors: Vec<InfrastructureVendor>,
    runtime_declarations: Vec<RuntimeDeclaration>,
    datastores: Vec<Datastore>,
    workspaces: Vec<Workspace>,
}

impl EcosystemBuilder {
    /// Set the repository tracking the live model
    pub fn live_repository(mut self, repository: GitHubRepository) -> Self {
        self.live_repository = Some(repository);
        self
    }

    /// Add an infrastructure vendor
    pub fn vendor(mut self, vendor: InfrastructureVendor) -> Self {
        self.vendors.push(vendor);
        self
    }

    /// Declare a runtime environment
    pub fn runtime_declaration(mut self, declaration: RuntimeDeclaration) -> Self {
        self.runtime_declarations.push(declaration);
        self
    }

    /// Add a datastore
    pub fn datastore(mut self, datastore: Datastore) -> Self {
        self.datastores.push(datastore);
        self
    }

    /// Add a workspace
    pub fn workspace(mut self, workspace: Workspace) -> Self {
        self.workspaces.push(workspace);
        self
    }

    /// Materialize the ecosystem.
    ///
    /// A repository bound to an environment name is immutable: declaring the
    /// same name again with a different repository is a
    /// [`EcosystemError::ConfigurationConflict`]. Re-declaring an identical
    /// binding is deduplicated.
    pub fn build(self) -> Result<Ecosystem, EcosystemError> {
        let mut seen: BTreeMap<String, GitHubRepository> = BTreeMap::new();
        let mut environments = Vec::new();
        for declaration in &self.runtime_declarations {
            match seen.get(&declaration.name) {
                Some(existing) if *existing != declaration.repository => {
                    return Err(EcosystemError::ConfigurationConflict {
                        environment: declaration.name.clone(),
                        existing: existing.to_string(),
                        requested: declaration.repository.to_string(),
                    });
                }
                Some(_) => continue,
                None => {
                    seen.insert(declaration.name.clone(), declaration.repository.clone());
                    environments.push(RuntimeEnvironment::from_declaration(declaration));
                }
            }
        }

        let live_repository = self
            .live_repository
            .unwrap_or_else(|| self.owning_repository.clone());

        Ok(Ecosystem {
            name: self.name,
            owning_repository: self.owning_repository,
            live_repository,
            vendors: self.vendors,
            runtime_environments: environments,
            datastores: self.datastores,
            workspaces: self.workspaces,
            hydrated: false,
            location_keys: BTreeSet::new(),
            datastore_index: BTreeMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{DataContainer, HostPortPair};
    use crate::credential::{Credential, CredentialKind};
    use crate::location::CloudVendor;
    use crate::platform::{DataMilestoningStrategy, GitCacheConfig, PlatformAssembly, PspDeclaration};
    use crate::release::{ReleaseType, VersionPattern, VersionPatternReleaseSelector, VN_N_N};
    use crate::runtime::ProductionStatus;
    use crate::workspace::{Dataset, DatasetRef};

    fn repo(branch: &str) -> GitHubRepository {
        GitHubRepository::new(
            "acme/model",
            branch,
            Credential::new("git", CredentialKind::ApiToken),
        )
    }

    fn base_builder() -> EcosystemBuilder {
        Ecosystem::builder("Demo", repo("main_edit")).live_repository(repo("main"))
    }

    #[test]
    fn test_runtime_environment_lookup_is_a_hard_error() {
        let eco = base_builder().build().unwrap();
        let err = eco.runtime_environment("demo").unwrap_err();
        assert_eq!(
            err,
            EcosystemError::RuntimeEnvironmentNotFound("demo".to_string())
        );
    }

    #[test]
    fn test_rebinding_environment_repository_conflicts() {
        let result = base_builder()
            .runtime_declaration(RuntimeDeclaration::new("demo", repo("demo_rte_edit")))
            .runtime_declaration(RuntimeDeclaration::new("demo", repo("other_branch")))
            .build();
        assert!(matches!(
            result,
            Err(EcosystemError::ConfigurationConflict { .. })
        ));
    }

    #[test]
    fn test_identical_redeclaration_is_deduplicated() {
        let eco = base_builder()
            .runtime_declaration(RuntimeDeclaration::new("demo", repo("demo_rte_edit")))
            .runtime_declaration(RuntimeDeclaration::new("demo", repo("demo_rte_edit")))
            .build()
            .unwrap();
        assert_eq!(eco.runtime_environments.len(), 1);
    }

    #[test]
    fn test_duplicate_location_reports_exactly_one_error() {
        let mut vendor = InfrastructureVendor::new("MyCorp", CloudVendor::Private)
            .documentation(crate::documentation::PlainTextDocumentation::new("docs"));
        vendor.add_location(&["USA", "NY_1"]);
        vendor.add_location(&["USA", "NY_1"]);

        let mut eco = base_builder().vendor(vendor).build().unwrap();
        let tree = eco.lint_and_hydrate_caches();

        let duplicates: Vec<_> = tree
            .problems()
            .filter(|p| p.kind == ProblemKind::DuplicateKey)
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert!(tree.has_errors());
        assert!(!eco.is_hydrated());
    }

    #[test]
    fn test_lint_is_idempotent() {
        let mut vendor = InfrastructureVendor::new("MyCorp", CloudVendor::Private);
        vendor.add_location(&["USA", "NY_1"]);
        let mut eco = base_builder().vendor(vendor).build().unwrap();

        let first = eco.lint_and_hydrate_caches();
        let second = eco.lint_and_hydrate_caches();
        assert_eq!(first.error_count(), second.error_count());
        assert_eq!(first.warning_count(), second.warning_count());
    }

    #[test]
    fn test_resolve_location() {
        let mut vendor = InfrastructureVendor::new("MyCorp", CloudVendor::Private);
        let key = vendor.add_location(&["USA", "NY_1"]);
        let eco = base_builder().vendor(vendor).build().unwrap();

        assert_eq!(eco.resolve_location(&key).unwrap().name, "NY_1");
        let missing = LocationKey::new("MyCorp:USA/TX_1");
        assert_eq!(
            eco.resolve_location(&missing).unwrap_err(),
            EcosystemError::LocationNotFound("MyCorp:USA/TX_1".to_string())
        );
    }

    #[test]
    fn test_unresolved_sink_is_collected_not_raised() {
        let mut eco = base_builder()
            .datastore(Datastore::new("orders").dataset(Dataset::new("order_lines")))
            .workspace(
                Workspace::new("reporting", "SCD2")
                    .sink(DatasetRef::new("orders", "order_lines"))
                    .sink(DatasetRef::new("payments", "ledger")),
            )
            .build()
            .unwrap();

        let tree = eco.lint_and_hydrate_caches();
        let unresolved: Vec<_> = tree
            .problems()
            .filter(|p| p.kind == ProblemKind::UnresolvedReference)
            .collect();
        // Missing datastore 'payments' and missing platform 'SCD2'.
        assert_eq!(unresolved.len(), 2);
        assert!(!eco.is_hydrated());
    }

    #[test]
    fn test_duplicate_vendor_names_are_an_error() {
        let mut eco = base_builder()
            .vendor(InfrastructureVendor::new("MyCorp", CloudVendor::Private))
            .vendor(InfrastructureVendor::new("MyCorp", CloudVendor::Aws))
            .build()
            .unwrap();
        let tree = eco.lint_and_hydrate_caches();
        assert!(tree
            .problems()
            .any(|p| p.kind == ProblemKind::DuplicateKey && p.message.contains("vendor 'MyCorp'")));
    }

    #[test]
    fn test_psp_lint_reports_locations_platforms_and_batches() {
        let mut vendor = InfrastructureVendor::new("MyCorp", CloudVendor::Private);
        vendor.add_location(&["USA", "NY_1"]);
        vendor.add_location(&["USA", ""]);

        let mut eco = base_builder()
            .vendor(vendor)
            .runtime_declaration(RuntimeDeclaration::new("demo", repo("demo_rte_edit")))
            .build()
            .unwrap();

        let psp = PlatformServiceProvider::new(
            "Demo_PSP",
            [LocationKey::new("MyCorp:EU/FR_1")].into_iter().collect(),
            Credential::new("git", CredentialKind::ApiToken),
            Credential::new("merge", CredentialKind::UserPassword),
            PlatformAssembly::new(
                "Demo",
                "demo1",
                GitCacheConfig::new(true, "ReadWriteMany", "longhorn"),
            ),
            DataContainer::postgres(
                "K8sMergeDB",
                HostPortPair::new("postgres-demo", 5432),
                "merge_db",
                BTreeSet::new(),
                ProductionStatus::NotProduction,
            ),
        )
        .docker_image("strata/strata:v1.1.0")
        .data_platform(
            DataPlatform::new("SCD2", DataMilestoningStrategy::Scd2).staging_batches_to_keep(0),
        )
        .data_platform(DataPlatform::new("SCD2", DataMilestoningStrategy::Scd2));

        let env = eco.runtime_environment_mut("demo").unwrap();
        env.configure(
            VersionPatternReleaseSelector::new(
                VersionPattern::new(VN_N_N).suffixed("-demo"),
                ReleaseType::StableOnly,
            ),
            vec![PspDeclaration::new("Demo_PSP", repo("demo_rte_edit"))],
            ProductionStatus::NotProduction,
        )
        .unwrap();
        env.set_psp(psp).unwrap();

        let tree = eco.lint_and_hydrate_caches();

        // Empty path segment in the vendor's own declarations.
        assert!(tree
            .problems()
            .any(|p| p.kind == ProblemKind::InvalidValue
                && p.message.contains("empty name segment")));
        // PSP location key naming a site no vendor declares.
        assert!(tree
            .problems()
            .any(|p| p.kind == ProblemKind::UnresolvedReference
                && p.message.contains("MyCorp:EU/FR_1")));
        // Two data platforms named SCD2 within the same PSP.
        assert!(tree
            .problems()
            .any(|p| p.kind == ProblemKind::DuplicateKey
                && p.message.contains("declared more than once in PSP 'Demo_PSP'")));
        // A platform keeping zero staging batches.
        assert!(tree
            .problems()
            .any(|p| p.kind == ProblemKind::InvalidValue
                && p.message.contains("at least one staging batch")));

        assert!(tree.has_errors());
        assert!(!eco.is_hydrated());
    }

    #[test]
    fn test_datastore_lookup_uses_hydrated_index() {
        let mut eco = base_builder()
            .datastore(Datastore::new("orders").dataset(Dataset::new("order_lines")))
            .build()
            .unwrap();

        // Resolvable before hydration via linear scan.
        assert!(eco.datastore("orders").is_some());

        eco.lint_and_hydrate_caches();
        assert!(eco.datastore("orders").is_some());
        assert!(eco.datastore("payments").is_none());
    }

    #[test]
    fn test_warnings_alone_still_hydrate() {
        // An undocumented vendor warns but does not block hydration.
        let mut vendor = InfrastructureVendor::new("MyCorp", CloudVendor::Private);
        vendor.add_location(&["USA", "NY_1"]);
        let mut eco = base_builder().vendor(vendor).build().unwrap();

        let tree = eco.lint_and_hydrate_caches();
        assert!(!tree.has_errors());
        assert!(tree.has_warnings());
        assert!(eco.is_hydrated());
    }
}
