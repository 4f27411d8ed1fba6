//! Pipeline graph derivation
//!
//! Derives, per data platform, the graph of pipeline stages needed to
//! satisfy declared workspace dependencies. The milestoning strategy of the
//! platform decides the shape: live-only platforms get a single
//! current-state ingest stage per datastore, forensic platforms get a
//! capture stage feeding an SCD2 merge stage. A platform no workspace
//! depends on gets an absent root, which is an expected state and not an
//! error.

use crate::graph::{PipelineStage, PlatformPipelineGraph, StageKind};
use crate::GraphError;
use std::collections::{BTreeMap, BTreeSet};
use strata_model::platform::{DataMilestoningStrategy, DataPlatform};
use strata_model::validation::{ProblemKind, ValidationTree};
use strata_model::workspace::Workspace;
use strata_model::Ecosystem;
use tracing::{debug, info};

/// Maps each data-platform name to its derived graph, or to `None` when no
/// workspace currently depends on that platform
#[derive(Debug)]
pub struct EcosystemPipelineGraph {
    /// Per-platform graph roots; absence means "no dependent workspaces"
    pub roots: BTreeMap<String, Option<PlatformPipelineGraph>>,
}

/// Result of a graph build: the graphs plus the problems found on the way
#[derive(Debug)]
pub struct GraphBuildOutcome {
    /// The derived per-platform graphs
    pub graph: EcosystemPipelineGraph,

    /// Validation problems found during derivation (e.g. cycles)
    pub problems: ValidationTree,
}

/// Builds the pipeline graphs of a validated, hydrated ecosystem
pub struct PipelineGraphBuilder<'a> {
    ecosystem: &'a Ecosystem,
}

impl<'a> PipelineGraphBuilder<'a> {
    /// Create a builder over an ecosystem
    pub fn new(ecosystem: &'a Ecosystem) -> Self {
        Self { ecosystem }
    }

    /// Derive the per-platform pipeline graphs.
    ///
    /// Requesting the graph before a successful hydration pass is a
    /// contract violation and fails with [`GraphError::NotHydrated`].
    /// A cyclic dependency aborts derivation for that platform only and is
    /// recorded as a `CyclicDependency` error in the returned tree.
    pub fn build(self) -> Result<GraphBuildOutcome, GraphError> {
        if !self.ecosystem.is_hydrated() {
            return Err(GraphError::NotHydrated);
        }

        let mut problems = ValidationTree::new(format!(
            "Pipeline graphs for ecosystem '{}'",
            self.ecosystem.name
        ));
        let mut roots: BTreeMap<String, Option<PlatformPipelineGraph>> = BTreeMap::new();

        for (_, _, platform) in self.ecosystem.bound_data_platforms() {
            let node = problems.child(
                problems.root(),
                format!("data platform '{}'", platform.name),
            );

            let mut consumers: Vec<&Workspace> = self
                .ecosystem
                .workspaces
                .iter()
                .filter(|ws| ws.platform == platform.name)
                .collect();
            consumers.sort_by(|a, b| a.name.cmp(&b.name));

            if consumers.is_empty() {
                debug!(platform = %platform.name, "no dependent workspaces; root absent");
                roots.insert(platform.name.clone(), None);
                continue;
            }

            let graph = self.build_platform_graph(platform, &consumers)?;
            if graph.has_cycles() {
                problems.error(
                    node,
                    ProblemKind::CyclicDependency,
                    format!(
                        "workspace transforms form a dependency cycle on platform '{}'",
                        platform.name
                    ),
                );
                roots.insert(platform.name.clone(), None);
            } else {
                info!(
                    platform = %platform.name,
                    stages = graph.node_count(),
                    edges = graph.edge_count(),
                    "derived pipeline graph"
                );
                roots.insert(platform.name.clone(), Some(graph));
            }
        }

        Ok(GraphBuildOutcome {
            graph: EcosystemPipelineGraph { roots },
            problems,
        })
    }

    fn build_platform_graph(
        &self,
        platform: &DataPlatform,
        consumers: &[&Workspace],
    ) -> Result<PlatformPipelineGraph, GraphError> {
        let mut graph = PlatformPipelineGraph::new(&platform.name);

        // Datastores produced by a transform on this platform are fed by
        // the producing workspace's stage, not by an ingestion stage.
        let producers: BTreeMap<&str, &str> = consumers
            .iter()
            .filter_map(|ws| {
                ws.transform_output
                    .as_deref()
                    .map(|store| (store, ws.name.as_str()))
            })
            .collect();

        for workspace in consumers {
            graph.ensure_stage(PipelineStage {
                name: workspace_stage(&workspace.name),
                kind: StageKind::WorkspaceMaterialize,
                platform: platform.name.clone(),
            });
        }

        for workspace in consumers {
            let consumer_stage = workspace_stage(&workspace.name);
            let stores: BTreeSet<&str> = workspace
                .sinks
                .iter()
                .map(|sink| sink.datastore.as_str())
                .collect();

            for store in stores {
                let producer_stage = match producers.get(store) {
                    Some(producing_ws) => workspace_stage(producing_ws),
                    None => self.ensure_ingestion_stages(&mut graph, platform, store)?,
                };
                graph.ensure_edge(&producer_stage, &consumer_stage, "dependency")?;
            }
        }

        Ok(graph)
    }

    /// Emit the ingestion stages for one externally captured datastore and
    /// return the name of the terminal stage consumers hang off.
    fn ensure_ingestion_stages(
        &self,
        graph: &mut PlatformPipelineGraph,
        platform: &DataPlatform,
        store: &str,
    ) -> Result<String, GraphError> {
        match platform.milestoning_strategy {
            DataMilestoningStrategy::LiveOnly => {
                let ingest = format!("datastore/{store}/ingest");
                graph.ensure_stage(PipelineStage {
                    name: ingest.clone(),
                    kind: StageKind::LiveIngest,
                    platform: platform.name.clone(),
                });
                Ok(ingest)
            }
            DataMilestoningStrategy::Scd2 => {
                let capture = format!("datastore/{store}/capture");
                let merge = format!("datastore/{store}/merge");
                graph.ensure_stage(PipelineStage {
                    name: capture.clone(),
                    kind: StageKind::ForensicCapture,
                    platform: platform.name.clone(),
                });
                graph.ensure_stage(PipelineStage {
                    name: merge.clone(),
                    kind: StageKind::ForensicMerge {
                        batches_to_keep: platform.staging_batches_to_keep,
                    },
                    platform: platform.name.clone(),
                });
                graph.ensure_edge(&capture, &merge, "milestone")?;
                Ok(merge)
            }
        }
    }
}

fn workspace_stage(workspace: &str) -> String {
    format!("workspace/{workspace}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet as Set;
    use strata_model::container::{DataContainer, HostPortPair};
    use strata_model::credential::{Credential, CredentialKind};
    use strata_model::location::{CloudVendor, InfrastructureVendor};
    use strata_model::platform::{
        GitCacheConfig, PlatformAssembly, PlatformServiceProvider, PspDeclaration,
    };
    use strata_model::release::{ReleaseType, VersionPattern, VN_N_N};
    use strata_model::repository::GitHubRepository;
    use strata_model::runtime::{ProductionStatus, RuntimeDeclaration};
    use strata_model::workspace::{Dataset, DatasetRef, Datastore, Workspace};
    use strata_model::VersionPatternReleaseSelector;

    fn repo(branch: &str) -> GitHubRepository {
        GitHubRepository::new(
            "acme/model",
            branch,
            Credential::new("git", CredentialKind::ApiToken),
        )
    }

    fn psp(platforms: Vec<DataPlatform>) -> PlatformServiceProvider {
        let locations: Set<_> = [strata_model::LocationKey::new("MyCorp:USA/NY_1")]
            .into_iter()
            .collect();
        let mut psp = PlatformServiceProvider::new(
            "Demo_PSP",
            locations.clone(),
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
                locations,
                ProductionStatus::NotProduction,
            ),
        )
        .docker_image("strata/strata:v1.1.0");
        for platform in platforms {
            psp = psp.data_platform(platform);
        }
        psp
    }

    fn ecosystem(
        platforms: Vec<DataPlatform>,
        datastores: Vec<Datastore>,
        workspaces: Vec<Workspace>,
    ) -> Ecosystem {
        let mut vendor = InfrastructureVendor::new("MyCorp", CloudVendor::Private);
        vendor.add_location(&["USA", "NY_1"]);

        let mut builder = Ecosystem::builder("Demo", repo("main_edit"))
            .live_repository(repo("main"))
            .runtime_declaration(RuntimeDeclaration::new("demo", repo("demo_rte_edit")))
            .vendor(vendor);
        for store in datastores {
            builder = builder.datastore(store);
        }
        for ws in workspaces {
            builder = builder.workspace(ws);
        }
        let mut eco = builder.build().unwrap();

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
        env.set_psp(psp(platforms)).unwrap();

        let tree = eco.lint_and_hydrate_caches();
        assert!(!tree.has_errors(), "fixture should lint clean:\n{tree}");
        eco
    }

    fn orders_store() -> Datastore {
        Datastore::new("orders").dataset(Dataset::new("order_lines"))
    }

    #[test]
    fn test_platform_without_consumers_has_absent_root() {
        let eco = ecosystem(
            vec![DataPlatform::new("SCD2", DataMilestoningStrategy::Scd2)
                .staging_batches_to_keep(5)],
            vec![],
            vec![],
        );
        let outcome = PipelineGraphBuilder::new(&eco).build().unwrap();

        assert!(outcome.graph.roots.contains_key("SCD2"));
        assert!(outcome.graph.roots.get("SCD2").unwrap().is_none());
        assert!(!outcome.problems.has_errors());
    }

    #[test]
    fn test_build_before_hydration_is_a_contract_error() {
        let mut vendor = InfrastructureVendor::new("MyCorp", CloudVendor::Private);
        vendor.add_location(&["USA", "NY_1"]);
        let eco = Ecosystem::builder("Demo", repo("main_edit"))
            .vendor(vendor)
            .build()
            .unwrap();

        let err = PipelineGraphBuilder::new(&eco).build().unwrap_err();
        assert!(matches!(err, GraphError::NotHydrated));
    }

    #[test]
    fn test_live_only_emits_single_ingest_stage() {
        let eco = ecosystem(
            vec![DataPlatform::new("Live", DataMilestoningStrategy::LiveOnly)],
            vec![orders_store()],
            vec![Workspace::new("reporting", "Live")
                .sink(DatasetRef::new("orders", "order_lines"))],
        );
        let outcome = PipelineGraphBuilder::new(&eco).build().unwrap();
        let graph = outcome.graph.roots.get("Live").unwrap().as_ref().unwrap();

        assert_eq!(
            graph.node_set(),
            ["datastore/orders/ingest", "workspace/reporting"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        );
        assert_eq!(
            graph.edge_set(),
            [("datastore/orders/ingest".to_string(), "workspace/reporting".to_string())]
                .into_iter()
                .collect()
        );
        assert_eq!(
            graph.stage("datastore/orders/ingest").unwrap().kind,
            StageKind::LiveIngest
        );
    }

    #[test]
    fn test_scd2_emits_capture_and_merge_stages() {
        let eco = ecosystem(
            vec![DataPlatform::new("SCD2", DataMilestoningStrategy::Scd2)
                .staging_batches_to_keep(5)],
            vec![orders_store()],
            vec![Workspace::new("reporting", "SCD2")
                .sink(DatasetRef::new("orders", "order_lines"))],
        );
        let outcome = PipelineGraphBuilder::new(&eco).build().unwrap();
        let graph = outcome.graph.roots.get("SCD2").unwrap().as_ref().unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(
            graph.stage("datastore/orders/merge").unwrap().kind,
            StageKind::ForensicMerge { batches_to_keep: 5 }
        );
        let order: Vec<_> = graph
            .execution_order()
            .unwrap()
            .into_iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(
            order,
            vec![
                "datastore/orders/capture",
                "datastore/orders/merge",
                "workspace/reporting"
            ]
        );
    }

    #[test]
    fn test_transform_output_links_workspaces() {
        let eco = ecosystem(
            vec![DataPlatform::new("Live", DataMilestoningStrategy::LiveOnly)],
            vec![
                orders_store(),
                Datastore::new("masked_orders").dataset(Dataset::new("order_lines")),
            ],
            vec![
                Workspace::new("masking", "Live")
                    .sink(DatasetRef::new("orders", "order_lines"))
                    .transform_output("masked_orders"),
                Workspace::new("reporting", "Live")
                    .sink(DatasetRef::new("masked_orders", "order_lines")),
            ],
        );
        let outcome = PipelineGraphBuilder::new(&eco).build().unwrap();
        let graph = outcome.graph.roots.get("Live").unwrap().as_ref().unwrap();

        // masked_orders is produced by the masking workspace, so reporting
        // hangs off workspace/masking, not off an ingest stage.
        assert!(graph
            .edge_set()
            .contains(&("workspace/masking".to_string(), "workspace/reporting".to_string())));
        assert!(!graph.contains_stage("datastore/masked_orders/ingest"));
    }

    #[test]
    fn test_cycle_aborts_only_that_platform() {
        let eco = ecosystem(
            vec![
                DataPlatform::new("Looped", DataMilestoningStrategy::LiveOnly),
                DataPlatform::new("Clean", DataMilestoningStrategy::LiveOnly),
            ],
            vec![
                Datastore::new("a_out").dataset(Dataset::new("rows")),
                Datastore::new("b_out").dataset(Dataset::new("rows")),
                orders_store(),
            ],
            vec![
                Workspace::new("a", "Looped")
                    .sink(DatasetRef::new("b_out", "rows"))
                    .transform_output("a_out"),
                Workspace::new("b", "Looped")
                    .sink(DatasetRef::new("a_out", "rows"))
                    .transform_output("b_out"),
                Workspace::new("clean", "Clean").sink(DatasetRef::new("orders", "order_lines")),
            ],
        );
        let outcome = PipelineGraphBuilder::new(&eco).build().unwrap();

        assert!(outcome.graph.roots.get("Looped").unwrap().is_none());
        assert!(outcome
            .problems
            .problems()
            .any(|p| p.kind == ProblemKind::CyclicDependency));
        // The clean platform is unaffected.
        assert!(outcome.graph.roots.get("Clean").unwrap().is_some());
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let eco = ecosystem(
            vec![DataPlatform::new("SCD2", DataMilestoningStrategy::Scd2)
                .staging_batches_to_keep(5)],
            vec![
                orders_store(),
                Datastore::new("payments").dataset(Dataset::new("ledger")),
            ],
            vec![
                Workspace::new("reporting", "SCD2")
                    .sink(DatasetRef::new("orders", "order_lines"))
                    .sink(DatasetRef::new("payments", "ledger")),
                Workspace::new("audit", "SCD2").sink(DatasetRef::new("payments", "ledger")),
            ],
        );

        let first = PipelineGraphBuilder::new(&eco).build().unwrap();
        let second = PipelineGraphBuilder::new(&eco).build().unwrap();

        let g1 = first.graph.roots.get("SCD2").unwrap().as_ref().unwrap();
        let g2 = second.graph.roots.get("SCD2").unwrap().as_ref().unwrap();
        assert_eq!(g1.node_set(), g2.node_set());
        assert_eq!(g1.edge_set(), g2.edge_set());
    }
}
