//! Pre-built ecosystem definitions
//!
//! `demo_ecosystem` mirrors the classic starter model: one private vendor
//! with a single site, a monorepo for every governance fragment, and a
//! `demo` runtime environment whose PSP carries one SCD2 data platform and
//! no workspaces at all. `populated_ecosystem` adds datastores and
//! workspaces so the pipeline graph has something to derive.

use crate::builders::{demo_psp, monorepo};
use strata_model::documentation::PlainTextDocumentation;
use strata_model::location::{CloudVendor, InfrastructureLocation, InfrastructureVendor};
use strata_model::platform::{DataMilestoningStrategy, DataPlatform, PspDeclaration};
use strata_model::release::{ReleaseType, VersionPattern, VN_N_N};
use strata_model::runtime::{ProductionStatus, RuntimeDeclaration};
use strata_model::workspace::{Dataset, DatasetRef, Datastore, Workspace};
use strata_model::{Ecosystem, VersionPatternReleaseSelector};

fn scd2_platform() -> DataPlatform {
    DataPlatform::new("SCD2", DataMilestoningStrategy::Scd2)
        .documentation(PlainTextDocumentation::new("SCD2 data platform"))
        .staging_batches_to_keep(5)
}

fn my_corp() -> InfrastructureVendor {
    InfrastructureVendor::new("MyCorp", CloudVendor::Private)
        .documentation(PlainTextDocumentation::new("Private company data centers"))
        .location(InfrastructureLocation::with_children(
            "USA",
            vec![InfrastructureLocation::new("NY_1")],
        ))
}

fn configure_demo_environment(eco: &mut Ecosystem, platforms: Vec<DataPlatform>) {
    let env = eco
        .runtime_environment_mut("demo")
        .expect("demo environment is declared");
    env.configure(
        VersionPatternReleaseSelector::new(
            VersionPattern::new(VN_N_N).suffixed("-demo"),
            ReleaseType::StableOnly,
        ),
        vec![PspDeclaration::new("Demo_PSP", env.owning_repository.clone())],
        ProductionStatus::NotProduction,
    )
    .expect("demo environment is unconfigured");
    env.set_psp(demo_psp(platforms))
        .expect("Demo_PSP is declared");
}

/// The starter model: SCD2 platform, zero workspaces
pub fn demo_ecosystem() -> Ecosystem {
    let mut eco = Ecosystem::builder("Demo", monorepo("main_edit"))
        .live_repository(monorepo("main"))
        .runtime_declaration(RuntimeDeclaration::new("demo", monorepo("demo_rte_edit")))
        .vendor(my_corp())
        .build()
        .expect("declarations do not conflict");
    configure_demo_environment(&mut eco, vec![scd2_platform()]);
    eco
}

/// The starter model plus datastores and workspaces on two platforms
pub fn populated_ecosystem() -> Ecosystem {
    let mut eco = Ecosystem::builder("Demo", monorepo("main_edit"))
        .live_repository(monorepo("main"))
        .runtime_declaration(RuntimeDeclaration::new("demo", monorepo("demo_rte_edit")))
        .vendor(my_corp())
        .datastore(
            Datastore::new("orders")
                .documentation(PlainTextDocumentation::new("Order capture source"))
                .dataset(Dataset::new("order_lines"))
                .dataset(Dataset::new("customers")),
        )
        .datastore(
            Datastore::new("masked_orders")
                .documentation(PlainTextDocumentation::new("Masked order data"))
                .dataset(Dataset::new("order_lines")),
        )
        .workspace(
            Workspace::new("masking", "SCD2")
                .documentation(PlainTextDocumentation::new("Masks raw order data"))
                .sink(DatasetRef::new("orders", "order_lines"))
                .transform_output("masked_orders"),
        )
        .workspace(
            Workspace::new("reporting", "Live")
                .documentation(PlainTextDocumentation::new("Consumes masked orders"))
                .sink(DatasetRef::new("masked_orders", "order_lines")),
        )
        .build()
        .expect("declarations do not conflict");

    configure_demo_environment(
        &mut eco,
        vec![
            scd2_platform(),
            DataPlatform::new("Live", DataMilestoningStrategy::LiveOnly)
                .documentation(PlainTextDocumentation::new("Live-only data platform")),
        ],
    );
    eco
}
