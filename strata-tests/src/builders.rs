//! Small helpers for constructing test objects

use std::collections::BTreeSet;
use strata_model::container::{DataContainer, HostPortPair};
use strata_model::credential::{Credential, CredentialKind};
use strata_model::documentation::PlainTextDocumentation;
use strata_model::platform::{
    DataPlatform, GitCacheConfig, PlatformAssembly, PlatformServiceProvider,
};
use strata_model::repository::GitHubRepository;
use strata_model::runtime::ProductionStatus;
use strata_model::LocationKey;

/// The monorepo all governance fragments are edited through, pinned to a
/// branch per fragment
pub fn monorepo(branch: &str) -> GitHubRepository {
    GitHubRepository::new(
        "git_username/gitrepo_name",
        branch,
        Credential::new("git", CredentialKind::ApiToken),
    )
}

/// A demo PSP serving the given data platforms from `MyCorp:USA/NY_1`
pub fn demo_psp(platforms: Vec<DataPlatform>) -> PlatformServiceProvider {
    let locations: BTreeSet<LocationKey> =
        [LocationKey::new("MyCorp:USA/NY_1")].into_iter().collect();

    let merge_container = DataContainer::postgres(
        "K8sMergeDB",
        HostPortPair::new("postgres-demo", 5432),
        "merge_db",
        locations.clone(),
        ProductionStatus::NotProduction,
    );

    let assembly = PlatformAssembly::new(
        "Demo",
        "demo1",
        GitCacheConfig::new(true, "ReadWriteMany", "longhorn"),
    )
    .scheduler_service_account("airflow-worker");

    let mut psp = PlatformServiceProvider::new(
        "Demo_PSP",
        locations,
        Credential::new("git", CredentialKind::ApiToken),
        Credential::new("postgres-demo-merge", CredentialKind::UserPassword),
        assembly,
        merge_container,
    )
    .documentation(PlainTextDocumentation::new("Demo PSP"))
    .storage_class("longhorn")
    .docker_image("strata/strata:v1.1.0");

    for platform in platforms {
        psp = psp.data_platform(platform);
    }
    psp
}
