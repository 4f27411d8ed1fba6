//! Data platforms and platform service providers
//!
//! A [`DataPlatform`] is one named processing-engine instance with a
//! milestoning strategy. A [`PlatformServiceProvider`] binds a runtime
//! environment to concrete merge/staging infrastructure and carries one or
//! more data platforms. The actual cloud assembly (Kubernetes, Airflow,
//! Helm) is an external collaborator; here it is only described.

use crate::container::{DataContainer, HostPortPair};
use crate::credential::Credential;
use crate::documentation::PlainTextDocumentation;
use crate::location::LocationKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Policy for retaining historical versions of data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataMilestoningStrategy {
    /// Only the current state of each record is kept
    LiveOnly,

    /// Full history is kept via SCD2-style forensic milestoning
    Scd2,
}

/// A named processing engine instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPlatform {
    /// Platform name, unique within its PSP
    pub name: String,

    /// Documentation for the platform
    pub documentation: Option<PlainTextDocumentation>,

    /// How history is retained for data flowing through this platform
    pub milestoning_strategy: DataMilestoningStrategy,

    /// Number of historical staging batches retained; must be at least 1
    pub staging_batches_to_keep: u32,
}

impl DataPlatform {
    /// Create a platform retaining a single staging batch
    pub fn new(name: impl Into<String>, milestoning_strategy: DataMilestoningStrategy) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            milestoning_strategy,
            staging_batches_to_keep: 1,
        }
    }

    /// Attach documentation
    pub fn documentation(mut self, doc: PlainTextDocumentation) -> Self {
        self.documentation = Some(doc);
        self
    }

    /// Set how many staging batches to keep
    pub fn staging_batches_to_keep(mut self, batches: u32) -> Self {
        self.staging_batches_to_keep = batches;
        self
    }
}

/// Git cache volume configuration for a platform assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitCacheConfig {
    /// Whether the cache volume is provisioned
    pub enabled: bool,

    /// Volume access mode, e.g. `ReadWriteMany`
    pub access_mode: String,

    /// Storage class backing the volume
    pub storage_class: String,
}

impl GitCacheConfig {
    /// Create a cache configuration
    pub fn new(enabled: bool, access_mode: impl Into<String>, storage_class: impl Into<String>) -> Self {
        Self {
            enabled,
            access_mode: access_mode.into(),
            storage_class: storage_class.into(),
        }
    }
}

/// Descriptor of the concrete assembly an external collaborator provisions.
///
/// Values are already resolved by the caller; the model never reads the
/// process environment to fill them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformAssembly {
    /// Assembly name
    pub name: String,

    /// Target namespace, e.g. a Kubernetes namespace
    pub namespace: String,

    /// Endpoint of an externally managed scheduler database, when one is used
    pub scheduler_endpoint: Option<HostPortPair>,

    /// Service account the scheduler workers run as
    pub scheduler_service_account: String,

    /// Git cache volume configuration
    pub git_cache: GitCacheConfig,
}

impl PlatformAssembly {
    /// Create an assembly descriptor
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        git_cache: GitCacheConfig,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            scheduler_endpoint: None,
            scheduler_service_account: "scheduler-worker".to_string(),
            git_cache,
        }
    }

    /// Set the external scheduler database endpoint
    pub fn scheduler_endpoint(mut self, endpoint: HostPortPair) -> Self {
        self.scheduler_endpoint = Some(endpoint);
        self
    }

    /// Set the scheduler worker service account
    pub fn scheduler_service_account(mut self, account: impl Into<String>) -> Self {
        self.scheduler_service_account = account.into();
        self
    }
}

/// Declares that a named PSP governs a runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PspDeclaration {
    /// Name of the PSP
    pub psp_name: String,

    /// Repository through which the PSP's model fragment is edited
    pub repository: crate::repository::GitHubRepository,
}

impl PspDeclaration {
    /// Create a PSP declaration
    pub fn new(psp_name: impl Into<String>, repository: crate::repository::GitHubRepository) -> Self {
        Self {
            psp_name: psp_name.into(),
            repository,
        }
    }
}

/// Concrete infrastructure binding for a runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformServiceProvider {
    /// PSP name
    pub name: String,

    /// Location keys the PSP operates in; must resolve against the
    /// ecosystem's location tree
    pub locations: BTreeSet<LocationKey>,

    /// Documentation for the PSP
    pub documentation: Option<PlainTextDocumentation>,

    /// Credential used to reach governance repositories
    pub git_credential: Credential,

    /// Credential with read/write access to the merge database
    pub merge_rw_credential: Credential,

    /// Descriptor of the assembly an external collaborator provisions
    pub assembly: PlatformAssembly,

    /// The merge database container
    pub merge_container: DataContainer,

    /// Persistent volume storage class
    pub storage_class: String,

    /// Container image reference the pipelines run with
    pub docker_image: String,

    /// Data platforms this PSP provides; names unique within the PSP
    pub data_platforms: Vec<DataPlatform>,
}

impl PlatformServiceProvider {
    /// Create a PSP with no data platforms
    pub fn new(
        name: impl Into<String>,
        locations: BTreeSet<LocationKey>,
        git_credential: Credential,
        merge_rw_credential: Credential,
        assembly: PlatformAssembly,
        merge_container: DataContainer,
    ) -> Self {
        Self {
            name: name.into(),
            locations,
            documentation: None,
            git_credential,
            merge_rw_credential,
            assembly,
            merge_container,
            storage_class: String::new(),
            docker_image: String::new(),
            data_platforms: Vec::new(),
        }
    }

    /// Attach documentation
    pub fn documentation(mut self, doc: PlainTextDocumentation) -> Self {
        self.documentation = Some(doc);
        self
    }

    /// Set the persistent volume storage class
    pub fn storage_class(mut self, storage_class: impl Into<String>) -> Self {
        self.storage_class = storage_class.into();
        self
    }

    /// Set the pipeline container image reference
    pub fn docker_image(mut self, image: impl Into<String>) -> Self {
        self.docker_image = image.into();
        self
    }

    /// Add a data platform
    pub fn data_platform(mut self, platform: DataPlatform) -> Self {
        self.data_platforms.push(platform);
        self
    }
}
