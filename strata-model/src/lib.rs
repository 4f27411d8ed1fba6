//! # Strata Model
//!
//! Declarative ecosystem metadata model for data platforms: infrastructure
//! vendors and locations, named credentials, governance repositories,
//! runtime environments, platform service providers, data platforms,
//! datastores and workspaces.
//!
//! The model is built once from a definition function, then validated and
//! hydrated in a single pass that collects every problem into a
//! [`ValidationTree`] instead of stopping at the first defect. The core is
//! purely in-memory: no network calls, no disk I/O, no secret resolution.

pub mod container;
pub mod credential;
pub mod documentation;
pub mod ecosystem;
pub mod loader;
pub mod location;
pub mod platform;
pub mod release;
pub mod repository;
pub mod runtime;
pub mod validation;
pub mod workspace;

// Re-export commonly used types
pub use container::{DataContainer, DataContainerKind, HostPortPair};
pub use credential::{Credential, CredentialKind};
pub use documentation::PlainTextDocumentation;
pub use ecosystem::{Ecosystem, EcosystemBuilder, EcosystemError};
pub use loader::load_ecosystem;
pub use location::{
    CloudVendor, InfrastructureLocation, InfrastructureVendor, LocationKey, PATH_SEPARATOR,
    VENDOR_SEPARATOR,
};
pub use platform::{
    DataMilestoningStrategy, DataPlatform, GitCacheConfig, PlatformAssembly,
    PlatformServiceProvider, PspDeclaration,
};
pub use release::{
    PatternMatch, ReleaseType, VersionPattern, VersionPatternReleaseSelector, VN_N_N,
};
pub use repository::GitHubRepository;
pub use runtime::{
    ProductionStatus, RuntimeDeclaration, RuntimeEnvironment, RuntimeEnvironmentState,
    RuntimeError,
};
pub use validation::{Problem, ProblemKind, Severity, TreeHandle, ValidationTree};
pub use workspace::{Dataset, DatasetRef, Datastore, Workspace};

/// Result type for model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for model operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Ecosystem error: {0}")]
    Ecosystem(#[from] EcosystemError),

    #[error("Runtime environment error: {0}")]
    Runtime(#[from] RuntimeError),
}
