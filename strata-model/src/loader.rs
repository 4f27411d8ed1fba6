//! Ecosystem loading
//!
//! The caller hands over the definition function explicitly; there is no
//! convention-based module discovery. Given an optional runtime-environment
//! name, the loader verifies the environment exists and has a PSP bound,
//! then runs the lint/hydrate pass and returns the ecosystem together with
//! the full validation tree.

use crate::ecosystem::{Ecosystem, EcosystemError};
use crate::validation::ValidationTree;
use tracing::{info, warn};

/// Build, check and hydrate an ecosystem from a definition function.
///
/// Validation problems are returned in the tree, not as an `Err`; the `Err`
/// path is reserved for contract violations such as naming an undeclared
/// runtime environment.
pub fn load_ecosystem<F>(
    define: F,
    runtime_environment: Option<&str>,
) -> Result<(Ecosystem, ValidationTree), EcosystemError>
where
    F: FnOnce() -> Ecosystem,
{
    let mut ecosystem = define();
    info!(ecosystem = %ecosystem.name, "loaded ecosystem definition");

    if let Some(name) = runtime_environment {
        let environment = ecosystem.runtime_environment(name)?;
        if environment.psp().is_none() {
            warn!(
                environment = name,
                "selected runtime environment has no PSP bound"
            );
        }
    }

    let tree = ecosystem.lint_and_hydrate_caches();
    if tree.has_errors() {
        warn!(ecosystem = %ecosystem.name, "ecosystem validation found errors");
    }
    Ok((ecosystem, tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{Credential, CredentialKind};
    use crate::location::{CloudVendor, InfrastructureVendor};
    use crate::repository::GitHubRepository;
    use crate::runtime::RuntimeDeclaration;

    fn repo(branch: &str) -> GitHubRepository {
        GitHubRepository::new(
            "acme/model",
            branch,
            Credential::new("git", CredentialKind::ApiToken),
        )
    }

    fn define() -> Ecosystem {
        let mut vendor = InfrastructureVendor::new("MyCorp", CloudVendor::Private);
        vendor.add_location(&["USA", "NY_1"]);
        Ecosystem::builder("Demo", repo("main_edit"))
            .live_repository(repo("main"))
            .runtime_declaration(RuntimeDeclaration::new("demo", repo("demo_rte_edit")))
            .vendor(vendor)
            .build()
            .expect("builder should succeed")
    }

    #[test]
    fn test_load_without_environment_selection() {
        let (eco, tree) = load_ecosystem(define, None).unwrap();
        assert!(!tree.has_errors());
        assert!(eco.is_hydrated());
    }

    #[test]
    fn test_load_with_declared_environment() {
        let (eco, tree) = load_ecosystem(define, Some("demo")).unwrap();
        assert!(!tree.has_errors());
        assert!(eco.runtime_environment("demo").is_ok());
    }

    #[test]
    fn test_load_with_undeclared_environment_fails_hard() {
        let err = load_ecosystem(define, Some("prod")).unwrap_err();
        assert_eq!(
            err,
            EcosystemError::RuntimeEnvironmentNotFound("prod".to_string())
        );
    }
}
