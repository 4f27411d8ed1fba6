//! Governance repositories
//!
//! A repository is the versioned source of truth for a fragment of the
//! model, pinned to one branch. Two repositories are the same governance
//! source when their identifier and branch match; the credential used to
//! reach them is deliberately excluded from equality.

use crate::credential::Credential;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A GitHub repository bound to a single branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepository {
    /// `owner/name` identifier of the repository
    pub identifier: String,

    /// Branch this governance source is pinned to
    pub branch: String,

    /// Credential used to access the repository, referenced by name only
    pub credential: Credential,
}

impl GitHubRepository {
    /// Create a repository reference
    pub fn new(
        identifier: impl Into<String>,
        branch: impl Into<String>,
        credential: Credential,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            branch: branch.into(),
            credential,
        }
    }
}

// Equality is by (identifier, branch); the credential is access detail.
impl PartialEq for GitHubRepository {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.branch == other.branch
    }
}

impl Eq for GitHubRepository {}

impl Hash for GitHubRepository {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
        self.branch.hash(state);
    }
}

impl std::fmt::Display for GitHubRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.identifier, self.branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::CredentialKind;

    fn cred(name: &str) -> Credential {
        Credential::new(name, CredentialKind::ApiToken)
    }

    #[test]
    fn test_equality_ignores_credential() {
        let a = GitHubRepository::new("acme/model", "main", cred("git"));
        let b = GitHubRepository::new("acme/model", "main", cred("other"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_distinguishes_branch() {
        let a = GitHubRepository::new("acme/model", "main", cred("git"));
        let b = GitHubRepository::new("acme/model", "demo_rte_edit", cred("git"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let repo = GitHubRepository::new("acme/model", "main", cred("git"));
        assert_eq!(repo.to_string(), "acme/model@main");
    }
}
