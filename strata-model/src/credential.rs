//! Named credential references
//!
//! Credentials are opaque name + kind pairs. The model never resolves them
//! to live secret values; resolution is the job of an external secret store
//! that is handed the credential name at deployment time.

use serde::{Deserialize, Serialize};

/// Kind of secret a credential name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CredentialKind {
    /// An API token (e.g. a git host personal access token)
    ApiToken,

    /// A user name / password pair
    UserPassword,

    /// A client certificate
    ClientCertificate,
}

/// A named reference to a secret held elsewhere
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Credential {
    /// Name under which the secret is stored
    pub name: String,

    /// Kind of secret the name refers to
    pub kind: CredentialKind,
}

impl Credential {
    /// Create a new credential reference
    pub fn new(name: impl Into<String>, kind: CredentialKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
