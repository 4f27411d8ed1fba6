//! Runtime environments
//!
//! A runtime environment is a named deployable target such as `demo`. Its
//! lifecycle is an explicit state machine: declared but unconfigured,
//! configured with a release selector and PSP declarations, and finally
//! bound to exactly one platform service provider. Misusing the lifecycle
//! is a contract violation and fails immediately; it never lands in a
//! validation tree.

use crate::platform::{PlatformServiceProvider, PspDeclaration};
use crate::release::VersionPatternReleaseSelector;
use crate::repository::GitHubRepository;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a target serves production traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionStatus {
    /// Serves production traffic
    Production,

    /// Development, demo or staging use
    NotProduction,
}

/// Announces a named runtime environment and its editing repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeDeclaration {
    /// Environment name, unique within the ecosystem
    pub name: String,

    /// Repository through which this environment's fragment is edited
    pub repository: GitHubRepository,
}

impl RuntimeDeclaration {
    /// Create a runtime declaration
    pub fn new(name: impl Into<String>, repository: GitHubRepository) -> Self {
        Self {
            name: name.into(),
            repository,
        }
    }
}

/// Errors from misuse of the runtime environment lifecycle
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("runtime environment '{0}' is already configured with different settings")]
    AlreadyConfigured(String),

    #[error("PSP '{psp}' was not declared for runtime environment '{environment}'")]
    UnknownPsp { environment: String, psp: String },

    #[error("runtime environment '{0}' must be configured before a PSP can be bound")]
    NotConfigured(String),
}

/// Lifecycle state of a runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeEnvironmentState {
    /// Declared but not yet configured
    Unconfigured,

    /// Release selector and PSP declarations are set
    Configured,

    /// A platform service provider is bound
    PspBound,
}

/// A deployable target with a governed lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeEnvironment {
    /// Environment name
    pub name: String,

    /// Repository that owns edits to this environment
    pub owning_repository: GitHubRepository,

    state: RuntimeEnvironmentState,
    release_selector: Option<VersionPatternReleaseSelector>,
    psp_declarations: Vec<PspDeclaration>,
    production_status: ProductionStatus,
    psp: Option<PlatformServiceProvider>,
}

impl RuntimeEnvironment {
    /// Materialize an environment from its declaration
    pub fn from_declaration(declaration: &RuntimeDeclaration) -> Self {
        Self {
            name: declaration.name.clone(),
            owning_repository: declaration.repository.clone(),
            state: RuntimeEnvironmentState::Unconfigured,
            release_selector: None,
            psp_declarations: Vec::new(),
            production_status: ProductionStatus::NotProduction,
            psp: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RuntimeEnvironmentState {
        self.state
    }

    /// Release selector, once configured
    pub fn release_selector(&self) -> Option<&VersionPatternReleaseSelector> {
        self.release_selector.as_ref()
    }

    /// Declared PSPs
    pub fn psp_declarations(&self) -> &[PspDeclaration] {
        &self.psp_declarations
    }

    /// Production status, once configured
    pub fn production_status(&self) -> ProductionStatus {
        self.production_status
    }

    /// The bound PSP, if any
    pub fn psp(&self) -> Option<&PlatformServiceProvider> {
        self.psp.as_ref()
    }

    /// Configure the environment with a release selector, the PSPs that may
    /// govern it, and its production status.
    ///
    /// Transitions `Unconfigured -> Configured`. Re-configuring with the
    /// same selector, declarations and status is a no-op so definition
    /// functions can run more than once; any changed argument fails with
    /// `AlreadyConfigured`.
    pub fn configure(
        &mut self,
        selector: VersionPatternReleaseSelector,
        declarations: Vec<PspDeclaration>,
        production_status: ProductionStatus,
    ) -> Result<(), RuntimeError> {
        if self.state != RuntimeEnvironmentState::Unconfigured {
            let unchanged = self.release_selector.as_ref() == Some(&selector)
                && self.psp_declarations == declarations
                && self.production_status == production_status;
            return if unchanged {
                Ok(())
            } else {
                Err(RuntimeError::AlreadyConfigured(self.name.clone()))
            };
        }

        self.release_selector = Some(selector);
        self.psp_declarations = declarations;
        self.production_status = production_status;
        self.state = RuntimeEnvironmentState::Configured;
        Ok(())
    }

    /// Bind a platform service provider.
    ///
    /// Requires a configured environment and a PSP whose name appears among
    /// the declared PSPs. Transitions to `PspBound`; binding again replaces
    /// the previous provider, keeping exactly one active PSP.
    pub fn set_psp(&mut self, psp: PlatformServiceProvider) -> Result<(), RuntimeError> {
        if self.state == RuntimeEnvironmentState::Unconfigured {
            return Err(RuntimeError::NotConfigured(self.name.clone()));
        }

        let declared = self
            .psp_declarations
            .iter()
            .any(|decl| decl.psp_name == psp.name);
        if !declared {
            return Err(RuntimeError::UnknownPsp {
                environment: self.name.clone(),
                psp: psp.name,
            });
        }

        self.psp = Some(psp);
        self.state = RuntimeEnvironmentState::PspBound;
        Ok(())
    }
}
