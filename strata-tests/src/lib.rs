//! Shared test utilities for Strata crates
//!
//! This crate provides:
//! - **Fixtures**: Pre-built ecosystem definitions with sensible defaults
//! - **Builders**: Small helpers for constructing repositories, PSPs and
//!   workspaces in tests
//!
//! # Example
//!
//! ```ignore
//! use strata_tests::fixtures;
//!
//! #[test]
//! fn test_demo_model_lints_clean() {
//!     let mut eco = fixtures::demo_ecosystem();
//!     let tree = eco.lint_and_hydrate_caches();
//!     assert!(!tree.has_errors());
//! }
//! ```

pub mod builders;
pub mod fixtures;

// Re-export commonly used items
pub use builders::{demo_psp, monorepo};
pub use fixtures::{demo_ecosystem, populated_ecosystem};
