//! # Strata Graph
//!
//! Pipeline-graph compiler for Strata ecosystems: derives, per data
//! platform, the dependency graph of data-movement pipeline stages needed
//! to satisfy declared workspace dependencies.

pub mod builder;
pub mod graph;

// Re-export commonly used types
pub use builder::{EcosystemPipelineGraph, GraphBuildOutcome, PipelineGraphBuilder};
pub use graph::{PipelineEdge, PipelineStage, PlatformPipelineGraph, StageKind};

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error types for graph operations
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("pipeline graph requested before a successful hydration pass")]
    NotHydrated,

    #[error("stage not found: {0}")]
    StageNotFound(String),

    #[error("graph contains a cycle through stage '{0}'")]
    CyclicGraph(String),
}
