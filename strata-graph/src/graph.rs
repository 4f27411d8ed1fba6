//! Pipeline graph data structures

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Kind of processing a pipeline stage performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageKind {
    /// Ingest the current state of a datastore (live-only milestoning)
    LiveIngest,

    /// Capture raw change batches from a datastore (forensic milestoning)
    ForensicCapture,

    /// Merge captured batches into full SCD2 history
    ForensicMerge {
        /// Historical staging batches retained by the merge
        batches_to_keep: u32,
    },

    /// Materialize a workspace's dataset dependencies
    WorkspaceMaterialize,
}

/// One stage of a data-movement pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStage {
    /// Stage name, unique within its platform graph
    pub name: String,

    /// Processing kind
    pub kind: StageKind,

    /// Data platform the stage runs on
    pub platform: String,
}

/// A dependency edge between two pipeline stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineEdge {
    /// Edge classification, e.g. `dependency` or `milestone`
    pub edge_type: String,
}

/// The derived pipeline graph for one data platform
#[derive(Debug)]
pub struct PlatformPipelineGraph {
    platform: String,
    graph: DiGraph<PipelineStage, PipelineEdge>,
    stage_index: BTreeMap<String, NodeIndex>,
}

impl PlatformPipelineGraph {
    /// Create an empty graph for a platform
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            graph: DiGraph::new(),
            stage_index: BTreeMap::new(),
        }
    }

    /// The platform this graph belongs to
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Add a stage, reusing an existing node with the same name
    pub fn ensure_stage(&mut self, stage: PipelineStage) -> NodeIndex {
        if let Some(idx) = self.stage_index.get(&stage.name) {
            return *idx;
        }
        let name = stage.name.clone();
        let idx = self.graph.add_node(stage);
        self.stage_index.insert(name, idx);
        idx
    }

    /// Add an edge between two named stages, deduplicating parallel edges
    pub fn ensure_edge(
        &mut self,
        from: &str,
        to: &str,
        edge_type: impl Into<String>,
    ) -> Result<(), crate::GraphError> {
        let from_idx = *self
            .stage_index
            .get(from)
            .ok_or_else(|| crate::GraphError::StageNotFound(from.to_string()))?;
        let to_idx = *self
            .stage_index
            .get(to)
            .ok_or_else(|| crate::GraphError::StageNotFound(to.to_string()))?;

        if self.graph.find_edge(from_idx, to_idx).is_none() {
            self.graph.add_edge(
                from_idx,
                to_idx,
                PipelineEdge {
                    edge_type: edge_type.into(),
                },
            );
        }
        Ok(())
    }

    /// Look up a stage by name
    pub fn stage(&self, name: &str) -> Option<&PipelineStage> {
        self.stage_index.get(name).map(|idx| &self.graph[*idx])
    }

    /// Whether a stage with the given name exists
    pub fn contains_stage(&self, name: &str) -> bool {
        self.stage_index.contains_key(name)
    }

    /// Total number of stages
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph contains a cycle
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Stage names of the direct upstream producers of a stage
    pub fn upstream_of(&self, name: &str) -> Vec<&str> {
        match self.stage_index.get(name) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, petgraph::Direction::Incoming)
                .map(|up| self.graph[up].name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Stages in a valid execution order (producers before consumers)
    pub fn execution_order(&self) -> Result<Vec<&PipelineStage>, crate::GraphError> {
        petgraph::algo::toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|idx| &self.graph[idx]).collect())
            .map_err(|cycle| {
                crate::GraphError::CyclicGraph(self.graph[cycle.node_id()].name.clone())
            })
    }

    /// The set of stage names, for structural comparison
    pub fn node_set(&self) -> BTreeSet<String> {
        self.stage_index.keys().cloned().collect()
    }

    /// The set of (from, to) stage-name pairs, for structural comparison
    pub fn edge_set(&self) -> BTreeSet<(String, String)> {
        self.graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(a, b)| (self.graph[a].name.clone(), self.graph[b].name.clone()))
            .collect()
    }
}
