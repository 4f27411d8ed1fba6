//! Datastores, datasets and workspaces
//!
//! Datastores are the sources data is captured from; each serves a set of
//! named datasets. Workspaces are the consumers: they pick a data platform
//! and declare sinks on datasets, and may produce a datastore of their own
//! through a transform, which is how downstream workspaces can depend on
//! upstream ones (and how dependency cycles can be declared).

use crate::documentation::PlainTextDocumentation;
use serde::{Deserialize, Serialize};

/// A named dataset served by a datastore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name, unique within its datastore
    pub name: String,

    /// Documentation for the dataset
    pub documentation: Option<PlainTextDocumentation>,
}

impl Dataset {
    /// Create a dataset
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
        }
    }

    /// Attach documentation
    pub fn documentation(mut self, doc: PlainTextDocumentation) -> Self {
        self.documentation = Some(doc);
        self
    }
}

/// A source of datasets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datastore {
    /// Datastore name, unique within the ecosystem
    pub name: String,

    /// Documentation for the datastore
    pub documentation: Option<PlainTextDocumentation>,

    /// Datasets this store serves
    pub datasets: Vec<Dataset>,
}

impl Datastore {
    /// Create a datastore with no datasets
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            datasets: Vec::new(),
        }
    }

    /// Attach documentation
    pub fn documentation(mut self, doc: PlainTextDocumentation) -> Self {
        self.documentation = Some(doc);
        self
    }

    /// Add a dataset
    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    /// Whether the store serves a dataset with the given name
    pub fn has_dataset(&self, name: &str) -> bool {
        self.datasets.iter().any(|d| d.name == name)
    }
}

/// A by-name reference to one dataset in one datastore
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetRef {
    /// Name of the datastore
    pub datastore: String,

    /// Name of the dataset within the store
    pub dataset: String,
}

impl DatasetRef {
    /// Create a dataset reference
    pub fn new(datastore: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            datastore: datastore.into(),
            dataset: dataset.into(),
        }
    }
}

impl std::fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.datastore, self.dataset)
    }
}

/// A consumer of datasets through one data platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Workspace name, unique within the ecosystem
    pub name: String,

    /// Documentation for the workspace
    pub documentation: Option<PlainTextDocumentation>,

    /// Name of the data platform serving this workspace's sinks
    pub platform: String,

    /// Dataset dependencies
    pub sinks: Vec<DatasetRef>,

    /// Datastore produced by this workspace's transform, if any
    pub transform_output: Option<String>,
}

impl Workspace {
    /// Create a workspace served by the named platform
    pub fn new(name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            platform: platform.into(),
            sinks: Vec::new(),
            transform_output: None,
        }
    }

    /// Attach documentation
    pub fn documentation(mut self, doc: PlainTextDocumentation) -> Self {
        self.documentation = Some(doc);
        self
    }

    /// Add a sink on a dataset
    pub fn sink(mut self, sink: DatasetRef) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Declare the datastore this workspace's transform produces
    pub fn transform_output(mut self, datastore: impl Into<String>) -> Self {
        self.transform_output = Some(datastore.into());
        self
    }
}
