//! Validation tree
//!
//! A recursive accumulation structure for data-validation problems. Every
//! validating component receives (or opens) a subtree, appends problem
//! records, and returns control to its caller regardless of findings, so a
//! single pass over a large declarative graph reports the complete defect
//! set instead of stopping at the first one.
//!
//! The tree is arena-backed: nodes live in a `Vec` and are addressed by
//! [`TreeHandle`] indices, which keeps the structure strictly hierarchical
//! with no ownership cycles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a recorded problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// The declaration is defective and blocks graph compilation
    Error,

    /// Worth surfacing, but the pass is still considered successful
    Warning,
}

/// Classification of a validation problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemKind {
    /// Two declarations resolve to the same key or name
    DuplicateKey,

    /// A declared entity could not be found
    NotFound,

    /// A by-name cross-reference does not resolve
    UnresolvedReference,

    /// Conflicting declarations for the same governed entity
    ConfigurationConflict,

    /// The derived pipeline graph contains a cycle
    CyclicDependency,

    /// A release pattern cannot match any eligible release
    UnmatchedReleasePattern,

    /// A field value is outside its allowed range or shape
    InvalidValue,

    /// An entity that should carry documentation does not
    MissingDocumentation,
}

/// A single recorded problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Severity of the problem
    pub severity: Severity,

    /// Problem classification
    pub kind: ProblemKind,

    /// Human-readable description
    pub message: String,
}

/// Index-based handle to a node in a [`ValidationTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeHandle(usize);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    label: String,
    parent: Option<usize>,
    children: Vec<usize>,
    problems: Vec<Problem>,
}

/// Arena-backed recursive problem collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationTree {
    nodes: Vec<Node>,
}

impl ValidationTree {
    /// Create a tree with a single root node; never fails
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                label: root_label.into(),
                parent: None,
                children: Vec::new(),
                problems: Vec::new(),
            }],
        }
    }

    /// Handle of the root node
    pub fn root(&self) -> TreeHandle {
        TreeHandle(0)
    }

    /// Open a child subtree under `parent`
    pub fn child(&mut self, parent: TreeHandle, label: impl Into<String>) -> TreeHandle {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            label: label.into(),
            parent: Some(parent.0),
            children: Vec::new(),
            problems: Vec::new(),
        });
        self.nodes[parent.0].children.push(idx);
        TreeHandle(idx)
    }

    /// Record a problem under `handle`
    pub fn problem(
        &mut self,
        handle: TreeHandle,
        severity: Severity,
        kind: ProblemKind,
        message: impl Into<String>,
    ) {
        self.nodes[handle.0].problems.push(Problem {
            severity,
            kind,
            message: message.into(),
        });
    }

    /// Record an ERROR under `handle`
    pub fn error(&mut self, handle: TreeHandle, kind: ProblemKind, message: impl Into<String>) {
        self.problem(handle, Severity::Error, kind, message);
    }

    /// Record a WARNING under `handle`
    pub fn warning(&mut self, handle: TreeHandle, kind: ProblemKind, message: impl Into<String>) {
        self.problem(handle, Severity::Warning, kind, message);
    }

    /// Whether any node in the subtree under `handle` carries an ERROR
    pub fn has_errors_under(&self, handle: TreeHandle) -> bool {
        self.any_under(handle.0, Severity::Error)
    }

    /// Whether any node in the whole tree carries an ERROR
    pub fn has_errors(&self) -> bool {
        self.has_errors_under(self.root())
    }

    /// Whether any node in the whole tree carries a WARNING
    pub fn has_warnings(&self) -> bool {
        self.any_under(0, Severity::Warning)
    }

    /// Total number of ERROR records in the tree
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Total number of WARNING records in the tree
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Iterate over every recorded problem, depth-first
    pub fn problems(&self) -> impl Iterator<Item = &Problem> {
        // Depth-first order matches render order because children are
        // appended in declaration order.
        DepthFirst::new(self).flat_map(|idx| self.nodes[idx].problems.iter())
    }

    /// Render an indented report of the tree. Read-only and idempotent.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(0, 0, &mut out);
        out
    }

    /// Log the rendered report line by line
    pub fn print_tree(&self) {
        for line in self.render().lines() {
            tracing::info!("{line}");
        }
    }

    fn render_node(&self, idx: usize, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let node = &self.nodes[idx];
        out.push_str(&format!("{indent}{}\n", node.label));
        for problem in &node.problems {
            let severity = match problem.severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARNING",
            };
            out.push_str(&format!(
                "{indent}  {severity}[{:?}]: {}\n",
                problem.kind, problem.message
            ));
        }
        for child in &node.children {
            self.render_node(*child, depth + 1, out);
        }
    }

    fn any_under(&self, idx: usize, severity: Severity) -> bool {
        let node = &self.nodes[idx];
        node.problems.iter().any(|p| p.severity == severity)
            || node
                .children
                .iter()
                .any(|child| self.any_under(*child, severity))
    }

    fn count(&self, severity: Severity) -> usize {
        self.nodes
            .iter()
            .flat_map(|n| n.problems.iter())
            .filter(|p| p.severity == severity)
            .count()
    }
}

struct DepthFirst<'a> {
    tree: &'a ValidationTree,
    stack: Vec<usize>,
}

impl<'a> DepthFirst<'a> {
    fn new(tree: &'a ValidationTree) -> Self {
        Self {
            tree,
            stack: vec![0],
        }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let idx = self.stack.pop()?;
        // Push children in reverse so the leftmost child is visited first.
        for child in self.tree.nodes[idx].children.iter().rev() {
            self.stack.push(*child);
        }
        Some(idx)
    }
}

impl fmt::Display for ValidationTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
