//! Documentation attached to model entities

use serde::{Deserialize, Serialize};

/// Plain-text documentation for a model entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainTextDocumentation {
    /// The documentation text
    pub text: String,
}

impl PlainTextDocumentation {
    /// Create documentation from a string
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl std::fmt::Display for PlainTextDocumentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documentation_display() {
        let doc = PlainTextDocumentation::new("Private company data centers");
        assert_eq!(doc.to_string(), "Private company data centers");
    }
}
