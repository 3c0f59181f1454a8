//! Typed syntax tree the extractor works on.
//!
//! Only the constructs that open a scope or carry a docstring survive lowering;
//! everything else in a Python file is irrelevant to claim extraction.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A plain string literal in docstring position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocString {
    /// Literal contents without prefix or quotes, escapes left as written
    pub text: String,
    /// 1-based line of the opening quote
    pub line: usize,
}

/// Closed set of nodes produced by a [`SourceParser`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum SyntaxNode {
    Module {
        docstring: Option<DocString>,
        body: Vec<SyntaxNode>,
    },
    Class {
        name: String,
        line: usize,
        docstring: Option<DocString>,
        body: Vec<SyntaxNode>,
    },
    Function {
        name: String,
        line: usize,
        is_async: bool,
        docstring: Option<DocString>,
        body: Vec<SyntaxNode>,
    },
    /// Decorators wrap a definition without forming a scope of their own
    Decorated {
        decorators: Vec<String>,
        definition: Box<SyntaxNode>,
    },
    /// Control-flow compound holding nested definitions
    Block { body: Vec<SyntaxNode> },
}

impl SyntaxNode {
    /// Documentation block owned by this node, if it owns one
    #[must_use]
    pub fn docstring(&self) -> Option<&DocString> {
        match self {
            Self::Module { docstring, .. }
            | Self::Class { docstring, .. }
            | Self::Function { docstring, .. } => docstring.as_ref(),
            Self::Decorated { definition, .. } => definition.docstring(),
            Self::Block { .. } => None,
        }
    }

    /// Direct children in source order
    #[must_use]
    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            Self::Module { body, .. }
            | Self::Class { body, .. }
            | Self::Function { body, .. }
            | Self::Block { body } => body,
            Self::Decorated { definition, .. } => std::slice::from_ref(definition.as_ref()),
        }
    }

    /// Name of the class or function, looking through decorators
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Class { name, .. } | Self::Function { name, .. } => Some(name),
            Self::Decorated { definition, .. } => definition.name(),
            Self::Module { .. } | Self::Block { .. } => None,
        }
    }

    /// Count docstrings in the whole tree
    #[must_use]
    pub fn docstring_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if !matches!(node, Self::Decorated { .. }) && node.docstring().is_some() {
                count += 1;
            }
            pending.extend(node.children());
        }
        count
    }
}

/// Front end turning source text into a [`SyntaxNode::Module`]
///
/// Implementations must report malformed input as
/// [`SourceError::Syntax`](crate::SourceError::Syntax) rather than returning a
/// partial tree.
pub trait SourceParser: Send + Sync {
    fn parse(&self, source: &str) -> Result<SyntaxNode>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, doc: Option<&str>) -> SyntaxNode {
        SyntaxNode::Function {
            name: name.to_string(),
            line: 1,
            is_async: false,
            docstring: doc.map(|text| DocString {
                text: text.to_string(),
                line: 2,
            }),
            body: Vec::new(),
        }
    }

    #[test]
    fn test_decorated_delegates_to_definition() {
        let node = SyntaxNode::Decorated {
            decorators: vec!["staticmethod".to_string()],
            definition: Box::new(function("run", Some("Runs."))),
        };
        assert_eq!(node.name(), Some("run"));
        assert_eq!(node.docstring().map(|d| d.text.as_str()), Some("Runs."));
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn test_docstring_count_ignores_decorator_wrappers() {
        let module = SyntaxNode::Module {
            docstring: None,
            body: vec![
                SyntaxNode::Decorated {
                    decorators: vec!["cache".to_string()],
                    definition: Box::new(function("a", Some("A."))),
                },
                SyntaxNode::Block {
                    body: vec![function("b", Some("B.")), function("c", None)],
                },
            ],
        };
        assert_eq!(module.docstring_count(), 2);
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&SyntaxNode::Block { body: Vec::new() }).unwrap();
        assert_eq!(json, r#"{"node":"block","body":[]}"#);
    }
}
