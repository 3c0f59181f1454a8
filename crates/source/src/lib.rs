//! # Claimscan Source
//!
//! Provenance claims from Python docstrings.
//!
//! ## Overview
//!
//! ```text
//! .py / .pyi files
//!     │
//!     ├──> SourceParser (tree-sitter)  → SyntaxNode tree   [ParseCache]
//!     │
//!     ├──> walk_docstrings()           → (ScopePath, DocString)
//!     │
//!     └──> ProvenanceMatcher           → ClaimDraft per claim-bearing sentence
//! ```
//!
//! Only documentation blocks are read: the first statement of a module, class or
//! function when it is a plain string literal. Each claim carries the full scope
//! of the definition that owns its docstring, e.g.
//! `module:class:Foo:function:bar:function:helper`.
//!
//! ## Example
//!
//! ```rust
//! use claimscan_source::{SourceClaimExtractor, SourceConfig};
//!
//! let extractor = SourceClaimExtractor::new(SourceConfig::default()).unwrap();
//! let source = "def step():\n    \"\"\"Adapted from Hartley and Zisserman (2004).\"\"\"\n";
//! let drafts = extractor.extract_str(source, "geometry.py").unwrap();
//! assert_eq!(drafts[0].scope, "module:function:step");
//! assert_eq!(drafts[0].confidence.value(), 0.8);
//! ```

mod cache;
mod config;
mod error;
mod extractor;
mod provenance;
mod syntax;
mod tree_sitter_parser;
mod visitor;

pub use cache::{ParseCache, PARSE_CACHE_SCHEMA_VERSION};
pub use config::SourceConfig;
pub use error::{Result, SourceError};
pub use extractor::SourceClaimExtractor;
pub use provenance::{classify_source, ProvenanceMatch, ProvenanceMatcher, SourceClass};
pub use syntax::{DocString, SourceParser, SyntaxNode};
pub use tree_sitter_parser::TreeSitterParser;
pub use visitor::walk_docstrings;
