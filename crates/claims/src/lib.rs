//! # Claimscan Claims
//!
//! Shared claim model for the claimscan pipeline.
//!
//! ## Overview
//!
//! Both extractors emit [`ClaimRecord`]s and the merger consumes them. This crate owns
//! everything the two sides must agree on:
//!
//! ```text
//! ClaimDraft (per file, no id)
//!     │
//!     ├──> sequence_claims()  → ClaimRecord[] with ordered ids
//!     │
//!     └──> ClaimBatch         → JSON artifact (+ RunSummary)
//!
//! ScopePath        "module:class:Foo:function:bar"
//! CitationDetector [12], 10.1145/..., (Smith 2020), arXiv:2101.00001
//! ```
//!
//! It also carries the two pieces of plumbing both extractors share: a
//! gitignore-aware [`FileScanner`] and [`process_files`], which fans file work out
//! over blocking tasks while keeping results in input order.
//!
//! ## Example
//!
//! ```rust
//! use claimscan_claims::{ScopeFrame, ScopePath};
//!
//! let mut scope = ScopePath::module();
//! scope.push(ScopeFrame::class("Foo"));
//! scope.push(ScopeFrame::function("bar"));
//! assert_eq!(scope.to_string(), "module:class:Foo:function:bar");
//! assert_eq!(ScopePath::parse("module:class:Foo:function:bar").unwrap().depth(), 3);
//! ```

mod batch;
mod citation;
mod error;
mod runner;
mod scanner;
mod scope;
mod text;
mod types;

pub use batch::{sequence_claims, ClaimBatch, RunSummary, SkippedFile, CLAIM_BATCH_SCHEMA_VERSION};
pub use citation::{CitationDetector, CitationKind, CitationMatch};
pub use error::{ClaimsError, Result};
pub use runner::{default_concurrency, process_files, FileJob, BUDGET_EXCEEDED_REASON};
pub use scanner::FileScanner;
pub use scope::{ScopeFrame, ScopePath, SCOPE_SEPARATOR};
pub use text::{collapse_whitespace, comparison_key, sentences, token_set_similarity, Sentence};
pub use types::{
    ClaimDraft, ClaimId, ClaimKind, ClaimRecord, Confidence, Location, Origin, Priority,
};
