//! # Claimscan Prose
//!
//! Finds formally labelled mathematical statements in markdown documents and scores
//! how completely each one is cited.
//!
//! ## Pipeline
//!
//! ```text
//! Markdown file
//!     │
//!     ├──> Line model (fences, headings, display math)
//!     │
//!     ├──> Formal pass
//!     │      ├─> Header: Theorem / Lemma / Proposition / Corollary [+ number]
//!     │      ├─> Body until blank line, header, heading or Proof marker
//!     │      └─> Indicators: numbered, cited, proof (with end marker), math block
//!     │
//!     └──> Informal pass (citation-bearing declarative sentences)
//! ```
//!
//! Confidence is `0.5 + 0.2·numbered + 0.2·cited + 0.1·proof + 0.1·math`, or a flat
//! `0.6` when no indicator fires, capped at `1.0`.
//!
//! ## Example
//!
//! ```rust
//! use claimscan_prose::{ProseClaimExtractor, ProseConfig};
//!
//! let extractor = ProseClaimExtractor::new(ProseConfig::default()).unwrap();
//! let drafts = extractor.extract_str("**Lemma 2** Every bounded sequence has a convergent subsequence.\n", "notes.md");
//! assert_eq!(drafts.len(), 1);
//! assert_eq!(drafts[0].confidence.value(), 0.7);
//! ```

mod config;
mod error;
mod extractor;
mod markdown;

pub use config::ProseConfig;
pub use error::{ProseError, Result};
pub use extractor::{Indicators, ProseClaimExtractor};
