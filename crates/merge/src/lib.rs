//! # Claimscan Merge
//!
//! Deduplicates prose and source claims and turns them into a research queue.
//!
//! ```text
//! prose ClaimBatch ─┐
//!                   ├─> re-key ids ─> union-find dedup ─> priority ─> Inventory
//! source ClaimBatch ┘                                                 ├─ research_queue
//!                                                                     └─ superseded_by
//! ```
//!
//! ## Example
//!
//! ```rust
//! use claimscan_claims::Priority;
//! use claimscan_merge::ClaimMerger;
//!
//! let inventory = ClaimMerger::default().merge(Vec::new(), Vec::new());
//! assert!(inventory.research_queue.tier(Priority::Critical).is_empty());
//! assert_eq!(inventory.metadata.total_claims, 0);
//! ```

mod config;
mod dedup;
mod error;
mod inventory;
mod merger;
mod priority;
mod report;

pub use config::MergeConfig;
pub use error::{MergeError, Result};
pub use inventory::{Inventory, InventoryMetadata, ResearchQueue};
pub use merger::{load_batch, ClaimMerger};
pub use priority::assign_priority;
pub use report::render_report;
