//! Sectioned, sorted snapshots of fetched results.
//!
//! ## Responsibilities
//!
//! - Materialize a raw result batch into ordered sections of ordered rows
//! - Resolve index paths in both directions with explicit bounds errors
//! - Project a snapshot to its id-only list view for diffing and mirroring
//!
//! ## Non-Responsibilities
//!
//! - Fetching (handled by a store connector in `livefetch-engine`)
//! - Ownership and replacement of the current snapshot (handled by the controller)

pub mod build;
pub mod model;

// Re-export primary types
pub use build::{build_snapshot, SectionOrder, Sectioning};
pub use model::{IndexPath, ListSection, ListView, Section, Snapshot};
