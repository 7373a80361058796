//! livefetch core - sectioned snapshots and edit scripts
//!
//! This crate provides the pure, synchronous half of a live fetched results
//! controller:
//! - Identity contract and sort descriptor chains for fetched results
//! - Declarative fetch requests (predicate, ordering, connector payload)
//! - Immutable sectioned snapshots with index path lookups
//! - Edit script computation between consecutive snapshots, and replay
//! - Error taxonomy and the structured logging facility
//!
//! Fetching, refresh orchestration and change notification live in
//! `livefetch-engine`.

pub mod apply;
pub mod diff;
pub mod errors;
pub mod identity;
pub mod logging_facility;
pub mod ordering;
pub mod request;
pub mod snapshot;

pub use livefetch_core_types as core_types;

// Re-export commonly used types
pub use apply::apply_edit_script;
pub use diff::{compute_edit_script, Change, ChangeDetector, ChangeKind, EditScript};
pub use errors::{ExError, ExErrorKind, FetchError, Result};
pub use identity::Identifiable;
pub use ordering::{insertion_index, SortDescriptor, SortDirection};
pub use request::FetchRequest;
pub use snapshot::{
    build_snapshot, IndexPath, ListSection, ListView, SectionOrder, Sectioning, Snapshot,
};
