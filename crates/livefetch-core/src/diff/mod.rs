//! Snapshot diff engine.
//!
//! Compares two snapshots and produces the ordered edit script that turns
//! the first one's list view into the second's.
//!
//! ## Entry point
//!
//! ```ignore
//! use livefetch_core::diff::{compute_edit_script, render_human_summary, ChangeDetector};
//!
//! let script = compute_edit_script(&previous, &next, &ChangeDetector::by_eq())?;
//! println!("{}", render_human_summary(&script));
//! ```
//!
//! ## Guarantees
//!
//! - **Soundness**: replaying the script with
//!   [`apply_edit_script`](crate::apply::apply_edit_script) on the previous
//!   list view yields exactly the next one.
//! - **Sequential coordinates**: every change is addressed against the view
//!   left by the changes before it, so a consumer can apply them one by one.
//! - **One change per row**: a row is deleted, inserted, moved or updated,
//!   never two of these.
//! - **Determinism**: equal snapshots in produce equal scripts out.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::compute_edit_script;
pub use human_summary::render_human_summary;
pub use model::{Change, ChangeDetector, ChangeKind, EditScript};
