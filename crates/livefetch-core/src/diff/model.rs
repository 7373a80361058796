//! Edit script types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Coordinates are sequential: each change is expressed against the list
//! view produced by applying every change before it.

use std::fmt;
use std::sync::Arc;

use livefetch_core_types::Generation;
use serde::{Deserialize, Serialize};

use crate::snapshot::IndexPath;

/// One structural change to a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change<K> {
    /// Remove the row `id` found at `from`
    Delete { id: String, from: IndexPath },
    /// Insert an empty section keyed `key` at section index `at`
    InsertSection { key: K, at: usize },
    /// Remove the row `id` at `from`, then insert it at `to`
    Move {
        id: String,
        from: IndexPath,
        to: IndexPath,
    },
    /// Remove the empty section keyed `key` at section index `at`
    DeleteSection { key: K, at: usize },
    /// Insert the row `id` at `at`
    Insert { id: String, at: IndexPath },
    /// The row `id` at `at` kept its place but its content changed
    Update { id: String, at: IndexPath },
}

/// Discriminant of a [`Change`], used for counting and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Delete,
    InsertSection,
    Move,
    DeleteSection,
    Insert,
    Update,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Delete => "delete",
            ChangeKind::InsertSection => "insert_section",
            ChangeKind::Move => "move",
            ChangeKind::DeleteSection => "delete_section",
            ChangeKind::Insert => "insert",
            ChangeKind::Update => "update",
        }
    }
}

impl<K> Change<K> {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Delete { .. } => ChangeKind::Delete,
            Change::InsertSection { .. } => ChangeKind::InsertSection,
            Change::Move { .. } => ChangeKind::Move,
            Change::DeleteSection { .. } => ChangeKind::DeleteSection,
            Change::Insert { .. } => ChangeKind::Insert,
            Change::Update { .. } => ChangeKind::Update,
        }
    }

    /// Row id this change concerns; `None` for section changes
    pub fn id(&self) -> Option<&str> {
        match self {
            Change::Delete { id, .. }
            | Change::Move { id, .. }
            | Change::Insert { id, .. }
            | Change::Update { id, .. } => Some(id),
            Change::InsertSection { .. } | Change::DeleteSection { .. } => None,
        }
    }
}

/// Ordered list of changes turning one snapshot's list view into the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript<K> {
    /// Generation of the snapshot the script starts from
    pub from_generation: Generation,
    /// Generation of the snapshot the script produces
    pub to_generation: Generation,
    pub changes: Vec<Change<K>>,
}

impl<K> EditScript<K> {
    /// A script with no changes between two generations
    pub fn empty(from_generation: Generation, to_generation: Generation) -> Self {
        Self {
            from_generation,
            to_generation,
            changes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change<K>> {
        self.changes.iter()
    }

    /// Number of changes of `kind`
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind() == kind).count()
    }

    pub fn inserts(&self) -> usize {
        self.count(ChangeKind::Insert)
    }

    pub fn deletes(&self) -> usize {
        self.count(ChangeKind::Delete)
    }

    pub fn moves(&self) -> usize {
        self.count(ChangeKind::Move)
    }

    pub fn updates(&self) -> usize {
        self.count(ChangeKind::Update)
    }
}

impl<'a, K> IntoIterator for &'a EditScript<K> {
    type Item = &'a Change<K>;
    type IntoIter = std::slice::Iter<'a, Change<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

type ChangedFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Decides whether a result kept at the same place needs an `Update`.
///
/// Given the old and new versions of a result with the same id, returns
/// true when the content differs in a way observers should see.
pub struct ChangeDetector<T> {
    changed: Option<ChangedFn<T>>,
}

impl<T> ChangeDetector<T> {
    /// Use `changed(old, new)` to detect content changes
    pub fn new<F>(changed: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Self {
            changed: Some(Arc::new(changed)),
        }
    }

    /// Never report updates
    pub fn never() -> Self {
        Self { changed: None }
    }

    pub fn has_changed(&self, old: &T, new: &T) -> bool {
        self.changed
            .as_ref()
            .map_or(false, |changed| changed(old, new))
    }
}

impl<T: PartialEq> ChangeDetector<T> {
    /// Report an update whenever old and new compare unequal
    pub fn by_eq() -> Self {
        Self::new(|old: &T, new: &T| old != new)
    }
}

impl<T> Clone for ChangeDetector<T> {
    fn clone(&self) -> Self {
        Self {
            changed: self.changed.clone(),
        }
    }
}

impl<T> fmt::Debug for ChangeDetector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeDetector")
            .field("detects_updates", &self.changed.is_some())
            .finish()
    }
}
