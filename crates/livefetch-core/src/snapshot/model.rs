//! Snapshot data types.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use livefetch_core_types::Generation;
use serde::{Deserialize, Serialize};

use super::build::SectionOrder;
use crate::errors::{FetchError, Result};
use crate::identity::Identifiable;

/// `{section, row}` coordinate into a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.section, self.row)
    }
}

/// One group of rows sharing a section key, rows in sort order.
#[derive(Debug)]
pub struct Section<T, K> {
    key: K,
    rows: Vec<Arc<T>>,
}

impl<T, K> Section<T, K> {
    pub(crate) fn new(key: K, rows: Vec<Arc<T>>) -> Self {
        Self { key, rows }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn rows(&self) -> &[Arc<T>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Immutable, sectioned, sorted materialization of a result batch.
///
/// Built once by [`build_snapshot`](super::build_snapshot) and never mutated
/// afterwards; a newer snapshot supersedes it. Rows are reference counted so
/// consecutive generations share unchanged results.
#[derive(Debug)]
pub struct Snapshot<T, K> {
    generation: Generation,
    section_order: SectionOrder,
    sections: Vec<Section<T, K>>,
    index: HashMap<String, IndexPath>,
}

impl<T, K: Clone> Clone for Section<T, K> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            rows: self.rows.clone(),
        }
    }
}

impl<T, K: Clone> Clone for Snapshot<T, K> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            section_order: self.section_order,
            sections: self.sections.clone(),
            index: self.index.clone(),
        }
    }
}

impl<T: Identifiable, K> Snapshot<T, K> {
    /// A snapshot with no sections
    pub fn empty(generation: Generation) -> Self {
        Self {
            generation,
            section_order: SectionOrder::default(),
            sections: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Assemble a snapshot from sections already arranged in `section_order`
    pub(crate) fn from_sections(
        generation: Generation,
        section_order: SectionOrder,
        sections: Vec<Section<T, K>>,
    ) -> Self {
        let mut index = HashMap::new();
        for (section, group) in sections.iter().enumerate() {
            for (row, item) in group.rows.iter().enumerate() {
                index.insert(item.id().to_string(), IndexPath::new(section, row));
            }
        }
        Self {
            generation,
            section_order,
            sections,
            index,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Order the sections were arranged in when this snapshot was built
    pub fn section_order(&self) -> SectionOrder {
        self.section_order
    }

    pub fn sections(&self) -> &[Section<T, K>] {
        &self.sections
    }

    pub fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    /// Number of rows in `section`
    ///
    /// # Errors
    ///
    /// Returns `InvalidSection` if `section` is out of bounds.
    pub fn number_of_rows(&self, section: usize) -> Result<usize> {
        self.sections
            .get(section)
            .map(Section::len)
            .ok_or(FetchError::InvalidSection { section })
    }

    /// Key of `section`, if it exists
    pub fn section_key(&self, section: usize) -> Option<&K> {
        self.sections.get(section).map(Section::key)
    }

    /// Result at `path`
    ///
    /// # Errors
    ///
    /// Returns `InvalidIndexPath` carrying the requested row and section if
    /// either coordinate is out of bounds.
    pub fn object_at(&self, path: IndexPath) -> Result<&Arc<T>> {
        self.sections
            .get(path.section)
            .and_then(|section| section.rows.get(path.row))
            .ok_or(FetchError::InvalidIndexPath {
                row: path.row,
                section: path.section,
            })
    }

    /// Reverse lookup of a result's coordinate by id
    pub fn index_path_for(&self, id: &str) -> Option<IndexPath> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Total number of rows across all sections
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Rows in presentation order with their coordinates
    pub fn iter(&self) -> impl Iterator<Item = (IndexPath, &Arc<T>)> + '_ {
        self.sections.iter().enumerate().flat_map(|(section, group)| {
            group
                .rows
                .iter()
                .enumerate()
                .map(move |(row, item)| (IndexPath::new(section, row), item))
        })
    }
}

impl<T: Identifiable, K: Clone> Snapshot<T, K> {
    /// Id-only projection used by edit scripts
    pub fn list_view(&self) -> ListView<K> {
        ListView {
            sections: self
                .sections
                .iter()
                .map(|section| ListSection {
                    key: section.key.clone(),
                    ids: section.rows.iter().map(|item| item.id().to_string()).collect(),
                })
                .collect(),
        }
    }
}

/// Id-only view of a snapshot: section keys and row ids in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListView<K> {
    pub sections: Vec<ListSection<K>>,
}

/// One section of a [`ListView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSection<K> {
    pub key: K,
    pub ids: Vec<String>,
}

impl<K> ListView<K> {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Total number of ids across all sections
    pub fn len(&self) -> usize {
        self.sections.iter().map(|section| section.ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|section| section.ids.is_empty())
    }

    /// Id at `path`, if it resolves
    pub fn id_at(&self, path: IndexPath) -> Option<&str> {
        self.sections
            .get(path.section)
            .and_then(|section| section.ids.get(path.row))
            .map(String::as_str)
    }

    /// Current coordinate of `id`, by linear scan
    pub fn position_of(&self, id: &str) -> Option<IndexPath> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section, group)| {
                group
                    .ids
                    .iter()
                    .position(|candidate| candidate == id)
                    .map(|row| IndexPath::new(section, row))
            })
    }

    pub(crate) fn remove_row(&mut self, path: IndexPath) -> Option<String> {
        let section = self.sections.get_mut(path.section)?;
        (path.row < section.ids.len()).then(|| section.ids.remove(path.row))
    }

    pub(crate) fn insert_row(&mut self, path: IndexPath, id: String) -> bool {
        match self.sections.get_mut(path.section) {
            Some(section) if path.row <= section.ids.len() => {
                section.ids.insert(path.row, id);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn insert_section(&mut self, at: usize, key: K) -> bool {
        if at > self.sections.len() {
            return false;
        }
        self.sections.insert(
            at,
            ListSection {
                key,
                ids: Vec::new(),
            },
        );
        true
    }

    pub(crate) fn remove_section(&mut self, at: usize) -> Option<ListSection<K>> {
        (at < self.sections.len()).then(|| self.sections.remove(at))
    }
}

impl<K: PartialEq> ListView<K> {
    /// Index of the section keyed `key`
    pub fn section_index(&self, key: &K) -> Option<usize> {
        self.sections.iter().position(|section| &section.key == key)
    }
}

impl<K> Default for ListView<K> {
    fn default() -> Self {
        Self::new()
    }
}
