//! Snapshot construction: filter, section, sort.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use livefetch_core_types::Generation;
use serde::{Deserialize, Serialize};

use super::model::{Section, Snapshot};
use crate::errors::{FetchError, Result};
use crate::identity::Identifiable;
use crate::request::FetchRequest;

/// Order in which sections appear in a snapshot.
///
/// Sections are always ordered by comparing their keys. Ordering by first
/// appearance is not offered: connectors return unordered batches, so
/// "first seen" would change between fetches of identical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionOrder {
    /// Smallest key first
    #[default]
    Ascending,
    /// Largest key first
    Descending,
}

type KeySelector<T, K> = Arc<dyn Fn(&T) -> K + Send + Sync>;

/// How results are grouped into sections and how sections are ordered.
pub struct Sectioning<T, K> {
    selector: KeySelector<T, K>,
    order: SectionOrder,
}

impl<T, K> Sectioning<T, K> {
    /// Group by the key returned from `selector`, ascending
    pub fn by<F>(selector: F) -> Self
    where
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self {
            selector: Arc::new(selector),
            order: SectionOrder::default(),
        }
    }

    pub fn with_order(mut self, order: SectionOrder) -> Self {
        self.order = order;
        self
    }

    pub fn order(&self) -> SectionOrder {
        self.order
    }

    /// Section key of `item`
    pub fn section_key(&self, item: &T) -> K {
        (self.selector)(item)
    }
}

impl SectionOrder {
    /// Strict predicate: does section `a` come before section `b`
    pub fn key_ordered_before<K: Ord>(self, a: &K, b: &K) -> bool {
        match self {
            SectionOrder::Ascending => a < b,
            SectionOrder::Descending => a > b,
        }
    }
}

impl<T, K: Ord> Sectioning<T, K> {
    /// Strict section-order predicate over keys
    pub fn key_ordered_before(&self, a: &K, b: &K) -> bool {
        self.order.key_ordered_before(a, b)
    }
}

impl<T> Sectioning<T, ()> {
    /// Put every result in one section
    pub fn single() -> Self {
        Self::by(|_| ())
    }
}

impl<T, K> Clone for Sectioning<T, K> {
    fn clone(&self) -> Self {
        Self {
            selector: Arc::clone(&self.selector),
            order: self.order,
        }
    }
}

impl<T, K> fmt::Debug for Sectioning<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sectioning")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Build a snapshot from a raw, unordered result batch.
///
/// 1. Results failing the request's predicate are dropped.
/// 2. Duplicate ids among the remaining results are rejected.
/// 3. Results are grouped by section key; sections ordered by key.
/// 4. Rows within each section are sorted by the request's descriptor chain,
///    ties broken by id.
///
/// The output depends only on the *set* of inputs, never on their order.
///
/// # Errors
///
/// Returns `DuplicateIdentity` with the smallest duplicated id if two
/// retained results share an id.
pub fn build_snapshot<T, K, P>(
    raw: Vec<T>,
    request: &FetchRequest<T, P>,
    sectioning: &Sectioning<T, K>,
    generation: Generation,
) -> Result<Snapshot<T, K>>
where
    T: Identifiable,
    K: Ord,
{
    let retained: Vec<T> = raw
        .into_iter()
        .filter(|item| request.predicate_matches(item))
        .collect();

    if let Some(id) = smallest_duplicate_id(&retained) {
        return Err(FetchError::DuplicateIdentity { id });
    }

    let mut groups: BTreeMap<K, Vec<Arc<T>>> = BTreeMap::new();
    for item in retained {
        groups
            .entry(sectioning.section_key(&item))
            .or_default()
            .push(Arc::new(item));
    }

    let mut sections: Vec<Section<T, K>> = groups
        .into_iter()
        .map(|(key, mut rows)| {
            rows.sort_by(|a, b| request.compare(a, b));
            Section::new(key, rows)
        })
        .collect();

    if sectioning.order() == SectionOrder::Descending {
        sections.reverse();
    }

    Ok(Snapshot::from_sections(
        generation,
        sectioning.order(),
        sections,
    ))
}

fn smallest_duplicate_id<T: Identifiable>(items: &[T]) -> Option<String> {
    let mut ids: Vec<&str> = items.iter().map(|item| item.id()).collect();
    ids.sort_unstable();
    ids.windows(2)
        .find(|pair| pair[0] == pair[1])
        .map(|pair| pair[0].to_string())
}
