//! Ordering primitives: insertion-point search and sort descriptor chains.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::identity::Identifiable;

/// Find the index at which `target` can be inserted into `items` without
/// breaking their order.
///
/// `items` must already be sorted by the strict predicate `ordered_before`.
/// The search narrows `[0, len)` by halves; as soon as the midpoint is
/// equivalent to `target` (neither is ordered before the other) its index is
/// returned. On unsorted input the result is still an index in `0..=len`,
/// just not a meaningful one.
///
/// # Example
///
/// ```
/// use livefetch_core::ordering::insertion_index;
///
/// let sorted = [1, 3, 5, 7];
/// assert_eq!(insertion_index(&sorted, &4, |a, b| a < b), 2);
/// assert_eq!(insertion_index(&sorted, &9, |a, b| a < b), 4);
/// ```
pub fn insertion_index<T, F>(items: &[T], target: &T, mut ordered_before: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut low = 0;
    let mut high = items.len();

    while low < high {
        let mid = low + (high - low) / 2;
        let candidate = &items[mid];
        if ordered_before(candidate, target) {
            low = mid + 1;
        } else if ordered_before(target, candidate) {
            high = mid;
        } else {
            return mid;
        }
    }

    low
}

/// Direction of a single sort descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Apply this direction to an ascending comparison result
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// One ordering rule in a descriptor chain.
///
/// The `key` name is descriptive only (logs, summaries); the ordering itself
/// comes from the statically supplied comparator.
pub struct SortDescriptor<T> {
    key: String,
    direction: SortDirection,
    compare: Comparator<T>,
}

impl<T> SortDescriptor<T> {
    /// Order by an extracted key, smallest first
    pub fn ascending<K, F>(key: impl Into<String>, extract: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::by_key(key, SortDirection::Ascending, extract)
    }

    /// Order by an extracted key, largest first
    pub fn descending<K, F>(key: impl Into<String>, extract: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::by_key(key, SortDirection::Descending, extract)
    }

    /// Order by an extracted key in the given direction
    pub fn by_key<K, F>(key: impl Into<String>, direction: SortDirection, extract: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::by(key, direction, move |a, b| extract(a).cmp(&extract(b)))
    }

    /// Order with an arbitrary ascending comparator; `direction` is applied on top
    pub fn by<F>(key: impl Into<String>, direction: SortDirection, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            direction,
            compare: Arc::new(compare),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compare two values under this descriptor, direction included
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.direction.apply((self.compare)(a, b))
    }
}

impl<T> Clone for SortDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            direction: self.direction,
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<T> fmt::Debug for SortDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortDescriptor")
            .field("key", &self.key)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// Compare two results under a descriptor chain.
///
/// Descriptors are tried in order and the first non-equal comparison wins.
/// Results the whole chain considers equal are ordered by id, so the chain
/// is always a total order over distinct ids.
pub fn compare_by_descriptors<T: Identifiable>(
    descriptors: &[SortDescriptor<T>],
    a: &T,
    b: &T,
) -> Ordering {
    descriptors
        .iter()
        .map(|descriptor| descriptor.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.id().cmp(b.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Row {
        id: &'static str,
        rank: i32,
        label: &'static str,
    }

    impl Identifiable for Row {
        fn id(&self) -> &str {
            self.id
        }
    }

    fn row(id: &'static str, rank: i32, label: &'static str) -> Row {
        Row { id, rank, label }
    }

    #[test]
    fn test_insertion_index_empty() {
        let empty: [i32; 0] = [];
        assert_eq!(insertion_index(&empty, &3, |a, b| a < b), 0);
    }

    #[test]
    fn test_insertion_index_bounds() {
        let sorted = [2, 4, 6];
        assert_eq!(insertion_index(&sorted, &1, |a, b| a < b), 0);
        assert_eq!(insertion_index(&sorted, &5, |a, b| a < b), 2);
        assert_eq!(insertion_index(&sorted, &7, |a, b| a < b), 3);
    }

    #[test]
    fn test_insertion_index_equivalent_short_circuits_to_midpoint() {
        // Midpoint of [0, 5) is 2, which is equivalent to the target
        let sorted = [1, 1, 1, 1, 1];
        assert_eq!(insertion_index(&sorted, &1, |a, b| a < b), 2);
    }

    #[test]
    fn test_insertion_index_unsorted_stays_in_range() {
        let unsorted = [9, 1, 8, 2, 7];
        let index = insertion_index(&unsorted, &5, |a, b| a < b);
        assert!(index <= unsorted.len());
    }

    #[test]
    fn test_descriptor_chain_first_difference_wins() {
        let chain = vec![
            SortDescriptor::ascending("rank", |r: &Row| r.rank),
            SortDescriptor::descending("label", |r: &Row| r.label),
        ];

        let a = row("a", 1, "x");
        let b = row("b", 2, "z");
        assert_eq!(compare_by_descriptors(&chain, &a, &b), Ordering::Less);

        let c = row("c", 1, "z");
        // Same rank, label descending puts "z" first
        assert_eq!(compare_by_descriptors(&chain, &c, &a), Ordering::Less);
    }

    #[test]
    fn test_descriptor_chain_ties_break_by_id() {
        let chain = vec![SortDescriptor::ascending("rank", |r: &Row| r.rank)];
        let a = row("a", 1, "same");
        let b = row("b", 1, "same");

        assert_eq!(compare_by_descriptors(&chain, &a, &b), Ordering::Less);
        assert_eq!(compare_by_descriptors(&chain, &b, &a), Ordering::Greater);
        assert_eq!(compare_by_descriptors(&[], &a, &b), Ordering::Less);
    }

    #[test]
    fn test_descriptor_debug_hides_comparator() {
        let descriptor = SortDescriptor::descending("rank", |r: &Row| r.rank);
        let text = format!("{:?}", descriptor);
        assert!(text.contains("rank"));
        assert!(text.contains("Descending"));
    }

    proptest! {
        #[test]
        fn prop_insertion_index_preserves_sortedness(
            mut values in proptest::collection::vec(-50i32..50, 0..40),
            target in -60i32..60,
        ) {
            values.sort_unstable();
            let index = insertion_index(&values, &target, |a, b| a < b);
            prop_assert!(index <= values.len());

            values.insert(index, target);
            prop_assert!(values.windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn prop_insertion_index_descending_order(
            mut values in proptest::collection::vec(0u8..20, 0..30),
            target in 0u8..20,
        ) {
            values.sort_unstable_by(|a, b| b.cmp(a));
            let index = insertion_index(&values, &target, |a, b| a > b);

            values.insert(index, target);
            prop_assert!(values.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
