//! Declarative fetch requests handed to a store connector.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::identity::Identifiable;
use crate::ordering::{compare_by_descriptors, SortDescriptor};

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Filter and ordering description for one fetch cycle.
///
/// A request is immutable once built: the builder methods consume and return
/// it. Connector-specific parameters travel in the `payload`, so connectors
/// extend a request by choosing `P`, never by wrapping or subclassing it.
///
/// # Example
///
/// ```
/// use livefetch_core::identity::Identifiable;
/// use livefetch_core::ordering::SortDescriptor;
/// use livefetch_core::request::FetchRequest;
///
/// struct Task { id: String, done: bool, priority: u8 }
/// impl Identifiable for Task {
///     fn id(&self) -> &str { &self.id }
/// }
///
/// let request: FetchRequest<Task> = FetchRequest::new()
///     .with_predicate(|t: &Task| !t.done)
///     .sorted_by(SortDescriptor::descending("priority", |t: &Task| t.priority));
/// assert_eq!(request.sort_descriptors().len(), 1);
/// ```
pub struct FetchRequest<T, P = ()> {
    predicate: Option<Predicate<T>>,
    sort_descriptors: Vec<SortDescriptor<T>>,
    payload: P,
}

impl<T> FetchRequest<T, ()> {
    /// Request everything, ordered by id only
    pub fn new() -> Self {
        Self {
            predicate: None,
            sort_descriptors: Vec::new(),
            payload: (),
        }
    }
}

impl<T> Default for FetchRequest<T, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> FetchRequest<T, P> {
    /// Keep only results for which `predicate` returns true
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Append a descriptor to the sort chain
    pub fn sorted_by(mut self, descriptor: SortDescriptor<T>) -> Self {
        self.sort_descriptors.push(descriptor);
        self
    }

    /// Replace the whole sort chain
    pub fn with_sort_descriptors(mut self, descriptors: Vec<SortDescriptor<T>>) -> Self {
        self.sort_descriptors = descriptors;
        self
    }

    /// Attach a connector-specific payload
    pub fn with_payload<Q>(self, payload: Q) -> FetchRequest<T, Q> {
        FetchRequest {
            predicate: self.predicate,
            sort_descriptors: self.sort_descriptors,
            payload,
        }
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    /// Whether `item` passes the filter (always true without a predicate)
    pub fn predicate_matches(&self, item: &T) -> bool {
        self.predicate.as_ref().map_or(true, |predicate| predicate(item))
    }

    pub fn sort_descriptors(&self) -> &[SortDescriptor<T>] {
        &self.sort_descriptors
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }
}

impl<T: Identifiable, P> FetchRequest<T, P> {
    /// Total order over results: the sort chain, then id
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        compare_by_descriptors(&self.sort_descriptors, a, b)
    }

    /// Strict predicate derived from [`FetchRequest::compare`]
    pub fn ordered_before(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

impl<T, P: Clone> Clone for FetchRequest<T, P> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            sort_descriptors: self.sort_descriptors.clone(),
            payload: self.payload.clone(),
        }
    }
}

impl<T, P: fmt::Debug> fmt::Debug for FetchRequest<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchRequest")
            .field("has_predicate", &self.predicate.is_some())
            .field("sort_descriptors", &self.sort_descriptors)
            .field("payload", &self.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item {
        id: String,
        score: i64,
    }

    impl Identifiable for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, score: i64) -> Item {
        Item {
            id: id.to_string(),
            score,
        }
    }

    #[test]
    fn test_request_without_predicate_matches_everything() {
        let request: FetchRequest<Item> = FetchRequest::new();
        assert!(!request.has_predicate());
        assert!(request.predicate_matches(&item("a", -1)));
    }

    #[test]
    fn test_predicate_keeps_iff_true() {
        let request: FetchRequest<Item> = FetchRequest::new().with_predicate(|i: &Item| i.score > 0);
        assert!(request.predicate_matches(&item("a", 1)));
        assert!(!request.predicate_matches(&item("b", 0)));
    }

    #[test]
    fn test_compare_uses_chain_then_id() {
        let request: FetchRequest<Item> =
            FetchRequest::new().sorted_by(SortDescriptor::descending("score", |i: &Item| i.score));

        assert!(request.ordered_before(&item("z", 9), &item("a", 1)));
        assert!(request.ordered_before(&item("a", 5), &item("b", 5)));
        assert!(!request.ordered_before(&item("a", 5), &item("a", 5)));
    }

    #[test]
    fn test_payload_composition() {
        #[derive(Debug, Clone, PartialEq)]
        struct PageHint {
            limit: usize,
        }

        let request = FetchRequest::<Item>::new()
            .sorted_by(SortDescriptor::ascending("score", |i: &Item| i.score))
            .with_payload(PageHint { limit: 25 });

        assert_eq!(request.payload(), &PageHint { limit: 25 });
        assert_eq!(request.sort_descriptors().len(), 1);

        let cloned = request.clone();
        assert_eq!(cloned.payload().limit, 25);
        assert!(format!("{:?}", cloned).contains("PageHint"));
    }
}
