//! Identity contract for fetched results.

use std::sync::Arc;

/// A result with a stable, unique identifier.
///
/// The id must stay the same across updates to the same logical entity;
/// two results are "the same result" exactly when their ids are equal.
pub trait Identifiable {
    fn id(&self) -> &str;
}

impl<T: Identifiable + ?Sized> Identifiable for Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn id(&self) -> &str {
        (**self).id()
    }
}
