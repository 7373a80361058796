//! Store connectors: the backend seam of the controller.
//!
//! A connector turns a [`FetchRequest`] into an unordered batch of results.
//! Sorting, sectioning and identity checks happen afterwards in the core, so
//! a connector only needs to honor the request's predicate.

use async_trait::async_trait;
use livefetch_core::errors::BoxError;
use livefetch_core::request::FetchRequest;

/// Error type returned by connectors, surfaced verbatim as the source of
/// `FetchError::ConnectorFailure`
pub type ConnectorError = BoxError;

/// Backend able to execute fetch requests
///
/// Implementations may read from any store (memory, SQL, a remote API).
/// The returned batch may come in any order and must contain only results
/// satisfying the request's predicate; results failing it are dropped again
/// by the core regardless.
#[async_trait]
pub trait StoreConnector<T, P = ()>: Send + Sync {
    /// Execute one request and return the matching results
    ///
    /// # Errors
    ///
    /// Any backend failure. It is wrapped, not replaced, by the controller.
    async fn execute(&self, request: &FetchRequest<T, P>) -> Result<Vec<T>, ConnectorError>;
}
