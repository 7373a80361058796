//! In-memory store connector.

use async_trait::async_trait;
use livefetch_core::identity::Identifiable;
use livefetch_core::request::FetchRequest;
use tokio::sync::RwLock;

use crate::connector::{ConnectorError, StoreConnector};

/// Connector backed by a vector guarded by an async `RwLock`.
///
/// Rows are returned newest first (reverse insertion order), so callers
/// never get sorted output for free. `replace_all` stores the rows as given,
/// duplicates included; duplicate ids are reported by the controller when it
/// builds the next snapshot.
#[derive(Debug)]
pub struct MemoryConnector<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for MemoryConnector<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Identifiable + Clone> MemoryConnector<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    pub fn with_rows(rows: Vec<T>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Insert `item`, replacing in place any row with the same id
    pub async fn upsert(&self, item: T) {
        let mut rows = self.rows.write().await;
        match rows.iter().position(|row| row.id() == item.id()) {
            Some(index) => rows[index] = item,
            None => rows.push(item),
        }
    }

    /// Remove the row with `id`, returning it
    pub async fn remove(&self, id: &str) -> Option<T> {
        let mut rows = self.rows.write().await;
        let index = rows.iter().position(|row| row.id() == id)?;
        Some(rows.remove(index))
    }

    /// Swap the whole contents for `rows`
    pub async fn replace_all(&self, rows: Vec<T>) {
        *self.rows.write().await = rows;
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl<T, P> StoreConnector<T, P> for MemoryConnector<T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
    P: Sync + 'static,
{
    async fn execute(&self, request: &FetchRequest<T, P>) -> Result<Vec<T>, ConnectorError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|row| request.predicate_matches(row))
            .cloned()
            .collect())
    }
}
