use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use livefetch_core::{ChangeDetector, FetchRequest, Identifiable, Sectioning, SortDescriptor};
use livefetch_engine::{ConnectorError, MemoryConnector, ResultsController, StoreConnector};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: String,
    pub folder: String,
    pub order: i32,
    pub body: String,
}

impl Identifiable for Note {
    fn id(&self) -> &str {
        &self.id
    }
}

#[allow(dead_code)]
pub fn note(id: &str, folder: &str, order: i32) -> Note {
    Note {
        id: id.to_string(),
        folder: folder.to_string(),
        order,
        body: String::new(),
    }
}

#[allow(dead_code)]
pub fn by_order() -> FetchRequest<Note> {
    FetchRequest::new().sorted_by(SortDescriptor::ascending("order", |n: &Note| n.order))
}

#[allow(dead_code)]
pub fn by_folder() -> Sectioning<Note, String> {
    Sectioning::by(|n: &Note| n.folder.clone())
}

#[allow(dead_code)]
pub type NoteController = ResultsController<Note, String>;

/// Controller over a memory connector, returned with the connector handle
#[allow(dead_code)]
pub fn memory_controller(rows: Vec<Note>) -> (Arc<MemoryConnector<Note>>, NoteController) {
    let store = Arc::new(MemoryConnector::with_rows(rows));
    let connector: Arc<dyn StoreConnector<Note>> = store.clone();
    let controller = ResultsController::new(connector, by_folder(), ChangeDetector::by_eq());
    (store, controller)
}

#[derive(Debug)]
pub struct BackendDown(pub &'static str);

impl std::fmt::Display for BackendDown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "backend down: {}", self.0)
    }
}

impl std::error::Error for BackendDown {}

/// Connector that always fails
#[allow(dead_code)]
pub struct FailingConnector;

#[async_trait]
impl StoreConnector<Note> for FailingConnector {
    async fn execute(&self, _request: &FetchRequest<Note>) -> Result<Vec<Note>, ConnectorError> {
        Err(Box::new(BackendDown("maintenance")))
    }
}

/// Connector whose calls each wait for a batch pushed through a oneshot
/// channel, in call order.
#[allow(dead_code)]
#[derive(Default)]
pub struct GatedConnector {
    gates: Mutex<VecDeque<oneshot::Receiver<Vec<Note>>>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl GatedConnector {
    /// Queue a gate for the next call; send on the returned sender to
    /// release that call
    pub fn gate(&self) -> oneshot::Sender<Vec<Note>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Yield until at least `n` calls have reached the connector
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl StoreConnector<Note> for GatedConnector {
    async fn execute(&self, _request: &FetchRequest<Note>) -> Result<Vec<Note>, ConnectorError> {
        let gate = self.gates.lock().unwrap().pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        match gate {
            Some(gate) => gate.await.map_err(|e| Box::new(e) as ConnectorError),
            None => Err(Box::new(BackendDown("no gate queued"))),
        }
    }
}
