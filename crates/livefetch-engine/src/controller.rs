//! Live results controller.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --perform_fetch--> Loaded --refresh / refresh_with / perform_fetch--> Loaded
//! ```
//!
//! ## Concurrency
//!
//! The connector call is the only suspension point of a fetch cycle. Every
//! cycle takes a fresh [`RefreshToken`], in the same critical section that
//! reads the request it will issue, before awaiting the connector; when
//! the call resumes, the cycle applies its results only if its token is still
//! the latest one issued. Snapshot build, diff and swap then run under the
//! state lock without awaiting, so at most one cycle mutates state at a time
//! and a slow, stale completion can never overwrite a newer snapshot.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use livefetch_core::core_types::schema::EVENT_SUPERSEDED;
use livefetch_core::core_types::{Generation, RefreshToken, RequestId};
use livefetch_core::diff::{compute_edit_script, ChangeDetector, EditScript};
use livefetch_core::errors::{FetchError, Result};
use livefetch_core::identity::Identifiable;
use livefetch_core::request::FetchRequest;
use livefetch_core::snapshot::{build_snapshot, IndexPath, Sectioning, Snapshot};
use livefetch_core::{log_op_end, log_op_error, log_op_start};
use tokio::sync::broadcast;

use crate::config::ControllerConfig;
use crate::connector::StoreConnector;

/// Whether the controller holds a snapshot yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No successful fetch so far
    Idle,
    /// A snapshot is loaded and lookups are valid
    Loaded,
}

/// Result of one fetch cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome<K> {
    /// The new snapshot replaced the old one; the script turns the old list
    /// view into the new one
    Applied(EditScript<K>),
    /// A newer cycle was issued while this one awaited the connector; its
    /// results were discarded
    Superseded,
}

impl<K> RefreshOutcome<K> {
    pub fn is_superseded(&self) -> bool {
        matches!(self, RefreshOutcome::Superseded)
    }

    /// The applied script, if any
    pub fn script(&self) -> Option<&EditScript<K>> {
        match self {
            RefreshOutcome::Applied(script) => Some(script),
            RefreshOutcome::Superseded => None,
        }
    }
}

/// Message published on the change feed after every applied refresh
#[derive(Debug, Clone)]
pub struct ChangeNotification<K> {
    /// Generation of the snapshot now current
    pub generation: Generation,
    pub script: Arc<EditScript<K>>,
}

struct ControllerInner<T, K, P> {
    request: Option<FetchRequest<T, P>>,
    snapshot: Option<Arc<Snapshot<T, K>>>,
    latest_token: RefreshToken,
}

/// Keeps a sectioned, sorted snapshot of a store's results current and
/// reports every change as an edit script.
///
/// The controller owns the current snapshot exclusively; readers receive
/// `Arc` handles to immutable snapshots, so a reader never observes a
/// snapshot being modified.
pub struct ResultsController<T, K, P = ()> {
    connector: Arc<dyn StoreConnector<T, P>>,
    sectioning: Sectioning<T, K>,
    detector: ChangeDetector<T>,
    inner: Mutex<ControllerInner<T, K, P>>,
    notifier: broadcast::Sender<ChangeNotification<K>>,
}

impl<T, K, P> ResultsController<T, K, P>
where
    T: Identifiable + Send + Sync + 'static,
    K: Ord + Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
{
    /// Create an idle controller with the default configuration
    ///
    /// The section order of `sectioning` is kept as given.
    pub fn new(
        connector: Arc<dyn StoreConnector<T, P>>,
        sectioning: Sectioning<T, K>,
        detector: ChangeDetector<T>,
    ) -> Self {
        let (notifier, _) = broadcast::channel(ControllerConfig::default().notification_capacity);
        Self {
            connector,
            sectioning,
            detector,
            inner: Mutex::new(ControllerInner {
                request: None,
                snapshot: None,
                latest_token: RefreshToken::default(),
            }),
            notifier,
        }
    }

    /// Create an idle controller from `config`
    ///
    /// The configured section order replaces the one in `sectioning`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `config` does not validate.
    pub fn with_config(
        connector: Arc<dyn StoreConnector<T, P>>,
        sectioning: Sectioning<T, K>,
        detector: ChangeDetector<T>,
        config: &ControllerConfig,
    ) -> Result<Self> {
        config.validate()?;
        let (notifier, _) = broadcast::channel(config.notification_capacity);
        Ok(Self {
            notifier,
            ..Self::new(
                connector,
                sectioning.with_order(config.section_order),
                detector,
            )
        })
    }

    /// Execute `request` and load its results as the current snapshot
    ///
    /// Allowed in any state; from `Loaded` it replaces both the request and
    /// the snapshot. The applied script (from the previous snapshot, or from
    /// nothing) is returned but not published on the change feed.
    ///
    /// # Errors
    ///
    /// - `ConnectorFailure` - the connector failed; no retry is attempted
    /// - `DuplicateIdentity` - the batch contained a repeated id
    ///
    /// On error the previous snapshot, if any, stays current.
    pub async fn perform_fetch(&self, request: FetchRequest<T, P>) -> Result<RefreshOutcome<K>> {
        let (token, request) = self.begin_cycle("perform_fetch", Some(request), false)?;
        self.run_cycle("perform_fetch", token, request, false).await
    }

    /// Re-execute the current request and publish the resulting changes
    ///
    /// # Errors
    ///
    /// `Usage` before the first successful fetch, otherwise as
    /// [`ResultsController::perform_fetch`].
    pub async fn refresh(&self) -> Result<RefreshOutcome<K>> {
        let (token, request) = self.begin_cycle("refresh", None, true)?;
        self.run_cycle("refresh", token, request, true).await
    }

    /// Replace the current request with `request`, execute it and publish
    /// the resulting changes
    ///
    /// # Errors
    ///
    /// As [`ResultsController::refresh`].
    pub async fn refresh_with(&self, request: FetchRequest<T, P>) -> Result<RefreshOutcome<K>> {
        let (token, request) = self.begin_cycle("refresh_with", Some(request), true)?;
        self.run_cycle("refresh", token, request, true).await
    }

    /// Check the state, pick the request and issue the cycle's token under a
    /// single lock. `None` re-issues the current request.
    fn begin_cycle(
        &self,
        op: &str,
        request: Option<FetchRequest<T, P>>,
        require_loaded: bool,
    ) -> Result<(RefreshToken, FetchRequest<T, P>)> {
        let mut inner = self.lock()?;
        if require_loaded && inner.snapshot.is_none() {
            return Err(FetchError::not_loaded(op));
        }
        let request = match request.or_else(|| inner.request.clone()) {
            Some(request) => request,
            None => return Err(FetchError::not_loaded(op)),
        };
        inner.latest_token = inner.latest_token.next();
        Ok((inner.latest_token, request))
    }

    async fn run_cycle(
        &self,
        op: &'static str,
        token: RefreshToken,
        request: FetchRequest<T, P>,
        notify: bool,
    ) -> Result<RefreshOutcome<K>> {
        let started = Instant::now();
        let request_id = RequestId::new();
        log_op_start!(op, request_id = %request_id, token = token.value());

        let fetched = self.connector.execute(&request).await;

        let mut inner = self.lock()?;
        if inner.latest_token != token {
            tracing::debug!(
                component = module_path!(),
                op = op,
                event = EVENT_SUPERSEDED,
                request_id = %request_id,
                token = token.value(),
                latest_token = inner.latest_token.value(),
            );
            return Ok(RefreshOutcome::Superseded);
        }

        let applied = fetched
            .map_err(FetchError::connector)
            .and_then(|raw| self.swap_in(&mut inner, raw, request));
        drop(inner);

        let duration_ms = started.elapsed().as_millis() as u64;
        let script = match applied {
            Ok(script) => script,
            Err(err) => {
                log_op_error!(op, err, duration_ms = duration_ms, request_id = %request_id, token = token.value());
                return Err(err);
            }
        };

        if notify {
            // no subscribers is not an error
            let _ = self.notifier.send(ChangeNotification {
                generation: script.to_generation,
                script: Arc::new(script.clone()),
            });
        }

        log_op_end!(
            op,
            duration_ms = duration_ms,
            request_id = %request_id,
            token = token.value(),
            generation = script.to_generation.value(),
            change_count = script.len() as u64,
        );
        Ok(RefreshOutcome::Applied(script))
    }

    /// Build the next snapshot, diff it against the current one and make it
    /// current. Leaves `inner` untouched on error.
    fn swap_in(
        &self,
        inner: &mut ControllerInner<T, K, P>,
        raw: Vec<T>,
        request: FetchRequest<T, P>,
    ) -> Result<EditScript<K>> {
        let previous = inner
            .snapshot
            .clone()
            .unwrap_or_else(|| Arc::new(Snapshot::empty(Generation::INITIAL)));
        let next = build_snapshot(raw, &request, &self.sectioning, previous.generation().next())?;
        let script = compute_edit_script(&previous, &next, &self.detector)?;

        tracing::debug!(
            component = module_path!(),
            generation = next.generation().value(),
            section_count = next.number_of_sections() as u64,
            row_count = next.len() as u64,
            "snapshot built"
        );

        inner.snapshot = Some(Arc::new(next));
        inner.request = Some(request);
        Ok(script)
    }

    /// Result at `path` in the current snapshot
    ///
    /// # Errors
    ///
    /// `Usage` when idle; `InvalidIndexPath` carrying the requested row and
    /// section when `path` is out of bounds.
    pub fn object_at(&self, path: IndexPath) -> Result<Arc<T>> {
        self.loaded("object_at")?.object_at(path).cloned()
    }

    /// Coordinate of the result with `id`, if it is in the current snapshot
    ///
    /// # Errors
    ///
    /// `Usage` when idle.
    pub fn index_path_for(&self, id: &str) -> Result<Option<IndexPath>> {
        Ok(self.loaded("index_path_for")?.index_path_for(id))
    }

    /// # Errors
    ///
    /// `Usage` when idle.
    pub fn number_of_sections(&self) -> Result<usize> {
        Ok(self.loaded("number_of_sections")?.number_of_sections())
    }

    /// # Errors
    ///
    /// `Usage` when idle; `InvalidSection` when `section` is out of bounds.
    pub fn number_of_rows(&self, section: usize) -> Result<usize> {
        self.loaded("number_of_rows")?.number_of_rows(section)
    }

    /// The current snapshot
    ///
    /// # Errors
    ///
    /// `Usage` when idle.
    pub fn snapshot(&self) -> Result<Arc<Snapshot<T, K>>> {
        self.loaded("snapshot")
    }

    /// # Errors
    ///
    /// `Internal` if the state lock is poisoned.
    pub fn state(&self) -> Result<ControllerState> {
        Ok(match self.lock()?.snapshot {
            Some(_) => ControllerState::Loaded,
            None => ControllerState::Idle,
        })
    }

    /// Generation of the current snapshot, `Generation::INITIAL` when idle
    ///
    /// # Errors
    ///
    /// `Internal` if the state lock is poisoned.
    pub fn generation(&self) -> Result<Generation> {
        Ok(self
            .lock()?
            .snapshot
            .as_ref()
            .map_or(Generation::INITIAL, |snapshot| snapshot.generation()))
    }

    /// Receive a [`ChangeNotification`] for every refresh applied from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeNotification<K>> {
        self.notifier.subscribe()
    }

    fn loaded(&self, op: &str) -> Result<Arc<Snapshot<T, K>>> {
        self.lock()?
            .snapshot
            .clone()
            .ok_or_else(|| FetchError::not_loaded(op))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ControllerInner<T, K, P>>> {
        self.inner.lock().map_err(|_| FetchError::Internal {
            message: "controller state lock poisoned".to_string(),
        })
    }
}
