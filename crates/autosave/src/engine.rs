//! Debounced, single-flight draft autosave state machine.
//!
//! [`AutosaveEngine`] owns the draft's identity, the fingerprint of the last
//! persisted snapshot, the current [`SaveStatus`], one debounce timer slot,
//! and one in-flight flag. All of it lives behind a single
//! [`std::sync::Mutex`] that is never held across an `.await`, so engine
//! logic is serialised; the only suspension point is the store call.
//!
//! The engine's phases map onto that state as follows:
//!
//! | Phase       | Representation                         |
//! |-------------|----------------------------------------|
//! | `Idle`      | `status == Idle`, no timer             |
//! | `Scheduled` | timer slot occupied                    |
//! | `Saving`    | `in_flight == true`, `status == Saving`|
//! | `Saved`     | `status == Saved`                      |
//! | `Error`     | `status == Error`                      |
//!
//! Each engine must be created and driven inside a Tokio runtime: timers and
//! persistence calls run on spawned tasks.

use std::pin::pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, Notify};
use tokio_util::sync::CancellationToken;

use quill_core::draft::{DraftContent, Fingerprint};
use quill_core::types::{ArticleId, Timestamp};

use crate::config::AutosaveConfig;
use crate::status::{AutosaveEvent, SaveOutcome, SaveStatus, SkipReason};
use crate::store::{DraftStore, SaveIntent, StoreError};

/// Broadcast channel capacity for autosave events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failure of an explicit [`AutosaveEngine::save`].
#[derive(Debug, thiserror::Error)]
pub enum AutosaveError {
    /// The store rejected or could not receive the draft.
    #[error("Draft save failed: {0}")]
    Persist(#[from] StoreError),

    /// The task running the store call panicked or was cancelled by
    /// runtime shutdown.
    #[error("Draft save task aborted: {0}")]
    Aborted(String),
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

struct EngineState {
    /// Latest snapshot handed to `observe`.
    content: DraftContent,
    /// Fingerprint of the last successfully written snapshot.
    persisted: Fingerprint,
    identity: Option<ArticleId>,
    status: SaveStatus,
    last_saved_at: Option<Timestamp>,
    enabled: bool,
    /// Cancellation handle of the single pending debounce timer.
    pending: Option<CancellationToken>,
    in_flight: bool,
}

impl EngineState {
    fn has_unsaved_changes(&self) -> bool {
        !self.content.is_empty() && self.content.fingerprint() != self.persisted
    }

    /// Cancel the pending timer, if any. Returns `true` when one existed.
    fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

struct Inner {
    store: Arc<dyn DraftStore>,
    debounce_delay: Duration,
    state: Mutex<EngineState>,
    /// Woken whenever an in-flight save releases the single-flight flag.
    flight_done: Notify,
    events: broadcast::Sender<AutosaveEvent>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: AutosaveEvent) {
        // Ignore the SendError: it only means nobody is subscribed.
        let _ = self.events.send(event);
    }

    fn set_status(&self, state: &mut EngineState, status: SaveStatus) {
        state.status = status;
        self.publish(AutosaveEvent::StatusChanged {
            status,
            at: Utc::now(),
        });
    }

    /// Steps 1-4 of a save attempt: single-flight, emptiness and no-op
    /// checks against the current content, then claim the flight.
    fn begin(self: &Arc<Self>, state: &mut EngineState) -> Result<SaveJob, SkipReason> {
        if state.in_flight {
            return Err(SkipReason::InFlight);
        }
        if state.content.is_empty() {
            return Err(SkipReason::Empty);
        }
        let fingerprint = state.content.fingerprint();
        if fingerprint == state.persisted {
            return Err(SkipReason::Unchanged);
        }

        state.in_flight = true;
        let intent = SaveIntent::decide(state.identity.as_ref(), state.content.clone());
        self.set_status(state, SaveStatus::Saving);

        Ok(SaveJob {
            intent,
            fingerprint,
            guard: FlightGuard {
                inner: Arc::clone(self),
                armed: true,
            },
        })
    }
}

/// A claimed save attempt: what to send plus the flight it holds.
struct SaveJob {
    intent: SaveIntent,
    fingerprint: Fingerprint,
    guard: FlightGuard,
}

/// Releases the single-flight flag even if the store call never finishes
/// normally (panic, or the task is dropped before completion).
struct FlightGuard {
    inner: Arc<Inner>,
    armed: bool,
}

impl FlightGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.inner.lock();
            state.in_flight = false;
            self.inner.set_status(&mut state, SaveStatus::Error);
        }
        self.inner.flight_done.notify_waiters();
    }
}

// ---------------------------------------------------------------------------
// AutosaveEngine
// ---------------------------------------------------------------------------

/// Autosave engine for one article-editing session.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct AutosaveEngine {
    inner: Arc<Inner>,
}

impl AutosaveEngine {
    /// Create an engine whose baseline is `initial`.
    ///
    /// No save is ever performed for the initial content itself. Pass the
    /// existing article id as `identity` when editing a saved article.
    pub fn new(
        store: Arc<dyn DraftStore>,
        initial: DraftContent,
        identity: Option<ArticleId>,
        config: AutosaveConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let state = EngineState {
            persisted: initial.fingerprint(),
            content: initial,
            identity,
            status: SaveStatus::Idle,
            last_saved_at: None,
            enabled: config.enabled,
            pending: None,
            in_flight: false,
        };

        Self {
            inner: Arc::new(Inner {
                store,
                debounce_delay: config.debounce_delay,
                state: Mutex::new(state),
                flight_done: Notify::new(),
                events,
            }),
        }
    }

    /// Record the latest content and (re)arm the debounce timer if it
    /// needs saving. Never blocks and never fails.
    pub fn observe(&self, content: DraftContent) {
        let mut state = self.inner.lock();
        state.content = content;
        if state.enabled {
            self.evaluate(&mut state);
        }
    }

    /// Suspend or resume scheduling of new automatic saves.
    ///
    /// Disabling leaves an already-armed timer alone. Re-enabling evaluates
    /// the current content as if it had just been observed.
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.inner.lock();
        if state.enabled == enabled {
            return;
        }
        state.enabled = enabled;
        tracing::debug!(enabled, "Autosave toggled");
        if enabled {
            self.evaluate(&mut state);
        }
    }

    /// Flush now.
    ///
    /// Cancels the pending timer and saves the current content. If a save
    /// is already in flight this waits for it to finish and re-evaluates,
    /// so no second concurrent call is ever started. The store call runs
    /// on its own task: dropping this future does not abort it.
    pub async fn save(&self) -> Result<SaveOutcome, AutosaveError> {
        loop {
            let mut flight_done = pin!(self.inner.flight_done.notified());
            flight_done.as_mut().enable();

            let started = {
                let mut state = self.inner.lock();
                state.cancel_pending();
                self.inner.begin(&mut state)
            };

            match started {
                Ok(job) => return self.run_detached(job).await,
                Err(SkipReason::InFlight) => {
                    tracing::debug!("Explicit save waiting for in-flight save");
                    flight_done.await;
                }
                Err(reason) => return Ok(SaveOutcome::Skipped(reason)),
            }
        }
    }

    /// Cancel any pending timer. An in-flight save still completes.
    pub fn shutdown(&self) {
        if self.inner.lock().cancel_pending() {
            tracing::debug!("Pending autosave cancelled on shutdown");
        }
    }

    /// Subscribe to status and identity changes.
    pub fn subscribe(&self) -> broadcast::Receiver<AutosaveEvent> {
        self.inner.events.subscribe()
    }

    pub fn status(&self) -> SaveStatus {
        self.inner.lock().status
    }

    /// The draft's server identity, once known.
    pub fn identity(&self) -> Option<ArticleId> {
        self.inner.lock().identity.clone()
    }

    pub fn last_saved_at(&self) -> Option<Timestamp> {
        self.inner.lock().last_saved_at
    }

    /// `true` when the current content is non-empty and differs from the
    /// last persisted snapshot. Drives the leave-page confirmation.
    pub fn has_unsaved_changes(&self) -> bool {
        self.inner.lock().has_unsaved_changes()
    }

    /// The most recently observed content.
    pub fn content(&self) -> DraftContent {
        self.inner.lock().content.clone()
    }

    pub fn is_save_scheduled(&self) -> bool {
        self.inner.lock().pending.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.inner.lock().in_flight
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.lock().enabled
    }

    // ---- private helpers ----

    /// Arm the timer for dirty content, otherwise drop any pending one.
    fn evaluate(&self, state: &mut EngineState) {
        if state.has_unsaved_changes() {
            self.schedule(state);
        } else if state.cancel_pending() {
            tracing::debug!("Nothing to save, pending autosave cancelled");
        }
    }

    /// Replace the pending timer with a fresh one (trailing-edge debounce).
    fn schedule(&self, state: &mut EngineState) {
        state.cancel_pending();

        let token = CancellationToken::new();
        state.pending = Some(token.clone());

        let engine = self.clone();
        let delay = self.inner.debounce_delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            engine.fire(&token).await;
        });
    }

    /// Timer expiry. The token is re-checked under the lock, so a
    /// cancellation that raced the sleep still wins.
    async fn fire(&self, token: &CancellationToken) {
        let started = {
            let mut state = self.inner.lock();
            if token.is_cancelled() {
                return;
            }
            state.pending = None;
            self.inner.begin(&mut state)
        };

        match started {
            // Failures are already reflected in the status and logged.
            Ok(job) => {
                let _ = self.persist(job).await;
            }
            Err(reason) => tracing::debug!(?reason, "Debounced autosave skipped"),
        }
    }

    async fn run_detached(&self, job: SaveJob) -> Result<SaveOutcome, AutosaveError> {
        let engine = self.clone();
        tokio::spawn(async move { engine.persist(job).await })
            .await
            .map_err(|e| AutosaveError::Aborted(e.to_string()))?
    }

    /// Steps 4-7 of a save attempt: call the store, then apply the result.
    async fn persist(&self, job: SaveJob) -> Result<SaveOutcome, AutosaveError> {
        let SaveJob {
            intent,
            fingerprint,
            mut guard,
        } = job;

        tracing::debug!(intent = intent.kind(), "Saving draft");
        let result = intent.execute(self.inner.store.as_ref()).await;

        let outcome = {
            let mut state = self.inner.lock();
            state.in_flight = false;
            guard.disarm();
            self.apply(&mut state, result, fingerprint)
        };

        // Wakes explicit savers waiting on this flight.
        drop(guard);
        outcome
    }

    fn apply(
        &self,
        state: &mut EngineState,
        result: Result<Option<ArticleId>, StoreError>,
        fingerprint: Fingerprint,
    ) -> Result<SaveOutcome, AutosaveError> {
        match result {
            Ok(assigned) => {
                if let Some(id) = assigned {
                    tracing::info!(article_id = %id, "Draft created");
                    state.identity = Some(id.clone());
                    self.inner
                        .publish(AutosaveEvent::IdentityAssigned { article_id: id });
                }
                state.persisted = fingerprint;
                state.last_saved_at = Some(Utc::now());
                self.inner.set_status(state, SaveStatus::Saved);

                // Edits that arrived mid-flight may have had their timer
                // skipped; give them a fresh debounce cycle.
                if state.enabled && state.pending.is_none() && state.has_unsaved_changes() {
                    tracing::debug!("Content changed during save, rescheduling");
                    self.schedule(state);
                }

                Ok(SaveOutcome::Saved)
            }
            Err(e) => {
                tracing::warn!(
                    article_id = state.identity.as_ref().map(ArticleId::as_str),
                    error = %e,
                    "Draft save failed"
                );
                self.inner.set_status(state, SaveStatus::Error);

                // The failed snapshot is not retried, but a newer edit whose
                // timer was skipped mid-flight still gets its own cycle.
                if state.enabled
                    && state.pending.is_none()
                    && state.has_unsaved_changes()
                    && state.content.fingerprint() != fingerprint
                {
                    tracing::debug!("Content changed during failed save, rescheduling");
                    self.schedule(state);
                }

                Err(AutosaveError::Persist(e))
            }
        }
    }
}
