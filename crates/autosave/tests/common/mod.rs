//! Shared fixtures for autosave integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use quill_autosave::{AutosaveConfig, AutosaveEngine, DraftStore, StoreError};
use quill_core::draft::DraftContent;
use quill_core::types::ArticleId;

/// Debounce delay used throughout the tests.
pub const DELAY: Duration = Duration::from_millis(3000);

/// One call received by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(DraftContent),
    Update(ArticleId, DraftContent),
}

impl Call {
    pub fn content(&self) -> &DraftContent {
        match self {
            Call::Create(c) | Call::Update(_, c) => c,
        }
    }
}

/// In-memory [`DraftStore`] that records calls, can be told to fail, and
/// can hold calls in flight until released.
pub struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicUsize,
    fail: AtomicBool,
    gated: AtomicBool,
    gate: Semaphore,
}

impl RecordingStore {
    fn build(gated: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            gated: AtomicBool::new(gated),
            gate: Semaphore::new(0),
        })
    }

    pub fn new() -> Arc<Self> {
        Self::build(false)
    }

    /// A store whose calls block until [`release`](Self::release).
    pub fn gated() -> Arc<Self> {
        Self::build(true)
    }

    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn enter(&self, call: Call) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(call);
        if self.gated.load(Ordering::SeqCst) {
            self.gate.acquire().await.expect("gate open").forget();
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("connection reset".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DraftStore for RecordingStore {
    async fn create_draft(&self, content: &DraftContent) -> Result<ArticleId, StoreError> {
        self.enter(Call::Create(content.clone())).await?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ArticleId::new(format!("article-{n}")))
    }

    async fn update_draft(&self, id: &ArticleId, content: &DraftContent) -> Result<(), StoreError> {
        self.enter(Call::Update(id.clone(), content.clone())).await
    }
}

pub fn content(title: &str, body: &str) -> DraftContent {
    DraftContent::new(title, "", body)
}

pub fn engine(
    store: &Arc<RecordingStore>,
    initial: DraftContent,
    identity: Option<&str>,
) -> AutosaveEngine {
    engine_with(store, initial, identity, AutosaveConfig::default().with_delay(DELAY))
}

pub fn engine_with(
    store: &Arc<RecordingStore>,
    initial: DraftContent,
    identity: Option<&str>,
    config: AutosaveConfig,
) -> AutosaveEngine {
    AutosaveEngine::new(
        store.clone(),
        initial,
        identity.map(ArticleId::from),
        config,
    )
}

/// Let spawned tasks run to their next suspension point.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused clock and let woken tasks run.
pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    settle().await;
}
