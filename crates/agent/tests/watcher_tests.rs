//! Integration tests for the draft file watcher.
//!
//! Uses a real temp file and short real-time intervals.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use quill_agent::watcher;
use quill_autosave::{AutosaveConfig, AutosaveEngine, DraftStore, SaveOutcome, SkipReason, StoreError};
use quill_core::draft::DraftContent;
use quill_core::types::ArticleId;

const POLL: Duration = Duration::from_millis(10);
const DELAY: Duration = Duration::from_millis(60);

#[derive(Default)]
struct MemoryStore {
    saved: Mutex<Vec<DraftContent>>,
}

impl MemoryStore {
    fn saved(&self) -> Vec<DraftContent> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl DraftStore for MemoryStore {
    async fn create_draft(&self, content: &DraftContent) -> Result<ArticleId, StoreError> {
        self.saved.lock().unwrap().push(content.clone());
        Ok(ArticleId::new("draft-1"))
    }

    async fn update_draft(&self, _id: &ArticleId, content: &DraftContent) -> Result<(), StoreError> {
        self.saved.lock().unwrap().push(content.clone());
        Ok(())
    }
}

fn engine(store: &Arc<MemoryStore>) -> AutosaveEngine {
    AutosaveEngine::new(
        store.clone(),
        DraftContent::default(),
        None,
        AutosaveConfig::default().with_delay(DELAY),
    )
}

// ---------------------------------------------------------------------------
// Test: edits on disk are autosaved after the debounce delay
// ---------------------------------------------------------------------------

#[tokio::test]
async fn file_edit_is_autosaved() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("post.md");
    std::fs::write(&path, "# Hello\n\nFirst words").unwrap();

    let store = Arc::new(MemoryStore::default());
    let engine = engine(&store);
    let cancel = CancellationToken::new();

    let handle = tokio::spawn({
        let engine = engine.clone();
        let cancel = cancel.clone();
        let path = path.clone();
        async move { watcher::run(&path, &engine, POLL, cancel).await }
    });

    tokio::time::sleep(DELAY * 5).await;
    assert_eq!(
        store.saved(),
        vec![DraftContent::new("Hello", "", "<p>First words</p>")]
    );
    assert_eq!(engine.identity(), Some(ArticleId::new("draft-1")));

    cancel.cancel();
    let outcome = handle.await.unwrap();
    assert_eq!(outcome.unwrap(), SaveOutcome::Skipped(SkipReason::Unchanged));
    assert_eq!(store.saved().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: cancellation flushes an edit that is still inside the debounce window
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancel_flushes_pending_edit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("post.md");
    std::fs::write(&path, "# Unsaved\n\nStill typing").unwrap();

    let store = Arc::new(MemoryStore::default());
    let engine = AutosaveEngine::new(
        store.clone(),
        DraftContent::default(),
        None,
        AutosaveConfig::default().with_delay(Duration::from_secs(60)),
    );
    let cancel = CancellationToken::new();

    let handle = tokio::spawn({
        let engine = engine.clone();
        let cancel = cancel.clone();
        let path = path.clone();
        async move { watcher::run(&path, &engine, POLL, cancel).await }
    });

    tokio::time::sleep(POLL * 5).await;
    assert!(store.saved().is_empty());
    assert!(engine.has_unsaved_changes());

    cancel.cancel();
    let outcome = handle.await.unwrap();

    assert_eq!(outcome.unwrap(), SaveOutcome::Saved);
    assert_eq!(
        store.saved(),
        vec![DraftContent::new("Unsaved", "", "<p>Still typing</p>")]
    );
    assert!(!engine.has_unsaved_changes());
}

// ---------------------------------------------------------------------------
// Test: a missing file is tolerated
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_file_saves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.md");

    let store = Arc::new(MemoryStore::default());
    let engine = engine(&store);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = watcher::run(&path, &engine, POLL, cancel).await;

    assert_eq!(outcome.unwrap(), SaveOutcome::Skipped(SkipReason::Empty));
    assert!(store.saved().is_empty());
}
