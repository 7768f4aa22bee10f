//! Draft file poll loop.
//!
//! Reads the draft file on a fixed interval and feeds every *changed*
//! snapshot to the [`AutosaveEngine`]. Re-observing identical content
//! would keep pushing the debounce deadline out, so unchanged reads are
//! dropped here. Engine events are logged as they arrive. When the
//! cancellation token fires, the pending timer is cancelled and one
//! explicit flush is performed.

use std::path::Path;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use quill_autosave::{AutosaveEngine, AutosaveError, AutosaveEvent, SaveOutcome};
use quill_core::draft::DraftContent;

use crate::document;

/// Read and parse the draft file.
pub async fn read_document(path: &Path) -> std::io::Result<DraftContent> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(document::parse(&text))
}

/// Run the poll loop until `cancel` fires, then flush.
///
/// Returns the result of the final flush.
pub async fn run(
    path: &Path,
    engine: &AutosaveEngine,
    interval: Duration,
    cancel: CancellationToken,
) -> Result<SaveOutcome, AutosaveError> {
    let mut ticker = tokio::time::interval(interval);
    let mut events = engine.subscribe();
    let mut last_read: Option<DraftContent> = None;

    tracing::info!(path = %path.display(), "Watching draft file");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Stopping draft watcher");
                break;
            }
            _ = ticker.tick() => {
                match read_document(path).await {
                    Ok(content) => {
                        if last_read.as_ref() != Some(&content) {
                            engine.observe(content.clone());
                            last_read = Some(content);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to read draft file");
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => log_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Autosave event receiver lagged");
                    }
                    // The engine is alive for the whole loop, so the
                    // channel cannot close here.
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    flush(path, engine).await
}

/// Pick up the last edit on disk, then save whatever is outstanding.
async fn flush(path: &Path, engine: &AutosaveEngine) -> Result<SaveOutcome, AutosaveError> {
    engine.shutdown();

    match read_document(path).await {
        Ok(content) => engine.observe(content),
        Err(e) => tracing::warn!(error = %e, "Final read of draft file failed"),
    }

    let outcome = engine.save().await;
    match &outcome {
        Ok(SaveOutcome::Saved) => tracing::info!("Draft flushed"),
        Ok(SaveOutcome::Skipped(reason)) => tracing::info!(?reason, "Nothing to flush"),
        Err(e) => tracing::error!(error = %e, "Final draft flush failed"),
    }
    outcome
}

fn log_event(event: &AutosaveEvent) {
    match event {
        AutosaveEvent::StatusChanged { status, .. } => {
            tracing::info!(status = status.label(), "Autosave status");
        }
        AutosaveEvent::IdentityAssigned { article_id } => {
            tracing::info!(article_id = %article_id, "Draft article created");
        }
    }
}
