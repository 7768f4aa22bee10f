//! `quill-agent` -- autosave a local draft file to the Quill backend.
//!
//! Polls a file, feeds each change to the autosave engine, and lets the
//! engine debounce and persist it as a draft article. Ctrl-C flushes any
//! outstanding edit before exiting.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default                        | Description                      |
//! |--------------------------|----------|--------------------------------|----------------------------------|
//! | `DRAFT_FILE`             | yes      | --                             | File to watch                    |
//! | `ARTICLE_ID`             | no       | --                             | Existing article to keep updating|
//! | `API_BASE_URL`           | no       | `http://localhost:8080/api/v1` | Backend base URL                 |
//! | `API_TOKEN`              | no       | --                             | Bearer token                     |
//! | `REQUEST_TIMEOUT_SECS`   | no       | `30`                           | HTTP timeout                     |
//! | `AUTOSAVE_DELAY_MS`      | no       | `3000`                         | Debounce delay                   |
//! | `DRAFT_POLL_INTERVAL_MS` | no       | `1000`                         | File poll interval               |

use std::sync::Arc;

use quill_agent::config::AgentConfig;
use quill_agent::watcher;
use quill_autosave::AutosaveEngine;
use quill_client::{ArticlesApi, ClientConfig};
use quill_core::draft::DraftContent;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill_agent=info,quill_autosave=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::from_env()?;
    let client_config = ClientConfig::from_env();

    tracing::info!(
        draft_file = %config.draft_file.display(),
        article_id = ?config.article_id,
        api_base_url = %client_config.base_url,
        delay_ms = config.autosave.debounce_delay.as_millis() as u64,
        "Starting quill-agent",
    );

    let api = Arc::new(ArticlesApi::new(&client_config)?);

    // An existing article starts from what is on disk, so opening it does
    // not trigger a save. A new article starts empty.
    let initial = match &config.article_id {
        Some(_) => watcher::read_document(&config.draft_file).await?,
        None => DraftContent::default(),
    };

    let engine = AutosaveEngine::new(
        api,
        initial,
        config.article_id.clone(),
        config.autosave.clone(),
    );

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => cancel.cancel(),
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
            }
        }
    });

    let outcome = watcher::run(&config.draft_file, &engine, config.poll_interval, cancel).await;

    tracing::info!(
        article_id = ?engine.identity(),
        status = engine.status().label(),
        "quill-agent stopped",
    );

    outcome?;
    Ok(())
}
