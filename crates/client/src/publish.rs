//! Publish and save-as-draft flow of the publish dialog.
//!
//! Both reuse the record the autosave engine created, so publishing an
//! autosaved article updates it in place instead of creating a second row.

use quill_autosave::AutosaveEngine;
use quill_core::article::{validate_article_fields, ArticleStatus, PublishMetadata};

use crate::api::{ApiError, ArticlesApi};
use crate::models::{Article, ArticleRequest};

/// Publish the article currently held by `engine`.
pub async fn publish_article(
    api: &ArticlesApi,
    engine: &AutosaveEngine,
    metadata: &PublishMetadata,
) -> Result<Article, ApiError> {
    submit(api, engine, metadata, ArticleStatus::Published).await
}

/// Save the article as a draft together with the dialog's metadata.
pub async fn save_draft_with_metadata(
    api: &ArticlesApi,
    engine: &AutosaveEngine,
    metadata: &PublishMetadata,
) -> Result<Article, ApiError> {
    submit(api, engine, metadata, ArticleStatus::Draft).await
}

async fn submit(
    api: &ArticlesApi,
    engine: &AutosaveEngine,
    metadata: &PublishMetadata,
    status: ArticleStatus,
) -> Result<Article, ApiError> {
    // Flush so the identity is as fresh as possible. A failed flush is not
    // fatal: the submission below carries the same content.
    if let Err(e) = engine.save().await {
        tracing::warn!(error = %e, "Flush before submit failed");
    }

    let content = engine.content();
    validate_article_fields(&content, metadata, status)?;

    let request = ArticleRequest::with_metadata(&content, metadata, status);

    let article = match engine.identity() {
        Some(id) => api.update(&id, &request).await?,
        None => api.create(&request).await?,
    };

    tracing::info!(
        article_id = %article.id,
        slug = %article.slug,
        status = status.as_str(),
        "Article submitted"
    );

    Ok(article)
}
