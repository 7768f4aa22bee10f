//! [`DraftStore`] backed by the articles REST API.

use async_trait::async_trait;

use quill_autosave::{DraftStore, StoreError};
use quill_core::draft::DraftContent;
use quill_core::types::ArticleId;

use crate::api::{ApiError, ArticlesApi};
use crate::models::ArticleRequest;

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(e) => StoreError::Transport(e.to_string()),
            ApiError::Api {
                status, message, ..
            } => StoreError::Rejected { status, message },
            // Local validation is reported like a 422 from the server.
            ApiError::Validation(e) => StoreError::Rejected {
                status: 422,
                message: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl DraftStore for ArticlesApi {
    async fn create_draft(&self, content: &DraftContent) -> Result<ArticleId, StoreError> {
        let article = self.create(&ArticleRequest::draft_create(content)).await?;
        tracing::debug!(article_id = %article.id, slug = %article.slug, "Draft article created");
        Ok(article.id)
    }

    async fn update_draft(&self, id: &ArticleId, content: &DraftContent) -> Result<(), StoreError> {
        self.update(id, &ArticleRequest::draft_update(content)).await?;
        Ok(())
    }
}
