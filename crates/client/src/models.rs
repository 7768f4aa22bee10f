//! Wire types for the articles endpoints.

use serde::{Deserialize, Serialize};

use quill_core::article::{ArticleStatus, PublishMetadata};
use quill_core::draft::{content_preview, DraftContent, UNTITLED};
use quill_core::types::{ArticleId, Timestamp};

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Successful response envelope: `{ success, message, data }`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

/// Error response envelope: `{ success: false, error: { code, message } }`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// An article as returned by the backend. Only the fields the editor
/// reads are modelled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub reading_time_minutes: u32,
    pub status: ArticleStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub published_at: Option<Timestamp>,
}

impl Article {
    /// The editable part of the article, used to seed an autosave engine.
    pub fn draft_content(&self) -> DraftContent {
        DraftContent::new(
            self.title.clone(),
            self.subtitle.clone().unwrap_or_default(),
            self.content.clone(),
        )
    }
}

// ---------------------------------------------------------------------------
// ArticleRequest
// ---------------------------------------------------------------------------

/// Body of `POST /articles` and `PUT /articles/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
    pub status: ArticleStatus,
}

impl ArticleRequest {
    /// Autosave create: an empty title becomes "Untitled" and the taxonomy
    /// lists are sent empty. Title and subtitle are otherwise sent as typed.
    pub fn draft_create(content: &DraftContent) -> Self {
        Self {
            title: content.title_or_untitled().to_string(),
            subtitle: content.subtitle_opt().map(str::to_string),
            content: content.body.clone(),
            excerpt: None,
            featured_image_url: None,
            category_ids: Some(Vec::new()),
            tag_ids: Some(Vec::new()),
            status: ArticleStatus::Draft,
        }
    }

    /// Autosave update: the title is sent as typed.
    pub fn draft_update(content: &DraftContent) -> Self {
        Self {
            title: content.title.clone(),
            subtitle: content.subtitle_opt().map(str::to_string),
            content: content.body.clone(),
            excerpt: None,
            featured_image_url: None,
            category_ids: None,
            tag_ids: None,
            status: ArticleStatus::Draft,
        }
    }

    /// Publish-dialog submission carrying the full metadata.
    ///
    /// Title and subtitle are trimmed here. A blank excerpt falls back to
    /// the body preview.
    pub fn with_metadata(
        content: &DraftContent,
        metadata: &PublishMetadata,
        status: ArticleStatus,
    ) -> Self {
        let title = content.title.trim();
        let title = match status {
            ArticleStatus::Draft if title.is_empty() => UNTITLED,
            _ => title,
        };

        let excerpt = non_blank(metadata.excerpt.as_deref())
            .or_else(|| non_blank(Some(content_preview(&content.body).as_str())));

        Self {
            title: title.to_string(),
            subtitle: non_blank(Some(content.subtitle.as_str())),
            content: content.body.clone(),
            excerpt,
            featured_image_url: non_blank(metadata.featured_image_url.as_deref()),
            category_ids: Some(metadata.category_ids.clone()),
            tag_ids: Some(metadata.tag_ids.clone()),
            status,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
