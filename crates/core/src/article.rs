//! Article status values and publish-form validation.
//!
//! The publish dialog collects metadata on top of the draft content.
//! These rules mirror what the backend enforces so the editor can reject
//! a bad form before a round trip.

use serde::{Deserialize, Serialize};

use crate::draft::DraftContent;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Maximum subtitle length in characters.
pub const MAX_SUBTITLE_CHARS: usize = 300;

/// Maximum excerpt length in characters.
pub const MAX_EXCERPT_CHARS: usize = 300;

/// Maximum number of tags on one article.
pub const MAX_TAGS: usize = 5;

// ---------------------------------------------------------------------------
// ArticleStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of an article record on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

// ---------------------------------------------------------------------------
// PublishMetadata
// ---------------------------------------------------------------------------

/// Extra fields collected by the publish dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishMetadata {
    pub excerpt: Option<String>,
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

impl PublishMetadata {
    /// Validate the metadata fields on their own.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(excerpt) = &self.excerpt {
            check_max_chars("Excerpt", excerpt, MAX_EXCERPT_CHARS)?;
        }

        if let Some(url) = self.featured_image_url.as_deref() {
            if !url.is_empty() && !is_http_url(url) {
                return Err(CoreError::Validation(format!(
                    "Featured image URL '{url}' must start with http:// or https://"
                )));
            }
        }

        if self.tag_ids.len() > MAX_TAGS {
            return Err(CoreError::Validation(format!(
                "Maximum {MAX_TAGS} tags allowed, got {}",
                self.tag_ids.len()
            )));
        }

        Ok(())
    }
}

/// Validate the draft content plus metadata for the given target status.
///
/// A title is only required when publishing; drafts fall back to
/// "Untitled" on the wire.
pub fn validate_article_fields(
    content: &DraftContent,
    metadata: &PublishMetadata,
    status: ArticleStatus,
) -> Result<(), CoreError> {
    let title = content.title.trim();
    if status == ArticleStatus::Published && title.is_empty() {
        return Err(CoreError::Validation("Title is required".into()));
    }
    check_max_chars("Title", title, MAX_TITLE_CHARS)?;
    check_max_chars("Subtitle", content.subtitle.trim(), MAX_SUBTITLE_CHARS)?;

    if status == ArticleStatus::Published && content.body.trim().is_empty() {
        return Err(CoreError::Validation("Article content is required".into()));
    }

    metadata.validate()
}

fn check_max_chars(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} must be less than {max} characters, got {len}"
        )));
    }
    Ok(())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
