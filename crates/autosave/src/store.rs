//! Persistence collaborator seam.
//!
//! The engine never talks to the network itself. It decides a
//! [`SaveIntent`] once per attempt and hands it to a [`DraftStore`].

use async_trait::async_trait;

use quill_core::draft::DraftContent;
use quill_core::types::ArticleId;

/// Errors a [`DraftStore`] may report. Both variants surface as
/// [`SaveStatus::Error`](crate::SaveStatus::Error); neither is retried by
/// the engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The request never produced a response (network, DNS, timeout).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The backend answered with an error.
    #[error("Rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Create and update operations for draft articles.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Persist a brand-new draft and return its server-assigned identity.
    async fn create_draft(&self, content: &DraftContent) -> Result<ArticleId, StoreError>;

    /// Overwrite an existing draft.
    async fn update_draft(&self, id: &ArticleId, content: &DraftContent) -> Result<(), StoreError>;
}

/// What a single save attempt will send, decided from the identity at the
/// moment the attempt starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveIntent {
    Create(DraftContent),
    Update(ArticleId, DraftContent),
}

impl SaveIntent {
    /// Choose create or update from the current identity.
    pub fn decide(identity: Option<&ArticleId>, content: DraftContent) -> Self {
        match identity {
            Some(id) => Self::Update(id.clone(), content),
            None => Self::Create(content),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update(..) => "update",
        }
    }

    pub fn content(&self) -> &DraftContent {
        match self {
            Self::Create(content) | Self::Update(_, content) => content,
        }
    }

    /// Dispatch to the store. `Some(id)` is returned only for a create.
    pub async fn execute(&self, store: &dyn DraftStore) -> Result<Option<ArticleId>, StoreError> {
        match self {
            Self::Create(content) => store.create_draft(content).await.map(Some),
            Self::Update(id, content) => store.update_draft(id, content).await.map(|()| None),
        }
    }
}
