//! REST client for the Quill articles backend.
//!
//! Provides typed wrappers for the article endpoints the editor uses,
//! the [`DraftStore`](quill_autosave::DraftStore) implementation that
//! backs autosave, and the publish / save-as-draft flow.

pub mod api;
pub mod config;
pub mod models;
pub mod publish;
pub mod store;

pub use api::{ApiError, ArticlesApi};
pub use config::ClientConfig;
pub use models::{Article, ArticleRequest};
