//! Domain types shared by the Quill editor crates.
//!
//! Zero async and zero I/O: draft snapshots, fingerprints, text helpers,
//! article status values, and publish-form validation.

pub mod article;
pub mod draft;
pub mod error;
pub mod types;

pub use draft::{DraftContent, Fingerprint};
pub use error::CoreError;
pub use types::{ArticleId, Timestamp};
