//! Draft autosave engine for the Quill article editor.
//!
//! The editing surface feeds every content change to
//! [`AutosaveEngine::observe`]. The engine debounces, suppresses no-op and
//! empty writes, keeps at most one persistence call in flight, and flips
//! the article from "no draft" to "has draft" the first time a create
//! succeeds. Persistence is delegated to a [`DraftStore`].
//!
//! - [`config`]: debounce delay and the enabled switch.
//! - [`engine`]: the state machine and debounce scheduler.
//! - [`status`]: status values, outcomes, and broadcast events.
//! - [`store`]: the persistence collaborator seam.

pub mod config;
pub mod engine;
pub mod status;
pub mod store;

pub use config::AutosaveConfig;
pub use engine::{AutosaveEngine, AutosaveError};
pub use status::{AutosaveEvent, SaveOutcome, SaveStatus, SkipReason};
pub use store::{DraftStore, SaveIntent, StoreError};
