use std::path::PathBuf;
use std::time::Duration;

use quill_autosave::AutosaveConfig;
use quill_core::types::ArticleId;

/// Default interval between draft file polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum AgentConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Agent settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// File whose contents are autosaved.
    pub draft_file: PathBuf,
    /// Existing article to update instead of creating a new draft.
    pub article_id: Option<ArticleId>,
    pub poll_interval: Duration,
    pub autosave: AutosaveConfig,
}

impl AgentConfig {
    /// | Variable                 | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `DRAFT_FILE`             | yes      | --      |
    /// | `ARTICLE_ID`             | no       | --      |
    /// | `DRAFT_POLL_INTERVAL_MS` | no       | `1000`  |
    /// | `AUTOSAVE_DELAY_MS`      | no       | `3000`  |
    pub fn from_env() -> Result<Self, AgentConfigError> {
        let draft_file = std::env::var("DRAFT_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(AgentConfigError::Missing("DRAFT_FILE"))?;

        let article_id = std::env::var("ARTICLE_ID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| ArticleId::new(v.trim()));

        let poll_interval_ms = match std::env::var("DRAFT_POLL_INTERVAL_MS") {
            Ok(value) => parse_millis("DRAFT_POLL_INTERVAL_MS", &value)?,
            Err(_) => DEFAULT_POLL_INTERVAL_MS,
        };

        Ok(Self {
            draft_file,
            article_id,
            poll_interval: Duration::from_millis(poll_interval_ms),
            autosave: AutosaveConfig::from_env(),
        })
    }
}

fn parse_millis(name: &'static str, value: &str) -> Result<u64, AgentConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(AgentConfigError::Invalid {
            name,
            expected: "a positive integer",
            value: value.to_string(),
        }),
    }
}
