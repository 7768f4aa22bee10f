use std::time::Duration;

/// Default quiet period after the last edit before an automatic save.
pub const DEFAULT_DEBOUNCE_MS: u64 = 3000;

/// Autosave tuning for one editing session.
#[derive(Debug, Clone)]
pub struct AutosaveConfig {
    /// Time after the last observed change before a save fires.
    pub debounce_delay: Duration,
    /// When `false`, changes are recorded but no new save is scheduled.
    /// Used while a blocking dialog (e.g. publish) is open.
    pub enabled: bool,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            enabled: true,
        }
    }
}

impl AutosaveConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default |
    /// |---------------------|---------|
    /// | `AUTOSAVE_DELAY_MS` | `3000`  |
    /// | `AUTOSAVE_ENABLED`  | `true`  |
    pub fn from_env() -> Self {
        let delay_ms: u64 = std::env::var("AUTOSAVE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS);

        let enabled = std::env::var("AUTOSAVE_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        Self {
            debounce_delay: Duration::from_millis(delay_ms),
            enabled,
        }
    }

    /// Override the debounce delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Start the engine disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}
