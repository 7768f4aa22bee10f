/// Default backend base URL for local development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the API prefix, without a trailing slash.
    pub base_url: String,
    /// Bearer token attached to every request when present.
    pub access_token: Option<String>,
    /// Per-request timeout in seconds. Bounds how long an autosave can
    /// stay in flight.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                         |
    /// |------------------------|---------------------------------|
    /// | `API_BASE_URL`         | `http://localhost:8080/api/v1`  |
    /// | `API_TOKEN`            | none                            |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                            |
    pub fn from_env() -> Self {
        let base_url = std::env::var("API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| normalize_base_url(&v))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let access_token = std::env::var("API_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            base_url,
            access_token,
            request_timeout_secs,
        }
    }

    /// Config pointing at `base_url` with everything else defaulted.
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
