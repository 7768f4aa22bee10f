//! REST API client for the articles endpoints.
//!
//! Wraps the backend's `/articles` routes (create, update, fetch by slug,
//! delete) using [`reqwest`], unwrapping the `{ success, message, data }`
//! envelope and mapping error envelopes to [`ApiError::Api`].

use std::time::Duration;

use reqwest::{Method, RequestBuilder};

use quill_core::error::CoreError;
use quill_core::types::ArticleId;

use crate::config::ClientConfig;
use crate::models::{ApiErrorBody, ApiResponse, Article, ArticleRequest};

/// Errors from the articles REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}) {code}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code from the envelope.
        code: String,
        /// Human-readable message, or the raw body when unparseable.
        message: String,
    },

    /// The request was rejected locally before being sent.
    #[error(transparent)]
    Validation(#[from] CoreError),
}

/// HTTP client for the articles backend.
#[derive(Clone)]
pub struct ArticlesApi {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ArticlesApi {
    /// Build a client with its own connection pool and the configured
    /// request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
        }
    }

    /// `POST /articles`.
    pub async fn create(&self, request: &ArticleRequest) -> Result<Article, ApiError> {
        let response = self
            .request(Method::POST, "/articles")
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `PUT /articles/{id}`.
    pub async fn update(
        &self,
        id: &ArticleId,
        request: &ArticleRequest,
    ) -> Result<Article, ApiError> {
        let response = self
            .request(Method::PUT, &format!("/articles/{id}"))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `GET /articles/{slug}`.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Article, ApiError> {
        let response = self
            .request(Method::GET, &format!("/articles/{slug}"))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// `DELETE /articles/{id}`.
    pub async fn delete(&self, id: &ArticleId) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/articles/{id}"))
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Ensure the response has a success status code. On failure, decode
    /// the error envelope if possible, otherwise keep the raw body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        let (code, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => (format!("HTTP_{}", status.as_u16()), body),
        };

        Err(ApiError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    /// Parse a successful envelope and return its `data`.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        let envelope = response.json::<ApiResponse<T>>().await?;
        Ok(envelope.data)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
