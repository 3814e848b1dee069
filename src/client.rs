//! Shared Together AI HTTP client.

use crate::error::{GenChatError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Default Together AI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "TOGETHER_API_KEY";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "TOGETHER_BASE_URL";

/// Builder for [`TogetherClient`].
#[derive(Debug, Clone)]
pub struct TogetherClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
}

impl Default for TogetherClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout: Duration::from_secs(120),
        }
    }
}

impl TogetherClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `TOGETHER_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API base URL. Falls back to `TOGETHER_BASE_URL`, then the
    /// public endpoint.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client, resolving the API key and base URL.
    pub fn build(self) -> Result<TogetherClient> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                GenChatError::Auth(format!("{API_KEY_ENV} not set and no API key provided"))
            })?;

        let base_url = self
            .base_url
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(TogetherClient {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Authenticated handle to the Together AI API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct TogetherClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for TogetherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TogetherClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TogetherClient {
    /// Creates a new `TogetherClientBuilder`.
    pub fn builder() -> TogetherClientBuilder {
        TogetherClientBuilder::new()
    }

    /// Returns the API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs a JSON body to `{base_url}/{path}` and decodes the JSON reply.
    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %url, "endpoint returned an error");
            return Err(GenChatError::from_status(status.as_u16(), &text));
        }

        Ok(response.json().await?)
    }

    /// Downloads raw bytes from an absolute URL (no auth header).
    pub(crate) async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %url, "image download failed");
            return Err(GenChatError::Api {
                status: status.as_u16(),
                message: "Failed to download image".into(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
