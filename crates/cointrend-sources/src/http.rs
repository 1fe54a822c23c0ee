//! Shared HTTP client with bounded timeouts and retry.

use std::time::Duration;

use cointrend_core::AppConfig;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::retry::retry_with_backoff;

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl HttpSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.source_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

/// A `reqwest` client plus the retry policy every collector shares.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: &HttpSettings) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(
                CONNECT_TIMEOUT_SECS.min(settings.timeout_secs.max(1)),
            ))
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Sends the request built by `build` and decodes the JSON body, retrying
    /// transient failures. `build` runs once per attempt.
    pub(crate) async fn fetch_json<T, B>(&self, source: &str, build: B) -> Result<T, SourceError>
    where
        T: DeserializeOwned,
        B: Fn(&Client) -> RequestBuilder,
    {
        let client = &self.client;
        let build = &build;
        retry_with_backoff(source, self.max_retries, self.backoff_base_ms, || async move {
            let response = build(client).send().await?;
            let response = response.error_for_status()?;
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
                context: source.to_string(),
                source: e,
            })
        })
        .await
    }
}

/// Joins `path` onto `base`, tolerating a trailing slash on the base.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url, SourceError> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| SourceError::InvalidBaseUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// Flattens a JSON scalar into a raw table cell. `null` becomes an absent cell.
pub(crate) fn json_cell(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
