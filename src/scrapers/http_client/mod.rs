//! HTTP client for product detail pages.

mod user_agent;

pub use user_agent::{resolve_user_agent, DEFAULT_USER_AGENT};

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, ExtractionConfig};

/// Why a page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Transport(err)
        }
    }
}

/// HTTP client that sends a fixed header set with every request.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    request_delay: Duration,
}

impl HttpClient {
    /// Build a client from extraction settings.
    ///
    /// Invalid header names or values are configuration errors.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let headers = build_headers(&config.headers)?;

        let mut builder = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .brotli(true);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            request_delay: config.request_delay(),
        })
    }

    /// GET a page and return its body as text.
    ///
    /// Non-2xx responses are errors. The configured delay is applied after
    /// every request, successful or not.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let result = self.fetch(url).await;

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        result
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

fn build_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ConfigError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
