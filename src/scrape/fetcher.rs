//! Scraping proxy client
//!
//! Pages are never fetched directly. Each target URL is posted to a
//! scraping proxy which renders the page and returns its markup wrapped in
//! a JSON envelope:
//!
//! ```text
//! POST <endpoint>   {"url": "<target>"}
//! 200               {"results": [{"content": "<html>...", ...}]}
//! ```

use crate::config::ProxyConfig;
use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Result of a single fetch through the proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The proxy answered; `body` is the page markup and may be empty
    Content {
        /// HTTP status code of the proxy response
        status_code: u16,
        body: String,
    },

    /// The proxy answered with a non-success status
    HttpError { status_code: u16 },

    /// No usable response (connect failure, timeout, undecodable payload)
    TransportError { error: String },
}

/// Something that can fetch a product page
///
/// Implementations must resolve each call fully before returning; the retry
/// loop never overlaps attempts.
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> FetchResult;
}

impl<T: Fetcher> Fetcher for &T {
    async fn fetch(&self, url: &str) -> FetchResult {
        (**self).fetch(url).await
    }
}

/// JSON envelope returned by the proxy
#[derive(Debug, Deserialize)]
struct ProxyResponse {
    #[serde(default)]
    results: Vec<ProxyResult>,
}

#[derive(Debug, Deserialize)]
struct ProxyResult {
    #[serde(default)]
    content: Option<serde_json::Value>,
}

impl ProxyResponse {
    /// Markup of the first result, or empty when the proxy returned none
    fn into_content(self) -> String {
        self.results
            .into_iter()
            .next()
            .and_then(|result| result.content)
            .and_then(|content| content.as_str().map(str::to_string))
            .unwrap_or_default()
    }
}

/// Builds an HTTP client for talking to the proxy
///
/// # Arguments
///
/// * `config` - The proxy configuration (timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ProxyConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by the remote scraping proxy
#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: Client,
    endpoint: String,
    authorization: String,
}

impl ProxyFetcher {
    /// Creates a fetcher from the proxy configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ProxyFetcher)` - Ready to send requests
    /// * `Err(ConfigError)` - No auth token was configured
    pub fn from_config(client: Client, config: &ProxyConfig) -> Result<Self, ConfigError> {
        let token = config
            .auth_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::Validation("proxy auth token is missing".to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            authorization: format!("Basic {}", token),
        })
    }
}

impl Fetcher for ProxyFetcher {
    /// Posts the target URL to the proxy
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 200, decodable envelope | `Content` (body may be empty) |
    /// | HTTP 200, undecodable envelope | `TransportError` |
    /// | Any other status | `HttpError` |
    /// | Timeout / connect / other send error | `TransportError` |
    async fn fetch(&self, url: &str) -> FetchResult {
        let request = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, &self.authorization)
            .json(&serde_json::json!({ "url": url }));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    format!("Connection failed: {}", e)
                } else {
                    e.to_string()
                };
                return FetchResult::TransportError { error };
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        match response.json::<ProxyResponse>().await {
            Ok(envelope) => FetchResult::Content {
                status_code: status.as_u16(),
                body: envelope.into_content(),
            },
            Err(e) => FetchResult::TransportError {
                error: format!("Invalid proxy response: {}", e),
            },
        }
    }
}
