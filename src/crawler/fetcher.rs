//! HTTP fetcher implementation
//!
//! This module handles the listing page requests, including:
//! - Building an HTTP client that sends a fixed browser header set
//! - Building the page URL for a result offset
//! - A single GET per page, with status and transport error classification
//!
//! There is no retry and no cookie store: one request per page, and any
//! failure is reported to the caller.

use crate::config::{CrawlerConfig, RequestConfig};
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Source of raw listing markup, one page per offset
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// URL of the listing page at `offset`, used for logging and errors
    fn page_url(&self, offset: u32) -> String;

    /// Fetches the listing page at `offset` and returns its body
    async fn fetch_page(&self, offset: u32) -> Result<String, HarvestError>;
}

/// Builds the HTTP client used for listing requests
///
/// # Arguments
///
/// * `request` - Headers sent with every request
/// * `timeout_secs` - Whole-request timeout; 0 leaves requests unbounded
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(HarvestError)` - A header was invalid or the client failed to build
///
/// # Example
///
/// ```no_run
/// use reel_harvest::config::RequestConfig;
/// use reel_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&RequestConfig::default(), 0).unwrap();
/// ```
pub fn build_http_client(request: &RequestConfig, timeout_secs: u64) -> Result<Client, HarvestError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &request.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| HarvestError::InvalidHeader {
                name: name.clone(),
                message: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| HarvestError::InvalidHeader {
            name: name.clone(),
            message: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    let mut builder = Client::builder()
        .default_headers(headers)
        .gzip(true)
        .brotli(true);

    if timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }

    builder.build().map_err(|e| HarvestError::Http {
        url: String::new(),
        source: e,
    })
}

/// Fetches listing pages over HTTP
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
    offset_param: String,
}

impl HttpFetcher {
    /// Creates a fetcher from an existing client
    pub fn new(client: Client, base_url: Url, offset_param: impl Into<String>) -> Self {
        Self {
            client,
            base_url,
            offset_param: offset_param.into(),
        }
    }

    /// Creates a fetcher and its client from configuration
    pub fn from_config(crawler: &CrawlerConfig, request: &RequestConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(request, crawler.request_timeout_secs)?;
        let base_url = Url::parse(&crawler.base_url)?;
        Ok(Self::new(client, base_url, crawler.offset_param.clone()))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    fn page_url(&self, offset: u32) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.offset_param, &offset.to_string());
        url.to_string()
    }

    async fn fetch_page(&self, offset: u32) -> Result<String, HarvestError> {
        let url = self.page_url(offset);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HarvestError::Http {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| HarvestError::Http { url, source: e })
    }
}
