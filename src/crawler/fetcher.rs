//! HTTP transport implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building per-session HTTP clients with the browser-like default headers
//! - GET requests with query parameters
//! - Form POST submissions with ordered, repeatable fields
//! - Error classification (timeout vs. other transport failures)
//!
//! Status codes are not interpreted: whatever body the server returns is
//! handed to the caller together with the final URL after redirects.

use crate::config::Config;
use crate::crawler::Page;
use crate::SweepError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect::Policy, Client};

/// Headers sent with every request besides the user agent
const DEFAULT_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.7,en;q=0.3"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    ("priority", "u=0, i"),
];

/// Request/response collaborator used by the session, facet and walk steps
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET with optional query parameters
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<Page, SweepError>;

    /// Submits an urlencoded form; field order and repeated names are preserved
    async fn post(&self, url: &str, form: &[(&str, &str)]) -> Result<Page, SweepError>;
}

/// Builds the default header map
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for &(name, value) in DEFAULT_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

/// Builds an HTTP client with proper configuration
///
/// Each client carries its own cookie store, so one client corresponds to
/// exactly one marketplace session.
///
/// # Example
///
/// ```no_run
/// use facet_sweep::config::Config;
/// use facet_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.http.user_agent.as_str())
        .default_headers(default_headers())
        .timeout(config.http.timeout())
        .redirect(Policy::limited(10))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed transport owning one session's connection pool and cookies
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, SweepError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Releases the session's connections and cookies
    pub fn close(self) {
        tracing::debug!("Closing HTTP session");
        drop(self.client);
    }

    async fn read(url: &str, request: reqwest::RequestBuilder) -> Result<Page, SweepError> {
        let response = request.send().await.map_err(|e| classify(url, e))?;
        let resolved_url = response.url().to_string();
        let status = response.status();
        let body = response.text().await.map_err(|e| classify(url, e))?;

        tracing::debug!("{} -> {} ({})", url, resolved_url, status);

        Ok(Page {
            resolved_url,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<Page, SweepError> {
        let mut request = self.client.get(url);
        if !params.is_empty() {
            request = request.query(params);
        }
        Self::read(url, request).await
    }

    async fn post(&self, url: &str, form: &[(&str, &str)]) -> Result<Page, SweepError> {
        let request = self.client.post(url).form(form);
        Self::read(url, request).await
    }
}

/// Maps a reqwest failure onto the transport error taxonomy
fn classify(url: &str, error: reqwest::Error) -> SweepError {
    if error.is_timeout() {
        SweepError::Timeout {
            url: url.to_string(),
        }
    } else {
        SweepError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
