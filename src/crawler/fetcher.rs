//! HTTP fetcher implementation
//!
//! Builds the shared HTTP client and performs single GET requests with the
//! per-domain headers and cookies from the configuration. Redirects are
//! followed by the client; the final URL is reported back.

use crate::config::{DomainConfig, UserAgentConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Longest redirect chain the client follows
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        status_code: u16,
        body: String,
    },

    /// Page is not HTML
    ContentMismatch {
        /// The Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status
    HttpError { status_code: u16 },

    /// Connection, timeout or body read failure
    NetworkError { error: String },
}

impl FetchResult {
    /// Short description of a failed fetch, `None` on success
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::ContentMismatch { content_type } => {
                Some(format!("not an HTML page (Content-Type: {})", content_type))
            }
            Self::HttpError { status_code } => Some(format!("HTTP status {}", status_code)),
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds an HTTP client with the configured user agent and timeout
///
/// # Example
///
/// ```no_run
/// use page_scribe::config::UserAgentConfig;
/// use page_scribe::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Request headers for one domain, cookies folded into a single `Cookie`
///
/// Entries that are not valid header names or values are skipped with a
/// warning.
pub fn domain_headers(domain: &DomainConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for (name, value) in &domain.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid configured header"),
        }
    }

    if let Some(cookie) = cookie_header(domain) {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                headers.insert(COOKIE, value);
            }
            Err(_) => tracing::warn!("Skipping invalid configured cookies"),
        }
    }

    headers
}

/// `k=v; k2=v2` sorted by cookie name, `None` without cookies
fn cookie_header(domain: &DomainConfig) -> Option<String> {
    if domain.cookies.is_empty() {
        return None;
    }
    let mut pairs: Vec<(&String, &String)> = domain.cookies.iter().collect();
    pairs.sort();
    Some(
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    mime.eq_ignore_ascii_case("text/html") || mime.eq_ignore_ascii_case("application/xhtml+xml")
}

/// Fetches a URL
///
/// `domain` carries the headers and cookies configured for the URL's host.
/// A missing Content-Type is treated as HTML.
pub async fn fetch_url(client: &Client, url: &str, domain: Option<&DomainConfig>) -> FetchResult {
    let mut request = client.get(url);
    if let Some(domain) = domain {
        request = request.headers(domain_headers(domain));
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else if e.is_redirect() {
                format!("Redirect error: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.is_empty() && !is_html(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: format!("Failed to read body: {}", e),
        },
    }
}
