//! HTTP access to the SCON site.
//!
//! The session talks to the network only through the [`FetchHtml`] trait, so
//! the pagination logic can be exercised against canned pages. [`HttpFetcher`]
//! is the real implementation: one blocking GET per call with a fixed set of
//! browser-like headers.
//!
//! Any status other than 200 OK is reported as [`SearchError::Status`].

use crate::error::SearchError;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::StatusCode;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Root of the site; also sent as the referer.
pub const SITE_ROOT: &str = "https://scon.stj.jus.br/";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const HTML_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const PT_BR_ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7";

/// Something that can turn a URL into a raw response body.
///
/// The body is returned as bytes because the site does not always send
/// valid UTF-8; decoding happens during extraction.
pub trait FetchHtml {
    /// Fetch `url` and return the body of a 200 response.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on transport failure or a non-200 status.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, SearchError>;
}

/// Blocking `reqwest` client carrying the fixed SCON header set.
pub struct HttpFetcher {
    client: Client,
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("user_agent", &BROWSER_USER_AGENT)
            .finish()
    }
}

impl HttpFetcher {
    /// Build a fetcher with the default header set.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Client`] if the TLS backend cannot be set up.
    pub fn new() -> Result<Self, SearchError> {
        let client = Client::builder()
            .default_headers(default_headers())
            .build()
            .map_err(|e| SearchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

/// The header set sent with every request.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(HTML_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(PT_BR_ACCEPT_LANGUAGE));
    headers.insert(REFERER, HeaderValue::from_static(SITE_ROOT));
    headers
}

impl FetchHtml for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    fn fetch(&self, url: &str) -> Result<Vec<u8>, SearchError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send()?;
        let status = response.status();

        if status != StatusCode::OK {
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis(),
                "Site returned a non-OK status"
            );
            return Err(SearchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes()?.to_vec();
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Fetched results page"
        );
        Ok(body)
    }
}
