//! HTTP client for downloading job posting pages.
//!
//! Job portals aggressively block anything that does not look like a
//! browser, so every request carries a full set of browser headers.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::debug;

use crate::error::ScrapeError;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("de-DE,de;q=0.9,en;q=0.8"),
    );
    headers.insert("dnt", HeaderValue::from_static("1"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers
}

/// Reusable HTTP client with browser headers and a request timeout.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }

    /// Download a page and return its HTML body. Portal anti-bot
    /// responses are mapped to dedicated error variants so callers can
    /// tell "blocked" apart from "gone".
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("fetching {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        match status.as_u16() {
            403 => return Err(ScrapeError::Blocked(url.to_string())),
            404 => return Err(ScrapeError::NotFound(url.to_string())),
            429 => return Err(ScrapeError::RateLimited(url.to_string())),
            code if !status.is_success() => {
                return Err(ScrapeError::Http {
                    status: code,
                    url: url.to_string(),
                });
            }
            _ => {}
        }
        Ok(response.text().await?)
    }
}
