use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::{debug, warn};

use crate::error::ScrapeError;
use crate::scrapers::session::ACCEPT_LANGUAGE as SITE_ACCEPT_LANGUAGE;
use crate::scrapers::traits::PageSource;

/// Plain-HTTP fetch path, used when the browser session cannot be
/// established. Sends browser-like headers and never raises past this
/// boundary: any failure degrades the page to `None`.
pub struct FallbackFetcher {
    client: reqwest::Client,
}

impl FallbackFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(SITE_ACCEPT_LANGUAGE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).context("Invalid user agent")?,
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Option<String> {
        debug!("Fetching URL: {url}");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    "{}",
                    ScrapeError::FallbackFetch {
                        url: url.to_string(),
                        reason: err.to_string(),
                    }
                );
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "{}",
                ScrapeError::FallbackFetch {
                    url: url.to_string(),
                    reason: format!("status {}", response.status()),
                }
            );
            return None;
        }

        match response.text().await {
            Ok(body) => {
                debug!("Downloaded {} bytes of HTML", body.len());
                Some(body)
            }
            Err(err) => {
                warn!(
                    "{}",
                    ScrapeError::FallbackFetch {
                        url: url.to_string(),
                        reason: format!("failed to read body: {err}"),
                    }
                );
                None
            }
        }
    }
}

#[async_trait]
impl PageSource for FallbackFetcher {
    async fn fetch_page(&mut self, url: &str) -> Result<Option<String>, ScrapeError> {
        Ok(self.fetch(url).await)
    }

    fn source_name(&self) -> &'static str {
        "http-fallback"
    }
}
