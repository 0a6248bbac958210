use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use headless_chrome::Tab;
use tracing::{debug, warn};

use crate::error::ScrapeError;
use crate::scrapers::retry::RetryPolicy;
use crate::scrapers::session::BrowserSession;
use crate::scrapers::traits::PageSource;
use crate::scrapers::types::ScraperConfig;

/// Drives an owned browser session through results pages.
///
/// Timeouts and driver errors are both retryable with a fixed short delay;
/// once the budget is spent the page is reported as skipped, never as a
/// fatal error. Individual page failures must not abort a multi-page crawl.
pub struct Navigator {
    session: BrowserSession,
    retry: RetryPolicy,
    /// Selector whose presence signals the page content arrived.
    wait_selector: Option<String>,
    settle_delay: Duration,
    ready_timeout: Duration,
}

impl Navigator {
    pub fn new(session: BrowserSession, config: &ScraperConfig, wait_selector: Option<String>) -> Self {
        Self {
            session,
            retry: config.navigation_retry,
            wait_selector,
            settle_delay: config.settle_delay,
            ready_timeout: config.session.page_timeout,
        }
    }

    /// Hand the session back for teardown.
    pub fn into_session(self) -> BrowserSession {
        self.session
    }

    fn try_fetch(&self, url: &str) -> Result<String> {
        let tab = self.session.tab();

        tab.navigate_to(url).context("navigation request failed")?;
        tab.wait_until_navigated().context("page load did not finish")?;

        if let Some(selector) = &self.wait_selector {
            tab.wait_for_element(selector)
                .with_context(|| format!("element {selector} never appeared"))?;
        }
        self.wait_for_ready(tab)?;

        // Let late-rendering listings land in the DOM before the snapshot.
        thread::sleep(self.settle_delay);

        tab.get_content().context("could not read page content")
    }

    // Bounded poll for document.readyState === "complete".
    fn wait_for_ready(&self, tab: &Tab) -> Result<()> {
        let deadline = Instant::now() + self.ready_timeout;
        loop {
            let state = tab
                .evaluate("document.readyState", false)
                .context("readyState probe failed")?
                .value;
            if state.as_ref().and_then(|v| v.as_str()) == Some("complete") {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!("document never reached readyState=complete (timed out)");
            }
            thread::sleep(Duration::from_millis(250));
        }
    }
}

#[async_trait]
impl PageSource for Navigator {
    async fn fetch_page(&mut self, url: &str) -> Result<Option<String>, ScrapeError> {
        let max_attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.try_fetch(url) {
                Ok(html) => {
                    debug!("fetched {} bytes from {url}", html.len());
                    return Ok(Some(html));
                }
                Err(err) => {
                    warn!(
                        "attempt {attempt}/{max_attempts}: {}",
                        classify(url, &err)
                    );
                    if attempt < max_attempts {
                        thread::sleep(self.retry.delay_after(attempt));
                    }
                }
            }
        }
        warn!("giving up on {url} after {max_attempts} attempt(s); page skipped");
        Ok(None)
    }

    fn source_name(&self) -> &'static str {
        "headless-chrome"
    }
}

fn classify(url: &str, err: &anyhow::Error) -> ScrapeError {
    let reason = format!("{err:#}");
    if reason.to_lowercase().contains("timed out") || reason.to_lowercase().contains("timeout") {
        ScrapeError::NavigationTimeout {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Navigation {
            url: url.to_string(),
            reason,
        }
    }
}
