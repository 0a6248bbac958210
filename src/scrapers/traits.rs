use crate::error::ScrapeError;
use async_trait::async_trait;

/// A source of rendered results-page HTML.
/// Implemented by the headless-browser path and by the plain-HTTP fallback,
/// so the crawl loop is identical for both.
#[async_trait]
pub trait PageSource: Send {
    /// Fetch one results page.
    ///
    /// `Ok(None)` means the page had to be skipped (retry budget exhausted,
    /// non-2xx response); the crawl continues with the next page. `Err` is
    /// also treated as a skip by the crawl loop.
    async fn fetch_page(&mut self, url: &str) -> Result<Option<String>, ScrapeError>;

    /// Get the name of the page source
    fn source_name(&self) -> &'static str;
}
