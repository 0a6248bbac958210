use tracing::{debug, info, warn};

use crate::error::ScrapeError;
use crate::models::{Category, ListingRecord, ScrapeResult};
use crate::scrapers::extract::{extract_listings, CARD_SELECTOR};
use crate::scrapers::fallback::FallbackFetcher;
use crate::scrapers::navigator::Navigator;
use crate::scrapers::session::BrowserSession;
use crate::scrapers::traits::PageSource;
use crate::scrapers::types::ScraperConfig;

/// Orchestrates one crawl of expat-dakar.com: session creation, the
/// sequential page loop, extraction, and the column-guaranteed result.
pub struct ExpatDakarScraper {
    config: ScraperConfig,
}

impl ExpatDakarScraper {
    pub fn new() -> Self {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Self {
        Self { config }
    }

    /// Crawl `page_count` results pages of `category` (a label from
    /// [`Category::ALL`]).
    ///
    /// Fails fast with [`ScrapeError::Configuration`] before any browser
    /// work. Page-level failures degrade completeness instead of aborting;
    /// the result always carries the full column set, even when empty.
    pub async fn run(&self, category: &str, page_count: u32) -> Result<ScrapeResult, ScrapeError> {
        let category: Category = category.parse()?;
        if page_count == 0 {
            return Err(ScrapeError::Configuration(
                "page_count must be at least 1".to_string(),
            ));
        }

        info!("Scraping {page_count} page(s) of {category}");

        match BrowserSession::create(&self.config.session) {
            Ok(session) => {
                let mut navigator =
                    Navigator::new(session, &self.config, Some(CARD_SELECTOR.to_string()));
                let records = collect_pages(&mut navigator, category, page_count).await;
                let mut session = navigator.into_session();
                session.close();
                Ok(ScrapeResult::new(records))
            }
            Err(err) if self.config.fallback_enabled => {
                warn!("{err}; switching to plain-HTTP fallback");
                let mut fetcher = FallbackFetcher::new(
                    &self.config.session.user_agent,
                    self.config.fallback_timeout,
                )
                .map_err(|build_err| ScrapeError::Session(format!("{build_err:#}")))?;
                let records = collect_pages(&mut fetcher, category, page_count).await;
                Ok(ScrapeResult::new(records))
            }
            Err(err) => Err(err),
        }
    }
}

impl Default for ExpatDakarScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Visit pages 1..=`page_count` in order through `source`, extracting and
/// appending records. Page-level failures are contained: the page is
/// skipped with a warning and the crawl continues.
pub async fn collect_pages<S: PageSource>(
    source: &mut S,
    category: Category,
    page_count: u32,
) -> Vec<ListingRecord> {
    let mut records = Vec::new();
    for page in 1..=page_count {
        let url = category.page_url(page);
        debug!("[{}] page {page}/{page_count}: {url}", source.source_name());

        match source.fetch_page(&url).await {
            Ok(Some(html)) => {
                let found = extract_listings(&html, category);
                info!("Page {page}: {} listing(s)", found.len());
                records.extend(found);
            }
            Ok(None) => warn!("Page {page} skipped"),
            Err(err) => warn!("Page {page} failed: {err}; skipping"),
        }
    }
    records
}
