//! Orchestration-loop tests over mock page sources: no browser, no network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dakar_scout::error::ScrapeError;
use dakar_scout::models::{Category, ScrapeResult, COLUMNS};
use dakar_scout::scrapers::{
    collect_pages, ExpatDakarScraper, PageSource, RetryPolicy, ScraperConfig,
};

/// Render a results page with one card per (title, price) pair.
fn page_html(cards: &[(&str, &str)]) -> String {
    let mut html = String::from("<html><body><div class=\"listings-cards__list\">");
    for (title, price) in cards {
        html.push_str(&format!(
            "<div class=\"listings-cards__list-item \">\
               <div class=\"listing-card__header__title\">{title}</div>\
               <div class=\"listing-card__header__location\">Dakar</div>\
               <div class=\"listing-card__info-bar\">{price}</div>\
             </div>"
        ));
    }
    html.push_str("</div></body></html>");
    html
}

/// Scripted page source: one queued outcome per expected fetch, plus
/// teardown tracking through its `Drop`.
struct ScriptedSource {
    responses: VecDeque<Result<Option<String>, ScrapeError>>,
    fetched_urls: Vec<String>,
    teardowns: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<Option<String>, ScrapeError>>) -> Self {
        Self {
            responses: responses.into(),
            fetched_urls: Vec::new(),
            teardowns: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        self.teardowns.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(&mut self, url: &str) -> Result<Option<String>, ScrapeError> {
        self.fetched_urls.push(url.to_string());
        self.responses.pop_front().unwrap_or(Ok(None))
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

#[tokio::test]
async fn unknown_category_fails_before_any_fetch() {
    let scraper = ExpatDakarScraper::new();
    let err = scraper.run("offices-for-rent", 2).await.unwrap_err();
    assert!(matches!(err, ScrapeError::Configuration(_)));
}

#[tokio::test]
async fn zero_pages_is_a_configuration_error() {
    let scraper = ExpatDakarScraper::new();
    let err = scraper.run("land-for-sale", 0).await.unwrap_err();
    assert!(matches!(err, ScrapeError::Configuration(_)));
}

#[tokio::test]
async fn session_failure_with_fallback_disabled_propagates() {
    let mut config = ScraperConfig::default();
    config.fallback_enabled = false;
    config.session.browser_path = Some("/nonexistent/chrome-binary".into());
    config.session.retry = RetryPolicy::exponential(2, Duration::from_millis(10));

    let scraper = ExpatDakarScraper::with_config(config);
    let err = scraper.run("land-for-sale", 1).await.unwrap_err();
    assert!(matches!(err, ScrapeError::Session(_)));
}

#[tokio::test]
async fn skipped_page_does_not_abort_the_crawl() {
    let mut source = ScriptedSource::new(vec![
        Err(ScrapeError::NavigationTimeout {
            url: "page-1".to_string(),
        }),
        Ok(Some(page_html(&[
            ("Appartement F2 Ouakam", "350 000 F Cfa"),
            ("Appartement F3 Ngor", "500 000 F Cfa"),
        ]))),
    ]);

    let records = collect_pages(&mut source, Category::ForRentApartment, 2).await;

    assert_eq!(source.fetched_urls.len(), 2, "both pages must be attempted");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title.as_deref(), Some("Appartement F2 Ouakam"));
}

#[tokio::test]
async fn pages_are_visited_in_increasing_order() {
    let mut source = ScriptedSource::new(vec![Ok(None), Ok(None), Ok(None)]);
    collect_pages(&mut source, Category::FurnishedApartment, 3).await;

    let expected: Vec<String> = (1..=3)
        .map(|page| Category::FurnishedApartment.page_url(page))
        .collect();
    assert_eq!(source.fetched_urls, expected);
}

#[tokio::test]
async fn land_for_sale_two_page_scenario() {
    // Page 1 yields three well-formed cards; page 2 timed out twice inside
    // the source's retry budget and then succeeded with one card.
    let mut source = ScriptedSource::new(vec![
        Ok(Some(page_html(&[
            ("Terrain 150 m2 Keur Massar", "9 000 000 F Cfa"),
            ("Terrain 300 m2 Diamniadio", "18 000 000 F Cfa"),
            ("Terrain 500 m2 Lac Rose", "25 000 000 F Cfa"),
        ]))),
        Ok(Some(page_html(&[(
            "Terrain 200 m2 Rufisque",
            "12 000 000 F Cfa",
        )]))),
    ]);
    let teardowns = source.teardowns.clone();

    let records = collect_pages(&mut source, Category::LandForSale, 2).await;

    assert_eq!(records.len(), 4);
    let titles: Vec<_> = records
        .iter()
        .map(|r| r.title.as_deref().unwrap())
        .collect();
    assert_eq!(
        titles,
        [
            "Terrain 150 m2 Keur Massar",
            "Terrain 300 m2 Diamniadio",
            "Terrain 500 m2 Lac Rose",
            "Terrain 200 m2 Rufisque",
        ],
        "page order then within-page order must be preserved"
    );

    drop(source);
    assert_eq!(
        teardowns.load(Ordering::SeqCst),
        1,
        "the page source must be torn down exactly once"
    );
}

#[tokio::test]
async fn empty_crawl_still_carries_the_full_column_set() {
    let mut source = ScriptedSource::new(vec![Ok(None)]);
    let records = collect_pages(&mut source, Category::ForRentApartment, 1).await;
    let result = ScrapeResult::new(records);

    assert!(result.is_empty());
    assert_eq!(result.columns(), COLUMNS);

    let csv = result.to_csv().unwrap();
    assert_eq!(
        csv.lines().next().unwrap(),
        COLUMNS.join(","),
        "an empty dataset is still well-shaped"
    );
}
