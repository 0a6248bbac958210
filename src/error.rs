use thiserror::Error;

/// Errors produced by the scraping pipeline.
///
/// Only `Configuration` and `Session` ever reach the caller of
/// [`crate::ExpatDakarScraper::run`]. Navigation and fallback failures are
/// retried and then absorbed as skipped pages; they exist as variants so the
/// page sources can classify and log them uniformly.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Invalid caller input. Raised before any resource is acquired.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The browser session could not be established after exhausting the
    /// retry budget.
    #[error("browser session could not be established: {0}")]
    Session(String),

    /// A page navigation hit its timeout.
    #[error("navigation to {url} timed out")]
    NavigationTimeout { url: String },

    /// A page navigation failed below the timeout layer (driver error,
    /// protocol error, tab crash).
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// The plain-HTTP fallback could not produce a page.
    #[error("fallback fetch of {url} failed: {reason}")]
    FallbackFetch { url: String, reason: String },
}
