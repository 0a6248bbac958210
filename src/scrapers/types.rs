use std::time::Duration;

use crate::scrapers::retry::RetryPolicy;
use crate::scrapers::session::SessionConfig;

/// Tunable knobs for one crawl.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Browser launch configuration, including its retry budget.
    pub session: SessionConfig,
    /// Per-page navigation retries. Fixed short delay, not exponential.
    pub navigation_retry: RetryPolicy,
    /// Pause after each navigation so late-rendering listings settle.
    pub settle_delay: Duration,
    /// Switch the whole crawl to the plain-HTTP path when the browser
    /// session cannot be established.
    pub fallback_enabled: bool,
    /// Timeout for fallback HTTP requests.
    pub fallback_timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            navigation_retry: RetryPolicy::fixed(3, Duration::from_millis(1500)),
            settle_delay: Duration::from_secs(2),
            fallback_enabled: true,
            fallback_timeout: Duration::from_secs(20),
        }
    }
}
