use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info, warn};

use crate::error::ScrapeError;
use crate::scrapers::retry::RetryPolicy;

/// Desktop Chrome user agent sent on both the browser and fallback paths.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept-Language matching the site's francophone audience.
pub const ACCEPT_LANGUAGE: &str = "fr-FR,fr;q=0.9,en-US;q=0.8,en;q=0.7";

// The target site refuses sessions that advertise themselves as automated,
// so the webdriver flag and friends are overridden on every new document.
const STEALTH_SCRIPT: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined,
        configurable: true
    });
    window.chrome = window.chrome || { runtime: {} };
    Object.defineProperty(navigator, 'languages', {
        get: () => ['fr-FR', 'fr', 'en-US', 'en']
    });
"#;

/// Configuration for the headless browser session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub headless: bool,
    /// Page-load timeout, also applied as the tab's default element wait.
    pub page_timeout: Duration,
    pub window_size: (u32, u32),
    pub user_agent: String,
    /// Launch retries, exponential backoff.
    pub retry: RetryPolicy,
    /// Chrome profile directory. Wiped and recreated when a launch failure
    /// looks like stale profile state (SingletonLock and the like).
    pub profile_dir: Option<PathBuf>,
    /// Explicit Chrome executable; `None` lets the library locate one.
    pub browser_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            page_timeout: Duration::from_secs(30),
            window_size: (1920, 1080),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::exponential(3, Duration::from_secs(2)),
            profile_dir: Some(std::env::temp_dir().join("dakar-scout-profile")),
            browser_path: None,
        }
    }
}

/// A live headless-Chrome session with one tab.
///
/// Teardown is guaranteed: `close` drops the browser process explicitly and
/// `Drop` backstops every other exit path. Both are idempotent.
pub struct BrowserSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch Chrome, retrying with exponential backoff up to the budget.
    pub fn create(config: &SessionConfig) -> Result<Self, ScrapeError> {
        let max_attempts = config.retry.max_attempts.max(1);
        let mut last_error = String::from("no launch attempted");

        for attempt in 1..=max_attempts {
            match Self::launch(config) {
                Ok(session) => {
                    if attempt > 1 {
                        info!("Chrome launched on attempt {attempt}/{max_attempts}");
                    }
                    return Ok(session);
                }
                Err(err) => {
                    warn!("Chrome launch attempt {attempt}/{max_attempts} failed: {err:#}");
                    if looks_cache_related(&err) {
                        clear_profile(config);
                    }
                    last_error = format!("{err:#}");
                    if attempt < max_attempts {
                        let delay = config.retry.delay_after(attempt);
                        debug!("retrying launch in {delay:?}");
                        thread::sleep(delay);
                    }
                }
            }
        }

        Err(ScrapeError::Session(last_error))
    }

    fn launch(config: &SessionConfig) -> Result<Self> {
        info!("Launching headless Chrome...");

        let window_arg = format!(
            "--window-size={},{}",
            config.window_size.0, config.window_size.1
        );
        let ua_arg = format!("--user-agent={}", config.user_agent);
        let args = vec![
            OsStr::new("--disable-gpu"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-blink-features=AutomationControlled"),
            OsStr::new("--no-first-run"),
            OsStr::new("--no-default-browser-check"),
            OsStr::new("--lang=fr-FR"),
            OsStr::new(&window_arg),
            OsStr::new(&ua_arg),
        ];

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .window_size(Some(config.window_size))
            .idle_browser_timeout(Duration::from_secs(90))
            .path(config.browser_path.clone())
            .user_data_dir(config.profile_dir.clone())
            .args(args)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open tab")?;

        tab.set_default_timeout(config.page_timeout);
        tab.set_user_agent(&config.user_agent, Some(ACCEPT_LANGUAGE), None)
            .context("Failed to set user agent")?;
        tab.call_method(Page::AddScriptToEvaluateOnNewDocument {
            source: STEALTH_SCRIPT.to_string(),
            world_name: None,
            include_command_line_api: None,
            run_immediately: None,
        })
        .context("Failed to install fingerprint overrides")?;

        Ok(Self {
            browser: Some(browser),
            tab,
        })
    }

    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    pub fn is_closed(&self) -> bool {
        self.browser.is_none()
    }

    /// Shut the browser process down. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(browser) = self.browser.take() {
            debug!("shutting down browser process");
            drop(browser);
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn looks_cache_related(err: &anyhow::Error) -> bool {
    let message = format!("{err:#}").to_lowercase();
    ["singleton", "user data directory", "cache", "no such file", "profile"]
        .iter()
        .any(|marker| message.contains(marker))
}

fn clear_profile(config: &SessionConfig) {
    if let Some(dir) = &config.profile_dir {
        if dir.exists() {
            warn!("clearing browser profile at {}", dir.display());
            if let Err(err) = std::fs::remove_dir_all(dir) {
                warn!("could not clear profile: {err}");
            }
        }
    }
}
