pub mod expat_dakar;
pub mod extract;
pub mod fallback;
pub mod navigator;
pub mod retry;
pub mod session;
pub mod traits;
pub mod types;

pub use expat_dakar::{collect_pages, ExpatDakarScraper};
pub use fallback::FallbackFetcher;
pub use navigator::Navigator;
pub use retry::RetryPolicy;
pub use session::{BrowserSession, SessionConfig};
pub use traits::PageSource;
pub use types::ScraperConfig;
