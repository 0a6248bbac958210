pub mod error;
pub mod models;
pub mod scrapers;

pub use error::ScrapeError;
pub use models::{Category, ListingRecord, ScrapeResult};
pub use scrapers::ExpatDakarScraper;
