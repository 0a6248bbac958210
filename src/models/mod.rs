use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Listing category on expat-dakar.com. Selects the URL template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ForRentApartment,
    FurnishedApartment,
    LandForSale,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::ForRentApartment,
        Category::FurnishedApartment,
        Category::LandForSale,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::ForRentApartment => "for-rent-apartment",
            Category::FurnishedApartment => "furnished-apartment",
            Category::LandForSale => "land-for-sale",
        }
    }

    /// Results-page URL for a 1-based page index.
    ///
    /// All three categories paginate with `?page=`; the site serves page 1
    /// both with and without the parameter.
    pub fn page_url(&self, page: u32) -> String {
        format!("{}?page={}", self.base_url(), page)
    }

    fn base_url(&self) -> &'static str {
        match self {
            Category::ForRentApartment => "https://www.expat-dakar.com/appartements-a-louer",
            Category::FurnishedApartment => "https://www.expat-dakar.com/appartements-meubles",
            Category::LandForSale => "https://www.expat-dakar.com/terrains-a-vendre",
        }
    }
}

impl FromStr for Category {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "for-rent-apartment" => Ok(Category::ForRentApartment),
            "furnished-apartment" => Ok(Category::FurnishedApartment),
            "land-for-sale" => Ok(Category::LandForSale),
            other => Err(ScrapeError::Configuration(format!(
                "unknown category: {other}"
            ))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One extracted advertisement.
///
/// Every text field is optional: a missing DOM node yields `None` for that
/// field only. Values are trimmed before storage; price and the two tag
/// spans keep whatever formatting the site uses, numeric extraction is left
/// to consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub category: Category,
    pub title: Option<String>,
    pub address: Option<String>,
    pub room_count: Option<String>,
    pub surface_area: Option<String>,
    pub price: Option<String>,
    pub image_url: Option<String>,
}

impl ListingRecord {
    /// Retention invariant: a record is kept only if it carries a title or
    /// an address.
    pub fn is_retainable(&self) -> bool {
        fn present(field: &Option<String>) -> bool {
            field.as_deref().is_some_and(|s| !s.is_empty())
        }
        present(&self.title) || present(&self.address)
    }
}

/// Column set every [`ScrapeResult`] exposes, in output order. Columns with
/// no data in any record still appear, with empty values.
pub const COLUMNS: [&str; 7] = [
    "category",
    "title",
    "address",
    "room_count",
    "surface_area",
    "price",
    "image_url",
];

/// The tabular outcome of one crawl: records in page-then-card order plus
/// the fixed column contract. Immutable once returned.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeResult {
    records: Vec<ListingRecord>,
    scraped_at: DateTime<Utc>,
}

impl ScrapeResult {
    pub fn new(records: Vec<ListingRecord>) -> Self {
        Self {
            records,
            scraped_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn scraped_at(&self) -> DateTime<Utc> {
        self.scraped_at
    }

    /// Render the dataset as CSV with a header row. Missing fields become
    /// empty cells, so the column contract holds even for an empty crawl.
    pub fn to_csv(&self) -> anyhow::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(COLUMNS)?;
        for record in &self.records {
            writer.write_record([
                record.category.label(),
                record.title.as_deref().unwrap_or(""),
                record.address.as_deref().unwrap_or(""),
                record.room_count.as_deref().unwrap_or(""),
                record.surface_area.as_deref().unwrap_or(""),
                record.price.as_deref().unwrap_or(""),
                record.image_url.as_deref().unwrap_or(""),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("failed to flush csv writer: {err}"))?;
        Ok(String::from_utf8(bytes)?)
    }
}
