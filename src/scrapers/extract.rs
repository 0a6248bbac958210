use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::models::{Category, ListingRecord};

// CSS contracts with expat-dakar.com. A site markup change shows up here
// first, as fields going None en masse rather than a hard failure.
pub const CARD_SELECTOR: &str = ".listings-cards__list-item";
const TITLE_SELECTOR: &str = ".listing-card__header__title";
const LOCATION_SELECTOR: &str = ".listing-card__header__location";
const TAG_SELECTOR: &str = ".listing-card__header__tags__item";
const PRICE_SELECTOR: &str = ".listing-card__info-bar";
const IMAGE_SELECTOR: &str = ".listing-card__image__resource.vh-img";

/// Parse one results page into listing records.
///
/// Each card is extracted independently and each field inside a card is
/// optional, so a malformed card or a missing node never costs more than
/// itself. Cards without a title and without an address are discarded.
pub fn extract_listings(html: &str, category: Category) -> Vec<ListingRecord> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse(CARD_SELECTOR).unwrap();

    let mut records = Vec::new();
    let mut discarded = 0usize;
    for card in document.select(&card_selector) {
        match extract_card(card, category) {
            Some(record) => records.push(record),
            None => discarded += 1,
        }
    }
    if discarded > 0 {
        debug!("discarded {discarded} card(s) without title or address");
    }
    records
}

fn extract_card(card: ElementRef<'_>, category: Category) -> Option<ListingRecord> {
    let tag_selector = Selector::parse(TAG_SELECTOR).unwrap();
    // First two tag spans are room count and surface area; extras ignored.
    let mut tags = card.select(&tag_selector).map(element_text);

    let record = ListingRecord {
        category,
        title: select_text(card, TITLE_SELECTOR),
        address: select_text(card, LOCATION_SELECTOR),
        room_count: tags.next().flatten(),
        surface_area: tags.next().flatten(),
        price: select_text(card, PRICE_SELECTOR),
        image_url: select_attr(card, IMAGE_SELECTOR, "src"),
    };

    record.is_retainable().then_some(record)
}

fn select_text(card: ElementRef<'_>, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    card.select(&selector).next().and_then(element_text)
}

fn select_attr(card: ElementRef<'_>, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    card.select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn element_text(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
