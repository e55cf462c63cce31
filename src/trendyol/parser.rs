//! HTML parsers for the Trendyol listing and product detail pages.
//!
//! Pure functions over HTML text; all I/O lives in [`crate::trendyol::client`].

use crate::trendyol::models::{Attributes, Extracted};
use crate::trendyol::selectors::{detail, listing};
use scraper::{ElementRef, Html};
use tracing::{debug, trace};

/// One listing card, before the detail page has been fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Joined name segments; `None` when the name wrapper is absent.
    pub name: Option<String>,
    /// Parsed discounted price, if the price node exists and parses.
    pub price: Option<f64>,
    /// Raw trimmed rating-count text.
    pub rating_count: Option<String>,
    /// Relative href of the product detail page.
    pub detail_href: Option<String>,
}

/// Parses the category listing page into cards.
///
/// A page with zero matching card nodes yields an empty vec, not an error.
pub fn parse_listing(html: &str) -> Vec<Card> {
    let document = Html::parse_document(html);

    let cards: Vec<Card> = document.select(&listing::CARD).map(parse_card).collect();

    debug!("Parsed {} cards from listing page", cards.len());
    cards
}

fn parse_card(element: ElementRef) -> Card {
    let name = element.select(&listing::NAME).next().map(|wrap| {
        // Segments are joined even when empty; a missing middle segment
        // leaves a double space. Matches the site's card markup quirk.
        let segments = [
            text_of(wrap, &listing::NAME_BRAND),
            text_of(wrap, &listing::NAME_MODEL),
            text_of(wrap, &listing::NAME_SUB),
        ];
        segments.join(" ")
    });

    let price = element
        .select(&listing::PRICE)
        .next()
        .and_then(|e| parse_price(&e.text().collect::<String>()));

    let rating_count = element
        .select(&listing::RATING_COUNT)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string());

    let detail_href = element
        .select(&listing::LINK)
        .next()
        .and_then(|e| e.value().attr("href"))
        .map(String::from);

    trace!("Parsed card: {:?} ({:?})", name, price);

    Card { name, price, rating_count, detail_href }
}

fn text_of(element: ElementRef, selector: &scraper::Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Parses a Trendyol price string, e.g. `"1.499 TL"` or `"1.234,56 TL"`.
///
/// Trendyol formats prices Turkish-style: `.` as thousands separator, `,`
/// as decimal point. Strips everything but digits and separators, drops
/// the thousands dots, and treats the comma as the decimal point.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String =
        text.chars().filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',')).collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = cleaned.replace('.', "").replace(',', ".");
    normalized.parse().ok()
}

/// Parses a product detail page into attributes.
///
/// Every key is looked up independently; a missing node yields `Absent`.
pub fn parse_detail(html: &str) -> Attributes {
    let document = Html::parse_document(html);

    Attributes::from_fn(|key| {
        match document.select(detail::for_key(key)).next() {
            Some(node) => Extracted::Present(node.text().collect::<String>().trim().to_string()),
            None => Extracted::Absent,
        }
    })
}
