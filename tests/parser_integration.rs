//! Integration tests for the HTML parsers using fixture files.

use trendyol_scout::trendyol::models::{AttrKey, Extracted};
use trendyol_scout::trendyol::parser;

const LISTING_FIXTURE: &str = include_str!("fixtures/listing.html");
const DETAIL_FIXTURE: &str = include_str!("fixtures/detail.html");

#[test]
fn test_parse_listing_fixture() {
    let cards = parser::parse_listing(LISTING_FIXTURE);
    assert_eq!(cards.len(), 3);

    // Full card
    let card = &cards[0];
    assert_eq!(
        card.name.as_deref(),
        Some("Logitech G Pro X Superlight Kablosuz Oyuncu Mouse")
    );
    assert_eq!(card.price, Some(1499.0));
    assert_eq!(card.rating_count.as_deref(), Some("(1.234)"));
    assert_eq!(card.detail_href.as_deref(), Some("/logitech/g-pro-x-superlight-p-101"));

    // Missing middle name segment (double space preserved) and missing price
    let card = &cards[1];
    assert_eq!(card.name.as_deref(), Some("SteelSeries  Rival 3"));
    assert!(card.price.is_none());
    assert_eq!(card.rating_count.as_deref(), Some("(87)"));

    // No link, no rating; Turkish decimal price
    let card = &cards[2];
    assert_eq!(card.name.as_deref(), Some("Everest SM-18 "));
    assert_eq!(card.price, Some(249.9));
    assert!(card.rating_count.is_none());
    assert!(card.detail_href.is_none());
}

#[test]
fn test_parse_detail_fixture() {
    let attrs = parser::parse_detail(DETAIL_FIXTURE);

    assert_eq!(attrs.get(AttrKey::Dpi).value(), Some("25600"));
    assert_eq!(attrs.get(AttrKey::MouseType).value(), Some("Kablosuz"));
    assert_eq!(attrs.get(AttrKey::ButtonCount).value(), Some("6"));
    // The page lists a warranty row but no RGB row; unrelated attributes
    // are ignored and the missing one is a parse miss, not a fetch failure.
    assert_eq!(*attrs.get(AttrKey::RgbLighting), Extracted::Absent);
}

#[test]
fn test_parse_empty_listing() {
    let cards = parser::parse_listing("<html><body><p>Sonuç bulunamadı</p></body></html>");
    assert!(cards.is_empty());
}
