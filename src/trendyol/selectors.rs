//! CSS selectors for Trendyol HTML parsing.
//!
//! This file contains all CSS selectors used for parsing Trendyol pages.
//! Update this file when Trendyol changes their HTML structure.
//!
//! **Update process**: When parsing fails, capture HTML sample,
//! update selectors, and add test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the category listing page.
pub mod listing {
    use super::*;

    /// Product card container.
    pub static CARD: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.p-card-chldrn-cntnr.card-border").unwrap());

    /// Wrapper around the three name sub-labels.
    pub static NAME: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("h3.prdct-desc-cntnr-ttl-w").unwrap());

    /// Brand segment of the name.
    pub static NAME_BRAND: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.prdct-desc-cntnr-ttl").unwrap());

    /// Model segment of the name.
    pub static NAME_MODEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.prdct-desc-cntnr-name").unwrap());

    /// Sub-text segment of the name.
    pub static NAME_SUB: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.product-desc-sub-text").unwrap());

    /// Discounted price box.
    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.prc-box-dscntd").unwrap());

    /// Rating count, e.g. "(1.234)".
    pub static RATING_COUNT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.ratingCount").unwrap());

    /// Card link to the product detail page.
    pub static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
}

/// Selectors for product detail pages.
pub mod detail {
    use super::*;
    use crate::trendyol::models::AttrKey;

    /// Attribute value related to its label: a `span[title=..]` marker,
    /// sibling value span, nested name node.
    fn attribute_selector(label: &str) -> Selector {
        Selector::parse(&format!(
            "span[title=\"{label}\"] + span.attribute-value > div.attr-name.attr-name-w"
        ))
        .unwrap()
    }

    pub static DPI: LazyLock<Selector> =
        LazyLock::new(|| attribute_selector(AttrKey::Dpi.label()));

    pub static RGB_LIGHTING: LazyLock<Selector> =
        LazyLock::new(|| attribute_selector(AttrKey::RgbLighting.label()));

    pub static MOUSE_TYPE: LazyLock<Selector> =
        LazyLock::new(|| attribute_selector(AttrKey::MouseType.label()));

    pub static BUTTON_COUNT: LazyLock<Selector> =
        LazyLock::new(|| attribute_selector(AttrKey::ButtonCount.label()));

    /// Selector for one attribute key.
    pub fn for_key(key: AttrKey) -> &'static Selector {
        match key {
            AttrKey::Dpi => &DPI,
            AttrKey::RgbLighting => &RGB_LIGHTING,
            AttrKey::MouseType => &MOUSE_TYPE,
            AttrKey::ButtonCount => &BUTTON_COUNT,
        }
    }
}
