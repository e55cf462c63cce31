//! Listing scrape orchestration: fetch the category page, then enrich each
//! card with detail-page attributes.

use crate::trendyol::client::{FetchError, TrendyolFetch};
use crate::trendyol::models::{Attributes, Product};
use crate::trendyol::parser;
use tracing::{debug, info, warn};

/// Drives one full scrape of the listing plus per-product detail pages.
pub struct Scraper<C: TrendyolFetch> {
    client: C,
}

impl<C: TrendyolFetch> Scraper<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Scrapes the listing and, per card, its detail page.
    ///
    /// A listing fetch failure is surfaced as an error; it is not collapsed
    /// into an empty product list. Detail fetches run sequentially in card
    /// order (the client's politeness delay applies between requests); a
    /// failed detail fetch marks that product's attributes `Unavailable`
    /// and the scrape continues.
    pub async fn scrape(&self) -> Result<Vec<Product>, FetchError> {
        let html = self.client.listing().await?;
        let cards = parser::parse_listing(&html);

        info!("Listing returned {} cards", cards.len());

        let mut products = Vec::with_capacity(cards.len());

        for card in cards {
            let attributes = match &card.detail_href {
                None => {
                    debug!("Card without detail link, skipping detail fetch");
                    Attributes::all_absent()
                }
                Some(href) => {
                    let url = format!("{}{}", self.client.origin(), href);
                    match self.client.detail(&url).await {
                        Ok(detail_html) => parser::parse_detail(&detail_html),
                        Err(e) => {
                            warn!("Detail fetch failed for {}: {}", url, e);
                            Attributes::all_unavailable()
                        }
                    }
                }
            };

            products.push(Product {
                name: card.name,
                prices: card.price.into_iter().collect(),
                rating_count: card.rating_count,
                attributes,
            });
        }

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trendyol::models::{AttrKey, Extracted};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Mock Trendyol client for testing.
    struct MockClient {
        listing_response: Result<String, u16>,
        detail_response: Result<String, u16>,
        detail_call_count: Arc<AtomicU32>,
    }

    impl MockClient {
        fn new(listing: Result<&str, u16>, detail: Result<&str, u16>) -> Self {
            Self {
                listing_response: listing.map(String::from),
                detail_response: detail.map(String::from),
                detail_call_count: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl TrendyolFetch for MockClient {
        async fn listing(&self) -> Result<String, FetchError> {
            self.listing_response.clone().map_err(FetchError::Status)
        }

        async fn detail(&self, _url: &str) -> Result<String, FetchError> {
            self.detail_call_count.fetch_add(1, Ordering::SeqCst);
            self.detail_response.clone().map_err(FetchError::Status)
        }

        fn origin(&self) -> String {
            "https://www.trendyol.com".to_string()
        }
    }

    const LISTING_WITH_LINK: &str = r#"
        <div class="p-card-chldrn-cntnr card-border">
            <a href="/logitech-g-pro-x-p-101">
                <h3 class="prdct-desc-cntnr-ttl-w">
                    <span class="prdct-desc-cntnr-ttl">Logitech</span>
                    <span class="prdct-desc-cntnr-name">G Pro X</span>
                </h3>
                <div class="prc-box-dscntd">1.499 TL</div>
                <span class="ratingCount">(1.234)</span>
            </a>
        </div>
    "#;

    const LISTING_WITHOUT_LINK: &str = r#"
        <div class="p-card-chldrn-cntnr card-border">
            <h3 class="prdct-desc-cntnr-ttl-w">
                <span class="prdct-desc-cntnr-ttl">Razer</span>
            </h3>
        </div>
    "#;

    const DETAIL: &str = r#"
        <span title="Mouse Tipi">Mouse Tipi</span>
        <span class="attribute-value"><div class="attr-name attr-name-w">Kablolu</div></span>
    "#;

    #[tokio::test]
    async fn test_scrape_enriches_with_detail() {
        let scraper = Scraper::new(MockClient::new(Ok(LISTING_WITH_LINK), Ok(DETAIL)));

        let products = scraper.scrape().await.unwrap();
        assert_eq!(products.len(), 1);

        let product = &products[0];
        assert_eq!(product.prices, vec![1499.0]);
        assert_eq!(product.attributes.get(AttrKey::MouseType).value(), Some("Kablolu"));
        assert_eq!(*product.attributes.get(AttrKey::Dpi), Extracted::Absent);
    }

    #[tokio::test]
    async fn test_listing_fetch_failure_is_an_error() {
        let scraper = Scraper::new(MockClient::new(Err(500), Ok(DETAIL)));

        let err = scraper.scrape().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(500)));
    }

    #[tokio::test]
    async fn test_empty_listing_yields_no_products() {
        let scraper = Scraper::new(MockClient::new(Ok("<html></html>"), Ok(DETAIL)));

        let products = scraper.scrape().await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_detail_failure_marks_all_keys_unavailable() {
        let scraper = Scraper::new(MockClient::new(Ok(LISTING_WITH_LINK), Err(404)));

        let products = scraper.scrape().await.unwrap();
        assert_eq!(products.len(), 1);

        for key in AttrKey::ALL {
            assert_eq!(*products[0].attributes.get(key), Extracted::Unavailable);
        }
    }

    #[tokio::test]
    async fn test_card_without_link_never_fetches_detail() {
        let client = MockClient::new(Ok(LISTING_WITHOUT_LINK), Ok(DETAIL));
        let calls = client.detail_call_count.clone();
        let scraper = Scraper::new(client);

        let products = scraper.scrape().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        for key in AttrKey::ALL {
            assert_eq!(*products[0].attributes.get(key), Extracted::Absent);
        }
    }

    #[tokio::test]
    async fn test_missing_price_yields_empty_prices() {
        let scraper = Scraper::new(MockClient::new(Ok(LISTING_WITHOUT_LINK), Ok(DETAIL)));

        let products = scraper.scrape().await.unwrap();
        assert!(products[0].prices.is_empty());
    }
}
