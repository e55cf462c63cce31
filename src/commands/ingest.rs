//! Ingest commands: first-run scrape-and-index, and the explicit reindex.

use crate::config::Config;
use crate::search::SearchIndex;
use crate::trendyol::{Scraper, TrendyolClient, TrendyolFetch};
use anyhow::{Context, Result};
use tracing::info;

/// What an ingest run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Products written to the index this run.
    pub indexed: usize,
    /// Index generation after the run.
    pub generation: u64,
    /// True when the index was already populated and no scrape was made.
    pub skipped: bool,
}

/// Scrapes the listing and loads the search index.
pub struct IngestCommand {
    config: Config,
}

impl IngestCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// First-run ingest: when the index generation is still 0, scrape and
    /// bulk-load; otherwise skip entirely, including the scrape, so re-runs
    /// cost no network round-trips.
    pub async fn ingest_if_new(&self, index: &SearchIndex) -> Result<IngestReport> {
        let generation = index.generation()?;
        if generation > 0 {
            info!("Index already at generation {}, skipping scrape", generation);
            return Ok(IngestReport { indexed: 0, generation, skipped: true });
        }

        let client = TrendyolClient::new(&self.config).context("Failed to create HTTP client")?;
        self.ingest_with_client(client, index).await
    }

    /// First-run ingest with a provided client (for testing).
    pub async fn ingest_with_client(
        &self,
        client: impl TrendyolFetch,
        index: &SearchIndex,
    ) -> Result<IngestReport> {
        let generation = index.generation()?;
        if generation > 0 {
            return Ok(IngestReport { indexed: 0, generation, skipped: true });
        }

        let products = Scraper::new(client).scrape().await.context("Listing scrape failed")?;
        let indexed = index.bulk_index(&products)?;

        let generation = index.generation()?;
        info!("Ingested {} products at generation {}", indexed, generation);

        Ok(IngestReport { indexed, generation, skipped: false })
    }

    /// Explicit refresh: always scrapes and replaces the whole index.
    pub async fn reindex(&self, index: &SearchIndex) -> Result<IngestReport> {
        let client = TrendyolClient::new(&self.config).context("Failed to create HTTP client")?;
        self.reindex_with_client(client, index).await
    }

    /// Explicit refresh with a provided client (for testing).
    pub async fn reindex_with_client(
        &self,
        client: impl TrendyolFetch,
        index: &SearchIndex,
    ) -> Result<IngestReport> {
        let products = Scraper::new(client).scrape().await.context("Listing scrape failed")?;
        let indexed = index.reindex(&products)?;

        let generation = index.generation()?;
        info!("Reindexed {} products at generation {}", indexed, generation);

        Ok(IngestReport { indexed, generation, skipped: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trendyol::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct MockClient {
        listing: String,
        listing_call_count: Arc<AtomicU32>,
    }

    impl MockClient {
        fn new(listing: &str) -> Self {
            Self { listing: listing.to_string(), listing_call_count: Arc::new(AtomicU32::new(0)) }
        }
    }

    #[async_trait]
    impl TrendyolFetch for MockClient {
        async fn listing(&self) -> Result<String, FetchError> {
            self.listing_call_count.fetch_add(1, Ordering::SeqCst);
            Ok(self.listing.clone())
        }

        async fn detail(&self, _url: &str) -> Result<String, FetchError> {
            Ok("<html></html>".to_string())
        }

        fn origin(&self) -> String {
            "https://www.trendyol.com".to_string()
        }
    }

    const LISTING: &str = r#"
        <div class="p-card-chldrn-cntnr card-border">
            <h3 class="prdct-desc-cntnr-ttl-w">
                <span class="prdct-desc-cntnr-ttl">Logitech</span>
                <span class="prdct-desc-cntnr-name">G305</span>
            </h3>
            <div class="prc-box-dscntd">899 TL</div>
        </div>
        <div class="p-card-chldrn-cntnr card-border">
            <h3 class="prdct-desc-cntnr-ttl-w">
                <span class="prdct-desc-cntnr-ttl">Razer</span>
            </h3>
            <div class="prc-box-dscntd">1.250 TL</div>
        </div>
    "#;

    fn open(dir: &TempDir) -> SearchIndex {
        SearchIndex::open_or_create(dir.path(), vec![50.0, 1000.0], 10).unwrap()
    }

    #[tokio::test]
    async fn test_first_run_ingests() {
        let dir = TempDir::new().unwrap();
        let index = open(&dir);
        let cmd = IngestCommand::new(Config::default());

        let report = cmd.ingest_with_client(MockClient::new(LISTING), &index).await.unwrap();

        assert!(!report.skipped);
        assert_eq!(report.indexed, 2);
        assert_eq!(report.generation, 1);
        assert_eq!(index.num_docs(), 2);
    }

    #[tokio::test]
    async fn test_second_run_skips_scrape_and_keeps_doc_count() {
        let dir = TempDir::new().unwrap();
        let index = open(&dir);
        let cmd = IngestCommand::new(Config::default());

        cmd.ingest_with_client(MockClient::new(LISTING), &index).await.unwrap();
        assert_eq!(index.num_docs(), 2);

        let client = MockClient::new(LISTING);
        let calls = client.listing_call_count.clone();
        let report = cmd.ingest_with_client(client, &index).await.unwrap();

        assert!(report.skipped);
        assert_eq!(report.generation, 1);
        assert_eq!(index.num_docs(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reindex_always_refreshes() {
        let dir = TempDir::new().unwrap();
        let index = open(&dir);
        let cmd = IngestCommand::new(Config::default());

        cmd.ingest_with_client(MockClient::new(LISTING), &index).await.unwrap();
        let report = cmd.reindex_with_client(MockClient::new(LISTING), &index).await.unwrap();

        assert!(!report.skipped);
        assert_eq!(report.generation, 2);
        // Replaced, not appended
        assert_eq!(index.num_docs(), 2);
    }

    #[tokio::test]
    async fn test_ingest_surfaces_listing_failure() {
        struct FailingClient;

        #[async_trait]
        impl TrendyolFetch for FailingClient {
            async fn listing(&self) -> Result<String, FetchError> {
                Err(FetchError::Status(500))
            }

            async fn detail(&self, _url: &str) -> Result<String, FetchError> {
                Ok(String::new())
            }

            fn origin(&self) -> String {
                String::new()
            }
        }

        let dir = TempDir::new().unwrap();
        let index = open(&dir);
        let cmd = IngestCommand::new(Config::default());

        let err = cmd.ingest_with_client(FailingClient, &index).await.unwrap_err();
        assert!(err.to_string().contains("scrape failed"));
        assert_eq!(index.generation().unwrap(), 0);
    }
}
