//! HTTP client for Trendyol requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::Context;
use async_trait::async_trait;
use rand::RngExt;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Why a page fetch failed. Callers can tell a transport failure apart
/// from a rate limit or a plain HTTP error status.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] wreq::Error),

    #[error("rate limited with status {0}; increase --delay or use a proxy")]
    RateLimited(u16),

    #[error("request failed with status {0}")]
    Status(u16),
}

/// Trait for Trendyol page fetching - enables mocking for tests.
#[async_trait]
pub trait TrendyolFetch: Send + Sync {
    /// Fetches the category listing page HTML.
    async fn listing(&self) -> Result<String, FetchError>;

    /// Fetches a product detail page by absolute URL.
    async fn detail(&self, url: &str) -> Result<String, FetchError>;

    /// Returns the site origin used to absolutize relative card links.
    fn origin(&self) -> String;
}

/// Trendyol HTTP client with browser impersonation and anti-bot measures.
pub struct TrendyolClient {
    client: Client,
    origin: String,
    listing_path: String,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl TrendyolClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_origin(config, None)
    }

    /// Creates a new client with an optional origin override (for testing).
    pub fn with_origin(config: &Config, origin: Option<String>) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            origin: origin.unwrap_or_else(|| config.origin.clone()),
            listing_path: config.listing_path.clone(),
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
        })
    }

    /// Performs a GET request with browser headers and politeness delay.
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.delay().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "tr-TR,tr;q=0.9,en;q=0.8")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Ch-Ua", "\"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"")
            .header("Sec-Ch-Ua-Mobile", "?0")
            .header("Sec-Ch-Ua-Platform", "\"macOS\"")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 429 || status == 503 {
            warn!("Rate limited ({}). Consider using a proxy or increasing delay.", status);
            return Err(FetchError::RateLimited(status.as_u16()));
        }

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    /// Adds a random delay to mimic human behavior.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[async_trait]
impl TrendyolFetch for TrendyolClient {
    async fn listing(&self) -> Result<String, FetchError> {
        let url = format!("{}{}", self.origin, self.listing_path);

        info!("Fetching listing: {}", url);
        self.get(&url).await
    }

    async fn detail(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching detail page: {}", url);
        self.get(url).await
    }

    fn origin(&self) -> String {
        self.origin.clone()
    }
}
