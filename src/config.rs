//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site origin, prefix for relative card links
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Category listing path (including query string)
    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Base delay between requests in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Directory holding the on-disk search index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Price bucket boundaries for the search facet, ascending
    #[serde(default = "default_price_buckets")]
    pub price_buckets: Vec<f64>,

    /// Maximum search hits returned per query
    #[serde(default = "default_max_hits")]
    pub max_hits: usize,

    /// Web server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_origin() -> String {
    "https://www.trendyol.com".to_string()
}

fn default_listing_path() -> String {
    "/sr/oyuncu-mouselari-x-c106088?sst=BEST_SELLER".to_string()
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_delay_jitter_ms() -> u64 {
    3000
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("data/index")
}

fn default_price_buckets() -> Vec<f64> {
    vec![50.0, 1000.0]
}

fn default_max_hits() -> usize {
    10
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            listing_path: default_listing_path(),
            proxy: None,
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            index_dir: default_index_dir(),
            price_buckets: default_price_buckets(),
            max_hits: default_max_hits(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("trendyol-scout").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(proxy) = std::env::var("TRENDYOL_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(delay) = std::env::var("TRENDYOL_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        if let Ok(dir) = std::env::var("TRENDYOL_INDEX_DIR") {
            self.index_dir = PathBuf::from(dir);
        }

        if let Ok(port) = std::env::var("TRENDYOL_PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        self
    }
}
