use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure for the scraper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Product batch scraping configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Directory holding the URL list, checkpoints, catalog, and images
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Root of the target site; classifier and crawl seed both derive from it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// First-run fallback URL list shipped alongside the binary, used
    /// when the runtime list under `data-dir` does not exist yet
    #[serde(rename = "bundled-urls-file", default = "default_bundled_urls_file")]
    pub bundled_urls_file: PathBuf,

    /// Products attempted per batch run
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    /// Minutes between scheduled batch runs
    #[serde(rename = "interval-minutes", default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Run a batch immediately on launch
    #[serde(rename = "auto-start", default = "default_auto_start")]
    pub auto_start: bool,

    /// GET attempts per URL before giving up
    #[serde(rename = "fetch-retries", default = "default_fetch_retries")]
    pub fetch_retries: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Randomized delay range between retry attempts, in milliseconds
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay")]
    pub retry_delay_ms: [u64; 2],

    /// Randomized politeness delay range between page visits, in milliseconds
    #[serde(rename = "page-delay-ms", default = "default_page_delay")]
    pub page_delay_ms: [u64; 2],
}

/// URL discovery crawl configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Category page visit budget per crawl run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Persist the discovered URL list every N pages visited
    #[serde(rename = "save-every", default = "default_save_every")]
    pub save_every: usize,
}

/// Settings handed to the embedding presentation layer
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listening port for the external dashboard/route layer
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Config {
    /// Runtime product URL list, one absolute URL per line
    pub fn urls_file(&self) -> PathBuf {
        self.scraper.data_dir.join("product_urls.txt")
    }

    /// Bundled first-run fallback for the URL list
    pub fn bundled_urls_file(&self) -> PathBuf {
        self.scraper.bundled_urls_file.clone()
    }

    /// Batch checkpoint file
    pub fn progress_file(&self) -> PathBuf {
        self.scraper.data_dir.join("progress.json")
    }

    /// Product catalog file
    pub fn output_file(&self) -> PathBuf {
        self.scraper.data_dir.join("products.json")
    }

    /// Downloaded image directory
    pub fn images_dir(&self) -> PathBuf {
        self.scraper.data_dir.join("images")
    }

    /// Creates the data and image directories if missing
    pub fn ensure_data_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.scraper.data_dir)?;
        std::fs::create_dir_all(self.images_dir())
    }

    /// Convenience constructor for tests and embedders: defaults rooted
    /// at the given data directory and target host.
    pub fn for_target(data_dir: &Path, base_url: &str) -> Self {
        let mut config = Config::default();
        config.scraper.data_dir = data_dir.to_path_buf();
        config.scraper.base_url = base_url.trim_end_matches('/').to_string();
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scraper: ScraperConfig::default(),
            crawl: CrawlConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            data_dir: default_data_dir(),
            base_url: default_base_url(),
            bundled_urls_file: default_bundled_urls_file(),
            batch_size: default_batch_size(),
            interval_minutes: default_interval_minutes(),
            auto_start: default_auto_start(),
            fetch_retries: default_fetch_retries(),
            fetch_timeout_secs: default_fetch_timeout(),
            retry_delay_ms: default_retry_delay(),
            page_delay_ms: default_page_delay(),
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            max_pages: default_max_pages(),
            save_every: default_save_every(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_base_url() -> String {
    "https://www.nisbets.co.uk".to_string()
}

fn default_bundled_urls_file() -> PathBuf {
    PathBuf::from("product_urls.txt")
}

fn default_batch_size() -> usize {
    100
}

fn default_interval_minutes() -> u64 {
    30
}

fn default_auto_start() -> bool {
    true
}

fn default_fetch_retries() -> u32 {
    3
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_retry_delay() -> [u64; 2] {
    [3000, 6000]
}

fn default_page_delay() -> [u64; 2] {
    [1000, 2000]
}

fn default_max_pages() -> usize {
    500
}

fn default_save_every() -> usize {
    50
}

fn default_port() -> u16 {
    5000
}
