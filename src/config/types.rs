use serde::Deserialize;
use std::collections::BTreeMap;

/// Listing page scraped when no config overrides it
pub const DEFAULT_BASE_URL: &str = "https://movie.douban.com/top250";

/// Query parameter carrying the page offset
pub const DEFAULT_OFFSET_PARAM: &str = "start";

/// Items per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Number of listing pages fetched per run
pub const DEFAULT_PAGE_COUNT: u32 = 10;

pub const DEFAULT_DATABASE_PATH: &str = "douban_movies.db";
pub const DEFAULT_MAX_OPEN_CONNECTIONS: u32 = 10;
pub const DEFAULT_MAX_IDLE_CONNECTIONS: u32 = 5;

/// Browser header set sent with every listing request
const DEFAULT_HEADERS: &[(&str, &str)] = &[
    ("Connection", "keep-alive"),
    ("Cache-Control", "max-age=0"),
    ("sec-ch-ua-mobile", "?0"),
    ("Upgrade-Insecure-Requests", "1"),
    (
        "User-Agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36",
    ),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9",
    ),
    ("Sec-Fetch-Site", "same-origin"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-User", "?1"),
    ("Sec-Fetch-Dest", "document"),
    ("Referer", "https://movie.douban.com/chart"),
    ("Accept-Language", "zh-CN,zh;q=0.9"),
];

/// Main configuration structure for Reel Harvest
///
/// Every section has defaults, so an empty file (or no file at all) yields
/// the stock ten-page Douban run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub request: RequestConfig,
    pub storage: StorageConfig,
}

/// Which listing pages to fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Listing URL without the offset parameter
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Name of the query parameter that carries the offset
    #[serde(rename = "offset-param")]
    pub offset_param: String,

    /// Items per page; offsets advance by this step
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Number of pages to fetch when `offsets` is empty
    #[serde(rename = "page-count")]
    pub page_count: u32,

    /// Explicit page offsets; overrides `page-size` and `page-count`
    pub offsets: Vec<u32>,

    /// Per-request timeout in seconds (0 disables the timeout)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            offset_param: DEFAULT_OFFSET_PARAM.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_count: DEFAULT_PAGE_COUNT,
            offsets: Vec::new(),
            request_timeout_secs: 0,
        }
    }
}

/// Request header configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Headers sent with every listing request
    pub headers: BTreeMap<String, String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            headers: DEFAULT_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Upper bound on simultaneously open connections
    #[serde(rename = "max-open-connections")]
    pub max_open_connections: u32,

    /// Upper bound on idle connections kept for reuse
    #[serde(rename = "max-idle-connections")]
    pub max_idle_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            max_open_connections: DEFAULT_MAX_OPEN_CONNECTIONS,
            max_idle_connections: DEFAULT_MAX_IDLE_CONNECTIONS,
        }
    }
}

impl Config {
    /// Returns the page offsets this run will fetch
    ///
    /// Explicit `offsets` win; otherwise `0, page_size, 2 * page_size, ...`
    /// for `page_count` pages. Offsets past `u32::MAX` are not produced;
    /// validation rejects configs that would need them.
    pub fn page_offsets(&self) -> Vec<u32> {
        if !self.crawler.offsets.is_empty() {
            return self.crawler.offsets.clone();
        }

        (0..self.crawler.page_count)
            .map_while(|page| page.checked_mul(self.crawler.page_size))
            .collect()
    }
}
