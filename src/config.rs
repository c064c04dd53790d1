use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::article::Category;

/// Feeds beyond this many per category are ignored.
pub const MAX_FEEDS_PER_CATEGORY: usize = 3;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// How long a finalized result stays servable, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Shared deadline for one aggregation, in seconds
    #[serde(default = "default_aggregate_timeout_secs")]
    pub aggregate_timeout_secs: u64,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub credentials: Credentials,
    /// Per-category feed lists replacing the built-in ones
    #[serde(default)]
    pub feeds: HashMap<String, Vec<String>>,
}

fn default_cache_ttl_secs() -> u64 {
    30
}

fn default_aggregate_timeout_secs() -> u64 {
    8
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_guardian_key() -> String {
    "test".to_string()
}

/// Static provider keys. A provider without a key is not queried, except
/// the Guardian which accepts the public `test` key.
#[derive(Debug, Deserialize, Clone)]
pub struct Credentials {
    pub newsdata: Option<String>,
    pub gnews: Option<String>,
    pub newsapi: Option<String>,
    pub mediastack: Option<String>,
    pub currents: Option<String>,
    #[serde(default = "default_guardian_key")]
    pub guardian: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            newsdata: None,
            gnews: None,
            newsapi: None,
            mediastack: None,
            currents: None,
            guardian: default_guardian_key(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            aggregate_timeout_secs: default_aggregate_timeout_secs(),
            bind_address: default_bind_address(),
            credentials: Credentials::default(),
            feeds: HashMap::new(),
        }
    }
}

/// Built-in RSS feeds per category.
pub fn default_feeds(category: Category) -> &'static [&'static str] {
    match category {
        Category::Latest => &[
            "https://feeds.bbci.co.uk/news/rss.xml",
            "https://www.reuters.com/world/rss",
            "https://feeds.npr.org/1001/rss.xml",
        ],
        Category::Kenya => &[
            "https://www.nation.co.ke/kenya/rss.xml",
            "https://www.standardmedia.co.ke/rss",
            "https://www.citizen.digital/rss",
        ],
        Category::World => &[
            "https://www.theguardian.com/world/rss",
            "https://feeds.bbci.co.uk/news/world/rss.xml",
            "https://www.aljazeera.com/xml/rss/all.xml",
        ],
        Category::Technology => &[
            "https://techcrunch.com/feed",
            "https://www.theverge.com/rss/index.xml",
            "https://www.wired.com/feed/rss",
        ],
        Category::Business => &[
            "https://feeds.bloomberg.com/markets/news.rss",
            "https://www.cnbc.com/id/100003114/device/rss/rss.html",
            "https://www.reuters.com/business/rss",
        ],
        Category::Health => &[
            "https://www.webmd.com/rss/rss.aspx?RSSSource=RSS_PUBLIC",
            "https://www.healthline.com/rss",
            "https://www.health.harvard.edu/rss",
        ],
        Category::Entertainment => &[
            "https://www.tmz.com/rss.xml",
            "https://variety.com/feed/",
            "https://ew.com/rss/all.xml",
        ],
        Category::Sports => &[
            "http://www.espn.com/espn/rss/news",
            "https://www.skysports.com/rss/12040",
            "https://sports.yahoo.com/rss/",
        ],
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        for name in config.feeds.keys() {
            name.parse::<Category>()
                .with_context(|| format!("[feeds] table has an entry for {name:?}"))?;
        }
        if config.aggregate_timeout_secs == 0 {
            anyhow::bail!("aggregate_timeout_secs must be positive");
        }
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn aggregate_timeout(&self) -> Duration {
        Duration::from_secs(self.aggregate_timeout_secs)
    }

    /// Feed URLs queried for `category`: the configured override when one
    /// exists, else the built-in list.
    pub fn feeds_for(&self, category: Category) -> Vec<String> {
        match self.feeds.get(category.as_str()) {
            Some(urls) => urls
                .iter()
                .take(MAX_FEEDS_PER_CATEGORY)
                .cloned()
                .collect(),
            None => default_feeds(category)
                .iter()
                .take(MAX_FEEDS_PER_CATEGORY)
                .map(|u| u.to_string())
                .collect(),
        }
    }
}
