pub mod currents;
pub mod gnews;
pub mod guardian;
pub mod mediastack;
pub mod newsapi;
pub mod newsdata;
pub mod rss;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::article::{Article, Category};
use crate::config::Config;
use crate::error::AdapterError;
use crate::normalize::{article_rng, clean_description, validate_image};

pub use currents::CurrentsAdapter;
pub use gnews::GNewsAdapter;
pub use guardian::GuardianAdapter;
pub use mediastack::MediastackAdapter;
pub use newsapi::NewsApiAdapter;
pub use newsdata::NewsDataAdapter;
pub use rss::RssAdapter;

const USER_AGENT: &str = "BrightlensNews/1.0 (News Aggregator)";

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Provider identity used in logs and errors.
    fn name(&self) -> &str;

    async fn fetch(&self, category: Category, limit: usize) -> Result<Vec<Article>, AdapterError>;
}

/// Search terms OR-combined into each provider's query.
pub fn category_keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Kenya => &[
            "Kenya",
            "Nairobi",
            "Mombasa",
            "Kisumu",
            "East Africa",
            "Kenyan",
            "Kenyan politics",
            "Kenyan economy",
            "Kenyan sports",
            "Kenyan culture",
        ],
        Category::Latest => &[
            "breaking",
            "latest",
            "news",
            "today",
            "update",
            "trending",
            "announcement",
        ],
        Category::World => &[
            "international",
            "global",
            "world",
            "foreign",
            "diplomatic",
            "world news",
            "worldwide",
        ],
        Category::Sports => &[
            "football",
            "athletics",
            "basketball",
            "tournament",
            "match",
            "player",
            "transfer",
            "sports events",
            "soccer",
            "tennis",
            "golf",
            "rugby",
        ],
        Category::Technology => &[
            "gadgets",
            "software",
            "artificial intelligence",
            "startup",
            "apps",
            "tech company",
            "innovation",
            "AI",
            "programming",
            "cybersecurity",
        ],
        Category::Business => &[
            "stock market",
            "corporate",
            "entrepreneurship",
            "investment",
            "economic",
            "trade",
            "commerce",
            "finance",
            "banking",
            "cryptocurrency",
        ],
        Category::Health => &[
            "disease",
            "medical",
            "research",
            "fitness",
            "mental health",
            "healthcare",
            "hospital",
            "wellness",
            "vaccine",
            "treatment",
        ],
        Category::Entertainment => &[
            "movie",
            "TV show",
            "celebrity",
            "musician",
            "concert",
            "award",
            "cultural",
            "lifestyle",
            "Hollywood",
            "music",
            "streaming",
        ],
    }
}

/// `(a OR b OR "multi word")`
pub fn boolean_query(category: Category) -> String {
    let terms: Vec<String> = category_keywords(category)
        .iter()
        .map(|k| {
            if k.contains(' ') {
                format!("\"{}\"", k)
            } else {
                k.to_string()
            }
        })
        .collect();
    format!("({})", terms.join(" OR "))
}

/// Topic name shared by the providers that expose topical sections.
/// `latest`, `kenya` and `world` have no topic and are served by keywords.
pub fn topic(category: Category) -> Option<&'static str> {
    match category {
        Category::Technology => Some("technology"),
        Category::Business => Some("business"),
        Category::Sports => Some("sports"),
        Category::Health => Some("health"),
        Category::Entertainment => Some("entertainment"),
        Category::Latest | Category::Kenya | Category::World => None,
    }
}

pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to create HTTP client")
}

/// Issue one GET and decode a JSON body, mapping every failure to an
/// [`AdapterError`] tagged with the provider.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    provider: &str,
    url: &str,
) -> Result<T, AdapterError> {
    let bytes = get_bytes(client, provider, url, "application/json").await?;
    serde_json::from_slice(&bytes).map_err(|e| AdapterError::Malformed {
        provider: provider.to_string(),
        message: e.to_string(),
    })
}

pub(crate) async fn get_bytes(
    client: &Client,
    provider: &str,
    url: &str,
    accept: &str,
) -> Result<Vec<u8>, AdapterError> {
    let http_err = |source| AdapterError::Http {
        provider: provider.to_string(),
        source,
    };

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, accept)
        .send()
        .await
        .map_err(http_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(AdapterError::Status {
            provider: provider.to_string(),
            status,
        });
    }

    let body = response.bytes().await.map_err(http_err)?;
    Ok(body.to_vec())
}

/// Provider fields before cleanup. Missing titles or URLs become empty
/// strings and are dropped later by the dedupe validity check.
#[derive(Debug, Default)]
pub(crate) struct Draft<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub url: Option<&'a str>,
    pub image: Option<&'a str>,
    pub published_at: Option<DateTime<Utc>>,
    pub source: &'a str,
}

impl Draft<'_> {
    pub fn into_article(self, category: Category) -> Article {
        let url = self.url.map(str::trim).unwrap_or_default().to_string();
        let mut rng = article_rng(&url);
        Article {
            title: self.title.map(str::trim).unwrap_or_default().to_string(),
            description: clean_description(self.description, &mut rng),
            image_url: validate_image(self.image, &mut rng),
            url,
            published_at: self.published_at,
            source: self.source.to_string(),
            category,
        }
    }
}

/// Every adapter the service knows about, split into adapters that serve
/// all categories and feed adapters bound to one category.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    shared: Vec<Arc<dyn SourceAdapter>>,
    per_category: HashMap<Category, Vec<Arc<dyn SourceAdapter>>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shared(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.shared.push(adapter);
        self
    }

    pub fn with_category(mut self, category: Category, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.per_category.entry(category).or_default().push(adapter);
        self
    }

    pub fn for_category(&self, category: Category) -> Vec<Arc<dyn SourceAdapter>> {
        let mut adapters = self.shared.clone();
        if let Some(feeds) = self.per_category.get(&category) {
            adapters.extend(feeds.iter().cloned());
        }
        adapters
    }

    pub fn len(&self) -> usize {
        self.shared.len() + self.per_category.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the production adapter set. API adapters are only created for
    /// providers with a configured credential.
    pub fn from_config(config: &Config, client: Client) -> Self {
        let creds = &config.credentials;
        let mut registry = Self::new();

        if let Some(key) = &creds.newsdata {
            registry = registry.with_shared(Arc::new(NewsDataAdapter::new(client.clone(), key)));
        }
        if let Some(key) = &creds.gnews {
            registry = registry.with_shared(Arc::new(GNewsAdapter::new(client.clone(), key)));
        }
        if let Some(key) = &creds.newsapi {
            registry = registry.with_shared(Arc::new(NewsApiAdapter::new(client.clone(), key)));
        }
        if let Some(key) = &creds.mediastack {
            registry =
                registry.with_shared(Arc::new(MediastackAdapter::new(client.clone(), key)));
        }
        if let Some(key) = &creds.currents {
            registry = registry.with_shared(Arc::new(CurrentsAdapter::new(client.clone(), key)));
        }
        registry = registry.with_shared(Arc::new(GuardianAdapter::new(
            client.clone(),
            &creds.guardian,
        )));

        for category in Category::ALL {
            for feed_url in config.feeds_for(category) {
                registry = registry.with_category(
                    category,
                    Arc::new(RssAdapter::new(client.clone(), &feed_url)),
                );
            }
        }

        registry
    }
}
