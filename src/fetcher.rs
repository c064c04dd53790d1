use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::adapters::{http_client, AdapterRegistry};
use crate::aggregator::Aggregator;
use crate::article::{Article, Category};
use crate::cache::ArticleCache;
use crate::config::Config;
use crate::dedup;
use crate::error::FetchError;
use crate::fallback;

/// The single entry point for article lists. Serves from the cache when
/// fresh, otherwise aggregates live sources, and falls back to built-in
/// content when nothing usable came back.
pub struct Fetcher {
    aggregator: Aggregator,
    cache: Arc<ArticleCache>,
    fallback_seed: Option<u64>,
}

impl Fetcher {
    pub fn new(aggregator: Aggregator, cache: Arc<ArticleCache>) -> Self {
        Self {
            aggregator,
            cache,
            fallback_seed: None,
        }
    }

    /// Production wiring: one shared HTTP client, every configured adapter.
    pub fn from_config(config: &Config) -> Self {
        let client = http_client(config.aggregate_timeout());
        let registry = AdapterRegistry::from_config(config, client);
        info!("Configured {} source adapters", registry.len());

        Self::new(
            Aggregator::new(registry, config.aggregate_timeout()),
            Arc::new(ArticleCache::new(config.cache_ttl())),
        )
    }

    /// Fix the random source used for fallback timestamps.
    pub fn with_fallback_seed(mut self, seed: u64) -> Self {
        self.fallback_seed = Some(seed);
        self
    }

    pub fn cache(&self) -> &Arc<ArticleCache> {
        &self.cache
    }

    /// Never empty and never an error: provider failures end in fallback
    /// content with the same shape and ordering as live results.
    pub async fn fetch_articles(&self, category: Category, limit: usize) -> Vec<Article> {
        if let Some(articles) = self.cache.get(category, limit) {
            debug!("Cache hit for {} (limit {})", category, limit);
            return articles;
        }

        let result = self
            .aggregator
            .aggregate(category, limit)
            .await
            .map(|raw| {
                let fetched = raw.len();
                let finalized = dedup::finalize(raw);
                debug!(
                    "Kept {} of {} {} articles after dedupe",
                    finalized.len(),
                    fetched,
                    category
                );
                finalized
            });

        match result {
            Ok(articles) if !articles.is_empty() => {
                self.cache.put(category, limit, articles.clone());
                articles
            }
            Ok(_) => {
                warn!("Every fetched {} article was rejected, serving fallback", category);
                self.cache.invalidate(category, limit);
                self.fallback_for(category)
            }
            Err(e) => {
                warn!("Serving fallback for {}: {}", category, e);
                self.cache.invalidate(category, limit);
                self.fallback_for(category)
            }
        }
    }

    /// Like [`fetch_articles`](Self::fetch_articles) for a category given by
    /// name. Fails only for names outside the category set.
    pub async fn fetch_by_name(
        &self,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Article>, FetchError> {
        let category: Category = name.parse()?;
        Ok(self.fetch_articles(category, limit).await)
    }

    fn fallback_for(&self, category: Category) -> Vec<Article> {
        let label = fallback::source_label(category);
        match self.fallback_seed {
            Some(seed) => fallback::fallback(category, label, &mut StdRng::seed_from_u64(seed)),
            None => fallback::fallback(category, label, &mut rand::rng()),
        }
    }
}
