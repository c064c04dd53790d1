//! Concurrent fan-out over every adapter serving a category.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::{timeout_at, Instant};
use tracing::{info, warn};

use crate::adapters::{AdapterRegistry, SourceAdapter};
use crate::article::{Article, Category};
use crate::error::{AdapterError, FetchError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

pub struct Aggregator {
    registry: AdapterRegistry,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(registry: AdapterRegistry, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Start every adapter at once and wait until all have answered or the
    /// shared deadline passes, whichever comes first.
    ///
    /// Each adapter runs on its own task. A task still running at the
    /// deadline is left to finish on its own and its result is dropped.
    /// Failed or late adapters contribute nothing. The concatenation keeps
    /// adapter order and is not deduplicated.
    pub async fn aggregate(
        &self,
        category: Category,
        limit: usize,
    ) -> Result<Vec<Article>, FetchError> {
        let adapters = self.registry.for_category(category);
        let total = adapters.len();
        let deadline = Instant::now() + self.timeout;

        let calls = adapters
            .into_iter()
            .map(|adapter| run_until(adapter, category, limit, deadline));
        let outcomes = join_all(calls).await;

        let mut failed = 0;
        let mut articles = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(batch) => articles.extend(batch),
                Err(e) => {
                    failed += 1;
                    warn!("Adapter '{}' contributed nothing: {}", e.provider(), e);
                }
            }
        }

        info!(
            "Aggregated {} {} articles ({} of {} adapters failed)",
            articles.len(),
            category,
            failed,
            total
        );

        if articles.is_empty() {
            return Err(FetchError::AggregationEmpty { failed, total });
        }
        Ok(articles)
    }
}

async fn run_until(
    adapter: Arc<dyn SourceAdapter>,
    category: Category,
    limit: usize,
    deadline: Instant,
) -> Result<Vec<Article>, AdapterError> {
    let provider = adapter.name().to_string();
    let handle = tokio::spawn(async move { adapter.fetch(category, limit).await });

    match timeout_at(deadline, handle).await {
        Ok(Ok(result)) => result,
        // the adapter task panicked
        Ok(Err(join_error)) => Err(AdapterError::Malformed {
            provider,
            message: join_error.to_string(),
        }),
        Err(_) => Err(AdapterError::Timeout { provider }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;

    enum Behaviour {
        Articles(usize),
        Fail,
        Hang,
    }

    struct Fake {
        name: String,
        delay: Duration,
        behaviour: Behaviour,
    }

    impl Fake {
        fn new(name: &str, delay_secs: u64, behaviour: Behaviour) -> Arc<dyn SourceAdapter> {
            Arc::new(Self {
                name: name.to_string(),
                delay: Duration::from_secs(delay_secs),
                behaviour,
            })
        }
    }

    #[async_trait]
    impl SourceAdapter for Fake {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fetch(&self, category: Category, _: usize) -> Result<Vec<Article>, AdapterError> {
            tokio::time::sleep(self.delay).await;
            match self.behaviour {
                Behaviour::Articles(n) => Ok((0..n)
                    .map(|i| Article {
                        title: format!("{} headline {}", self.name, i),
                        description: "A description long enough to stand on its own in a list."
                            .to_string(),
                        url: format!("https://{}.example.com/{}", self.name, i),
                        image_url: "https://images.example.com/x.jpg".to_string(),
                        published_at: Some(Utc::now()),
                        source: self.name.clone(),
                        category,
                    })
                    .collect()),
                Behaviour::Fail => Err(AdapterError::Malformed {
                    provider: self.name.clone(),
                    message: "bad payload".to_string(),
                }),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Vec::new())
                }
            }
        }
    }

    fn aggregator(adapters: Vec<Arc<dyn SourceAdapter>>) -> Aggregator {
        let registry = adapters
            .into_iter()
            .fold(AdapterRegistry::new(), |r, a| r.with_shared(a));
        Aggregator::new(registry, DEFAULT_TIMEOUT)
    }

    #[tokio::test(start_paused = true)]
    async fn test_concatenates_in_adapter_order() {
        let agg = aggregator(vec![
            Fake::new("slow", 3, Behaviour::Articles(2)),
            Fake::new("fast", 0, Behaviour::Articles(1)),
        ]);
        let articles = agg.aggregate(Category::Latest, 20).await.unwrap();
        let sources: Vec<&str> = articles.iter().map(|a| a.source.as_str()).collect();
        assert_eq!(sources, vec!["slow", "slow", "fast"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failure_is_success() {
        let agg = aggregator(vec![
            Fake::new("a", 1, Behaviour::Articles(3)),
            Fake::new("b", 0, Behaviour::Fail),
            Fake::new("c", 2, Behaviour::Articles(2)),
            Fake::new("d", 0, Behaviour::Hang),
            Fake::new("e", 1, Behaviour::Fail),
            Fake::new("f", 20, Behaviour::Articles(5)),
            Fake::new("g", 0, Behaviour::Fail),
            Fake::new("h", 4, Behaviour::Articles(1)),
        ]);
        // b, d, e, f (late) and g contribute nothing
        let articles = agg.aggregate(Category::Kenya, 20).await.unwrap();
        assert_eq!(articles.len(), 6);
        assert!(articles.iter().all(|a| ["a", "c", "h"].contains(&a.source.as_str())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_by_deadline() {
        let agg = aggregator(vec![
            Fake::new("quick", 1, Behaviour::Articles(1)),
            Fake::new("stuck", 0, Behaviour::Hang),
        ]);
        let start = Instant::now();
        let articles = agg.aggregate(Category::World, 20).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert!(start.elapsed() <= DEFAULT_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failed_is_empty_error() {
        let agg = aggregator(vec![
            Fake::new("a", 0, Behaviour::Fail),
            Fake::new("b", 0, Behaviour::Hang),
            Fake::new("c", 0, Behaviour::Articles(0)),
        ]);
        let err = agg.aggregate(Category::Sports, 20).await.unwrap_err();
        match err {
            FetchError::AggregationEmpty { failed, total } => {
                assert_eq!(failed, 2);
                assert_eq!(total, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_no_adapters() {
        let agg = aggregator(Vec::new());
        assert!(matches!(
            agg.aggregate(Category::Health, 20).await,
            Err(FetchError::AggregationEmpty { failed: 0, total: 0 })
        ));
    }
}
