use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use tokio::time::Instant;

use crate::article::{Article, Category};

pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct CacheEntry {
    articles: Vec<Article>,
    fetched_at: Instant,
}

/// Short-lived snapshots of finalized results keyed by `(category, limit)`.
///
/// Expired entries stay in place until the next successful fetch for the
/// same key overwrites them. Concurrent writers are last-writer-wins.
pub struct ArticleCache {
    ttl: Duration,
    entries: RwLock<HashMap<(Category, usize), CacheEntry>>,
}

impl ArticleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, category: Category, limit: usize) -> Option<Vec<Article>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(&(category, limit))?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.articles.clone())
        } else {
            None
        }
    }

    pub fn put(&self, category: Category, limit: usize, articles: Vec<Article>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            (category, limit),
            CacheEntry {
                articles,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, category: Category, limit: usize) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(&(category, limit));
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ArticleCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
