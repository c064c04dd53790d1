use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::article::Article;

pub const MIN_TITLE_LEN: usize = 5;
pub const FINGERPRINT_DESCRIPTION_CHARS: usize = 50;
/// Titles whose lengths differ by more than this fraction of the longer one
/// are never compared for similarity.
pub const MAX_LENGTH_DELTA: f64 = 0.5;
pub const MIN_COMPARABLE_TOKENS: usize = 3;
pub const WORD_OVERLAP_THRESHOLD: f64 = 0.7;
pub const COMBINED_CHAR_THRESHOLD: f64 = 0.8;
pub const CHAR_ONLY_THRESHOLD: f64 = 0.9;
pub const SAME_HOST_THRESHOLD: f64 = 0.75;
pub const FINAL_PASS_THRESHOLD: f64 = 0.85;

const REMOVED_MARKER: &str = "removed";

/// Lowercase, replace anything that is not a word character or whitespace
/// with a space, collapse runs of whitespace.
pub fn normalize_title(title: &str) -> String {
    let replaced: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `(maxLen - distance) / maxLen`, and 1.0 for two empty strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    (max_len - levenshtein(a, b)) as f64 / max_len as f64
}

fn tokens(title: &str) -> HashSet<&str> {
    title
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .collect()
}

/// Shared qualifying tokens divided by the larger token set, or `None`
/// when either title has too few tokens to compare.
pub fn word_overlap(a: &str, b: &str) -> Option<f64> {
    let ta = tokens(a);
    let tb = tokens(b);
    if ta.len() < MIN_COMPARABLE_TOKENS || tb.len() < MIN_COMPARABLE_TOKENS {
        return None;
    }
    let shared = ta.intersection(&tb).count();
    Some(shared as f64 / ta.len().max(tb.len()) as f64)
}

/// Near-duplicate test for two normalized titles.
pub fn is_near_duplicate(a: &str, b: &str) -> bool {
    let (la, lb) = (a.chars().count(), b.chars().count());
    let longer = la.max(lb);
    if la.abs_diff(lb) as f64 > longer as f64 * MAX_LENGTH_DELTA {
        return false;
    }

    let overlap = match word_overlap(a, b) {
        Some(overlap) => overlap,
        None => return false,
    };

    let chars = similarity(a, b);
    (overlap > WORD_OVERLAP_THRESHOLD && chars > COMBINED_CHAR_THRESHOLD)
        || chars > CHAR_ONLY_THRESHOLD
}

pub fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| "unknown".to_string())
}

fn is_structurally_valid(article: &Article) -> bool {
    let title = article.title.trim();
    let url = article.url.trim();
    !title.is_empty()
        && !url.is_empty()
        && title.chars().count() >= MIN_TITLE_LEN
        && !title.to_lowercase().contains(REMOVED_MARKER)
        && !url.to_lowercase().contains(REMOVED_MARKER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Invalid,
    SameUrl,
    SameTitle,
    SameFingerprint,
    SimilarTitle,
    SimilarOnHost,
}

#[derive(Default)]
struct Seen {
    urls: HashSet<String>,
    titles: HashSet<String>,
    fingerprints: HashSet<String>,
    by_host: HashMap<String, Vec<String>>,
    history: Vec<String>,
}

impl Seen {
    fn check(&self, article: &Article) -> Result<Accepted, Rejection> {
        if !is_structurally_valid(article) {
            return Err(Rejection::Invalid);
        }

        let url = article.url.trim().to_lowercase();
        if self.urls.contains(&url) {
            return Err(Rejection::SameUrl);
        }

        let title = normalize_title(&article.title);
        if self.titles.contains(&title) {
            return Err(Rejection::SameTitle);
        }

        let prefix: String = article
            .description
            .chars()
            .take(FINGERPRINT_DESCRIPTION_CHARS)
            .collect();
        let fingerprint = format!("{}{}", title, prefix.to_lowercase());
        if self.fingerprints.contains(&fingerprint) {
            return Err(Rejection::SameFingerprint);
        }

        if self.history.iter().any(|seen| is_near_duplicate(&title, seen)) {
            return Err(Rejection::SimilarTitle);
        }

        let host = host_of(&article.url);
        if let Some(titles) = self.by_host.get(&host) {
            if titles
                .iter()
                .any(|seen| similarity(&title, seen) > SAME_HOST_THRESHOLD)
            {
                return Err(Rejection::SimilarOnHost);
            }
        }

        Ok(Accepted {
            url,
            title,
            fingerprint,
            host,
        })
    }

    fn record(&mut self, accepted: Accepted) {
        self.urls.insert(accepted.url);
        self.fingerprints.insert(accepted.fingerprint);
        self.by_host
            .entry(accepted.host)
            .or_default()
            .push(accepted.title.clone());
        self.history.push(accepted.title.clone());
        self.titles.insert(accepted.title);
    }
}

struct Accepted {
    url: String,
    title: String,
    fingerprint: String,
    host: String,
}

/// Order-preserving multi-stage duplicate filter. Applying it to its own
/// output returns that output unchanged.
pub fn dedupe(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = Seen::default();
    let mut kept = Vec::with_capacity(articles.len());

    for article in articles {
        match seen.check(&article) {
            Ok(accepted) => {
                seen.record(accepted);
                kept.push(article);
            }
            Err(reason) => {
                debug!("Dropped '{}' ({}): {:?}", article.title, article.url, reason);
            }
        }
    }

    kept
}

/// Newest first; unparsed timestamps count as the epoch. Stable for ties.
pub fn sort_by_recency(articles: &mut [Article]) {
    articles.sort_by_key(|a| std::cmp::Reverse(a.sort_key()));
}

/// Safety net over the sorted list: drop repeated `title::url` keys and
/// titles too close to one already kept.
pub fn final_pass(articles: Vec<Article>) -> Vec<Article> {
    let mut keys = HashSet::new();
    let mut titles: Vec<String> = Vec::new();

    articles
        .into_iter()
        .filter(|article| {
            if article.title.trim().is_empty() || article.url.trim().is_empty() {
                return false;
            }
            let title = normalize_title(&article.title);
            let key = format!("{}::{}", title, article.url);
            if keys.contains(&key) {
                return false;
            }
            if titles
                .iter()
                .any(|seen| similarity(&title, seen) > FINAL_PASS_THRESHOLD)
            {
                return false;
            }
            keys.insert(key);
            titles.push(title);
            true
        })
        .collect()
}

/// dedupe, then order by recency, then the final sweep.
pub fn finalize(articles: Vec<Article>) -> Vec<Article> {
    let mut unique = dedupe(articles);
    sort_by_recency(&mut unique);
    final_pass(unique)
}
