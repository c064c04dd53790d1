use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed};
use feed_rs::parser::{self, ParseFeedError};
use reqwest::Client;

use super::{get_bytes, Draft, SourceAdapter};
use crate::article::{parse_published, Article, Category};
use crate::dedup::host_of;
use crate::error::AdapterError;

/// Items taken from a single feed per fetch.
const MAX_ITEMS: usize = 5;

/// Stands in for a date element whose text could not be read.
const UNREADABLE: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

/// One RSS/Atom feed. Feeds are already topical, so the requested
/// category only tags the resulting articles.
pub struct RssAdapter {
    client: Client,
    feed_url: String,
    name: String,
    source_name: String,
}

impl RssAdapter {
    pub fn new(client: Client, feed_url: &str) -> Self {
        Self {
            client,
            feed_url: feed_url.to_string(),
            name: format!("rss:{}", host_of(feed_url)),
            source_name: source_name_for(feed_url).to_string(),
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    fn entry_to_article(&self, entry: &Entry, category: Category) -> Article {
        let title = entry.title.as_ref().map(|t| t.content.as_str());
        let url = entry.links.first().map(|l| l.href.as_str());
        let description = entry
            .summary
            .as_ref()
            .map(|s| s.content.as_str())
            .or_else(|| entry.content.as_ref().and_then(|c| c.body.as_deref()));

        Draft {
            title,
            description,
            url,
            image: image_for(entry),
            published_at: published_at(entry),
            source: &self.source_name,
        }
        .into_article(category)
    }
}

fn parse_feed(bytes: &[u8]) -> Result<Feed, ParseFeedError> {
    parser::Builder::new()
        .timestamp_parser(|raw| Some(parse_published(Some(raw)).unwrap_or(UNREADABLE)))
        .build()
        .parse(bytes)
}

/// `published`, then `updated`. A missing date means "now"; a date that is
/// present but unreadable gives `None` so the item sorts last.
fn published_at(entry: &Entry) -> Option<DateTime<Utc>> {
    let stamps = [entry.published, entry.updated];
    if let Some(ts) = stamps.iter().flatten().find(|ts| **ts != UNREADABLE) {
        return Some(*ts);
    }
    if stamps.iter().any(Option::is_some) {
        None
    } else {
        Some(Utc::now())
    }
}

fn image_for(entry: &Entry) -> Option<&str> {
    let thumbnail = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| t.image.uri.as_str())
        .next();
    thumbnail.or_else(|| {
        entry
            .links
            .iter()
            .find(|l| {
                l.rel.as_deref() == Some("enclosure")
                    && l.media_type
                        .as_deref()
                        .is_some_and(|m| m.starts_with("image/"))
            })
            .map(|l| l.href.as_str())
    })
}

/// Human-readable outlet name for the well known feeds.
pub fn source_name_for(feed_url: &str) -> &'static str {
    const KNOWN: &[(&str, &str)] = &[
        ("techcrunch.com", "TechCrunch"),
        ("theverge.com", "The Verge"),
        ("wired.com", "Wired"),
        ("arstechnica.com", "Ars Technica"),
        ("bbci.co.uk", "BBC News"),
        ("bbc.co.uk", "BBC News"),
        ("reuters.com", "Reuters"),
        ("npr.org", "NPR"),
        ("bloomberg.com", "Bloomberg"),
        ("cnbc.com", "CNBC"),
        ("espn.com", "ESPN"),
        ("skysports.com", "Sky Sports"),
        ("tmz.com", "TMZ"),
        ("variety.com", "Variety"),
        ("webmd.com", "WebMD"),
        ("theguardian.com", "The Guardian"),
        ("aljazeera.com", "Al Jazeera"),
        ("nation.co.ke", "Daily Nation"),
        ("standardmedia.co.ke", "The Standard"),
        ("citizen.digital", "Citizen Digital"),
        ("capitalfm.co.ke", "Capital FM"),
    ];
    KNOWN
        .iter()
        .find(|(needle, _)| feed_url.contains(needle))
        .map(|(_, name)| *name)
        .unwrap_or("RSS Source")
}

#[async_trait]
impl SourceAdapter for RssAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, category: Category, limit: usize) -> Result<Vec<Article>, AdapterError> {
        let bytes = get_bytes(
            &self.client,
            &self.name,
            &self.feed_url,
            "application/rss+xml, application/atom+xml, application/xml;q=0.9, */*;q=0.8",
        )
        .await?;

        let feed = parse_feed(&bytes[..]).map_err(|source| AdapterError::Feed {
            provider: self.name.clone(),
            source,
        })?;

        Ok(feed
            .entries
            .iter()
            .take(limit.min(MAX_ITEMS))
            .map(|entry| self.entry_to_article(entry, category))
            .collect())
    }
}
