use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use super::{category_keywords, get_json, topic, Draft, SourceAdapter};
use crate::article::{parse_published, Article, Category};
use crate::error::AdapterError;

const DEFAULT_BASE_URL: &str = "https://api.mediastack.com";
const MAX_RESULTS: usize = 25;

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    data: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
    source: Option<String>,
}

/// Mediastack `news`, restricted to today's date and sorted newest first.
/// Keywords are comma separated rather than boolean.
pub struct MediastackAdapter {
    client: Client,
    access_key: String,
    base_url: String,
}

impl MediastackAdapter {
    pub fn new(client: Client, access_key: &str) -> Self {
        Self {
            client,
            access_key: access_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn request_url(&self, category: Category, limit: usize) -> String {
        let mut url = format!(
            "{}/v1/news?access_key={}&languages=en&limit={}&sort=published_desc&date={}",
            self.base_url,
            urlencoding::encode(&self.access_key),
            limit.min(MAX_RESULTS),
            Utc::now().format("%Y-%m-%d")
        );
        if category == Category::Kenya {
            url.push_str("&countries=ke");
        }
        if let Some(topic) = topic(category) {
            url.push_str(&format!("&categories={}", topic));
        }
        let keywords = category_keywords(category).join(",");
        url.push_str(&format!("&keywords={}", urlencoding::encode(&keywords)));
        url
    }
}

#[async_trait]
impl SourceAdapter for MediastackAdapter {
    fn name(&self) -> &str {
        "mediastack"
    }

    async fn fetch(&self, category: Category, limit: usize) -> Result<Vec<Article>, AdapterError> {
        let url = self.request_url(category, limit);
        let response: Response = get_json(&self.client, self.name(), &url).await?;

        Ok(response
            .data
            .iter()
            .map(|item| {
                Draft {
                    title: item.title.as_deref(),
                    description: item.description.as_deref(),
                    url: item.url.as_deref(),
                    image: item.image.as_deref(),
                    published_at: parse_published(item.published_at.as_deref()),
                    source: item.source.as_deref().unwrap_or("Mediastack"),
                }
                .into_article(category)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http_client;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_request_url() {
        let adapter = MediastackAdapter::new(http_client(Duration::from_secs(1)), "k");
        let url = adapter.request_url(Category::Kenya, 40);
        assert!(url.contains("&limit=25"));
        assert!(url.contains("&countries=ke"));
        assert!(url.contains("&sort=published_desc"));
        assert!(url.contains("&keywords=Kenya%2CNairobi"));
    }

    #[tokio::test]
    async fn test_fetch_maps_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/news"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "pagination": { "limit": 25, "offset": 0, "count": 1, "total": 1 },
                    "data": [{
                        "author": null,
                        "title": "Streaming service adds African originals",
                        "description": "A global streaming platform has commissioned a slate of new series produced in Nairobi and Lagos.",
                        "url": "https://variety.com/streaming-african-originals",
                        "source": "Variety",
                        "image": "https://example.com/placeholder.png",
                        "category": "entertainment",
                        "language": "en",
                        "country": "us",
                        "published_at": "2024-12-09T09:15:00+00:00"
                    }]
                }"#,
            ))
            .mount(&server)
            .await;

        let adapter = MediastackAdapter::new(http_client(Duration::from_secs(5)), "k")
            .with_base_url(server.uri());
        let articles = adapter.fetch(Category::Entertainment, 10).await.unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source, "Variety");
        // placeholder artwork is swapped for a stock image
        assert!(articles[0].image_url.starts_with("https://images.unsplash.com/"));
    }
}
