//! NewsData.io `latest` endpoint. Free tier returns at most 10 results.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{boolean_query, get_json, topic, Draft, SourceAdapter};
use crate::article::{parse_published, Article, Category};
use crate::error::AdapterError;

const DEFAULT_BASE_URL: &str = "https://newsdata.io";
const MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    results: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    image_url: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source_id: Option<String>,
}

pub struct NewsDataAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsDataAdapter {
    pub fn new(client: Client, api_key: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn request_url(&self, category: Category, limit: usize) -> String {
        let mut url = format!(
            "{}/api/1/latest?apikey={}&language=en&size={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            limit.min(MAX_RESULTS)
        );
        match category {
            Category::Kenya => url.push_str("&country=ke"),
            Category::World => url.push_str("&category=world"),
            other => {
                if let Some(topic) = topic(other) {
                    url.push_str(&format!("&category={}", topic));
                }
            }
        }
        url.push_str(&format!("&q={}", urlencoding::encode(&boolean_query(category))));
        url
    }
}

#[async_trait]
impl SourceAdapter for NewsDataAdapter {
    fn name(&self) -> &str {
        "newsdata"
    }

    async fn fetch(&self, category: Category, limit: usize) -> Result<Vec<Article>, AdapterError> {
        let url = self.request_url(category, limit);
        let response: Response = get_json(&self.client, self.name(), &url).await?;

        Ok(response
            .results
            .iter()
            .map(|item| {
                Draft {
                    title: item.title.as_deref(),
                    description: item.description.as_deref(),
                    url: item.link.as_deref(),
                    image: item.image_url.as_deref(),
                    published_at: parse_published(item.pub_date.as_deref()),
                    source: item.source_id.as_deref().unwrap_or("NewsData"),
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
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer) -> NewsDataAdapter {
        NewsDataAdapter::new(http_client(Duration::from_secs(5)), "test-key")
            .with_base_url(server.uri())
    }

    #[test]
    fn test_request_url_caps_size_and_sets_country() {
        let adapter = NewsDataAdapter::new(http_client(Duration::from_secs(1)), "k");
        let url = adapter.request_url(Category::Kenya, 50);
        assert!(url.starts_with("https://newsdata.io/api/1/latest?apikey=k"));
        assert!(url.contains("&size=10"));
        assert!(url.contains("&country=ke"));
        assert!(url.contains("Nairobi"));
    }

    #[test]
    fn test_request_url_topic_category() {
        let adapter = NewsDataAdapter::new(http_client(Duration::from_secs(1)), "k");
        let url = adapter.request_url(Category::Health, 5);
        assert!(url.contains("&size=5"));
        assert!(url.contains("&category=health"));
    }

    #[tokio::test]
    async fn test_fetch_maps_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/1/latest"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "status": "success",
                    "results": [{
                        "title": "Nairobi expressway toll rates revised",
                        "description": "The Kenya National Highways Authority has announced new toll charges for motorists using the expressway.",
                        "link": "https://www.the-star.co.ke/news/expressway",
                        "image_url": null,
                        "pubDate": "2024-12-09 08:30:00",
                        "source_id": "the_star"
                    }]
                }"#,
            ))
            .mount(&server)
            .await;

        let articles = adapter(&server).fetch(Category::Kenya, 20).await.unwrap();
        assert_eq!(articles.len(), 1);
        let a = &articles[0];
        assert_eq!(a.title, "Nairobi expressway toll rates revised");
        assert_eq!(a.url, "https://www.the-star.co.ke/news/expressway");
        assert_eq!(a.source, "the_star");
        assert_eq!(a.category, Category::Kenya);
        assert!(a.image_url.starts_with("https://images.unsplash.com/"));
        assert!(a.published_at.is_some());
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = adapter(&server).fetch(Category::World, 20).await.unwrap_err();
        assert!(matches!(err, AdapterError::Status { .. }));
        assert_eq!(err.provider(), "newsdata");
    }

    #[tokio::test]
    async fn test_fetch_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = adapter(&server).fetch(Category::World, 20).await.unwrap_err();
        assert!(matches!(err, AdapterError::Malformed { .. }));
    }
}
