//! NewsAPI.org `everything` search over the last day.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::{boolean_query, get_json, Draft, SourceAdapter};
use crate::article::{parse_published, Article, Category};
use crate::error::AdapterError;

const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const MAX_RESULTS: usize = 20;

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    status: String,
    #[serde(default)]
    articles: Vec<Item>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    source: Option<Source>,
}

#[derive(Debug, Deserialize)]
struct Source {
    name: Option<String>,
}

pub struct NewsApiAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiAdapter {
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
        let yesterday = (Utc::now() - Duration::days(1)).format("%Y-%m-%d");
        format!(
            "{}/v2/everything?apiKey={}&q={}&from={}&sortBy=publishedAt&pageSize={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&boolean_query(category)),
            yesterday,
            limit.min(MAX_RESULTS)
        )
    }
}

#[async_trait]
impl SourceAdapter for NewsApiAdapter {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn fetch(&self, category: Category, limit: usize) -> Result<Vec<Article>, AdapterError> {
        let url = self.request_url(category, limit);
        let response: Response = get_json(&self.client, self.name(), &url).await?;

        // NewsAPI reports some failures with a 200 and status "error"
        if response.status == "error" {
            return Err(AdapterError::Malformed {
                provider: self.name().to_string(),
                message: response.message.unwrap_or_else(|| "error status".to_string()),
            });
        }

        Ok(response
            .articles
            .iter()
            .map(|item| {
                Draft {
                    title: item.title.as_deref(),
                    description: item.description.as_deref(),
                    url: item.url.as_deref(),
                    image: item.url_to_image.as_deref(),
                    published_at: parse_published(item.published_at.as_deref()),
                    source: item
                        .source
                        .as_ref()
                        .and_then(|s| s.name.as_deref())
                        .unwrap_or("NewsAPI"),
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
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer) -> NewsApiAdapter {
        NewsApiAdapter::new(http_client(std::time::Duration::from_secs(5)), "k")
            .with_base_url(server.uri())
    }

    #[test]
    fn test_request_url_caps_page_size() {
        let adapter = NewsApiAdapter::new(http_client(std::time::Duration::from_secs(1)), "k");
        let url = adapter.request_url(Category::Technology, 100);
        assert!(url.contains("/v2/everything?apiKey=k"));
        assert!(url.contains("&pageSize=20"));
        assert!(url.contains("&sortBy=publishedAt"));
        assert!(url.contains("cybersecurity"));
    }

    #[tokio::test]
    async fn test_fetch_maps_articles_and_leaves_tombstones_to_dedupe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("pageSize", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "status": "ok",
                    "totalResults": 2,
                    "articles": [
                        {
                            "source": { "id": null, "name": "Reuters" },
                            "title": "Central bank holds rates steady",
                            "description": "Policymakers left the benchmark rate unchanged, citing easing inflation and a stable currency.",
                            "url": "https://www.reuters.com/markets/rates",
                            "urlToImage": "https://www.reuters.com/resizer/rates.jpg",
                            "publishedAt": "2024-12-09T10:00:00Z"
                        },
                        {
                            "source": { "id": null, "name": "[Removed]" },
                            "title": "[Removed]",
                            "description": "[Removed]",
                            "url": "https://removed.com",
                            "urlToImage": null,
                            "publishedAt": "1970-01-01T00:00:00Z"
                        }
                    ]
                }"#,
            ))
            .mount(&server)
            .await;

        let articles = adapter(&server).fetch(Category::Business, 50).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].source, "Reuters");
        assert_eq!(articles[1].title, "[Removed]");
        assert_eq!(crate::dedup::dedupe(articles).len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_status_in_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"error","code":"rateLimited","message":"You have made too many requests"}"#,
            ))
            .mount(&server)
            .await;

        let err = adapter(&server).fetch(Category::Latest, 20).await.unwrap_err();
        assert!(err.to_string().contains("too many requests"));
    }
}
