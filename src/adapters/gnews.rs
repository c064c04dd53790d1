use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{boolean_query, get_json, topic, Draft, SourceAdapter};
use crate::article::{parse_published, Article, Category};
use crate::error::AdapterError;

const DEFAULT_BASE_URL: &str = "https://gnews.io";
const MAX_RESULTS: usize = 5;

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    articles: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    image: Option<String>,
    published_at: Option<String>,
    source: Option<Source>,
}

#[derive(Debug, Deserialize)]
struct Source {
    name: Option<String>,
}

/// GNews `top-headlines`, limited to 5 results per call on the free tier.
pub struct GNewsAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GNewsAdapter {
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
            "{}/api/v4/top-headlines?apikey={}&lang=en&max={}&sortby=publishedAt",
            self.base_url,
            urlencoding::encode(&self.api_key),
            limit.min(MAX_RESULTS)
        );
        if category == Category::Kenya {
            url.push_str("&country=ke");
        }
        if let Some(topic) = topic(category) {
            url.push_str(&format!("&category={}", topic));
        }
        url.push_str(&format!("&q={}", urlencoding::encode(&boolean_query(category))));
        url
    }
}

#[async_trait]
impl SourceAdapter for GNewsAdapter {
    fn name(&self) -> &str {
        "gnews"
    }

    async fn fetch(&self, category: Category, limit: usize) -> Result<Vec<Article>, AdapterError> {
        let url = self.request_url(category, limit);
        let response: Response = get_json(&self.client, self.name(), &url).await?;

        Ok(response
            .articles
            .iter()
            .map(|item| {
                Draft {
                    title: item.title.as_deref(),
                    description: item.description.as_deref(),
                    url: item.url.as_deref(),
                    image: item.image.as_deref(),
                    published_at: parse_published(item.published_at.as_deref()),
                    source: item
                        .source
                        .as_ref()
                        .and_then(|s| s.name.as_deref())
                        .unwrap_or("GNews"),
                }
                .into_article(category)
            })
            .collect())
    }
}
