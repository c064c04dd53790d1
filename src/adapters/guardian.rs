//! The Guardian content API. Works with the public `test` key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, Draft, SourceAdapter};
use crate::article::{parse_published, Article, Category};
use crate::error::AdapterError;

const DEFAULT_BASE_URL: &str = "https://content.guardianapis.com";
const MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Response,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    results: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    web_title: Option<String>,
    web_url: Option<String>,
    web_publication_date: Option<String>,
    fields: Option<Fields>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fields {
    thumbnail: Option<String>,
    headline: Option<String>,
    trail_text: Option<String>,
}

pub struct GuardianAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GuardianAdapter {
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
            "{}/search?api-key={}&show-fields=thumbnail,headline,trailText&order-by=newest&page-size={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            limit.min(MAX_RESULTS)
        );
        let filter = match category {
            Category::Technology => Some("&section=technology"),
            Category::Business => Some("&section=business"),
            Category::Sports => Some("&section=sport"),
            Category::World => Some("&section=world"),
            Category::Kenya => Some("&q=kenya"),
            Category::Health => Some("&q=health"),
            Category::Entertainment => Some("&section=culture"),
            Category::Latest => None,
        };
        if let Some(filter) = filter {
            url.push_str(filter);
        }
        url
    }
}

#[async_trait]
impl SourceAdapter for GuardianAdapter {
    fn name(&self) -> &str {
        "guardian"
    }

    async fn fetch(&self, category: Category, limit: usize) -> Result<Vec<Article>, AdapterError> {
        let url = self.request_url(category, limit);
        let envelope: Envelope = get_json(&self.client, self.name(), &url).await?;

        Ok(envelope
            .response
            .results
            .iter()
            .map(|item| {
                let fields = item.fields.as_ref();
                let description = fields
                    .and_then(|f| f.trail_text.as_deref().or(f.headline.as_deref()))
                    .or(item.web_title.as_deref());
                Draft {
                    title: item.web_title.as_deref(),
                    description,
                    url: item.web_url.as_deref(),
                    image: fields.and_then(|f| f.thumbnail.as_deref()),
                    published_at: parse_published(item.web_publication_date.as_deref()),
                    source: "The Guardian",
                }
                .into_article(category)
            })
            .collect())
    }
}
