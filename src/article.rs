use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Latest,
    Kenya,
    World,
    Technology,
    Business,
    Health,
    Entertainment,
    Sports,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Latest,
        Category::Kenya,
        Category::World,
        Category::Technology,
        Category::Business,
        Category::Health,
        Category::Entertainment,
        Category::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Latest => "latest",
            Category::Kenya => "kenya",
            Category::World => "world",
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
            Category::Sports => "sports",
        }
    }

    /// Heading shown by the page layer.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Latest => "Latest News",
            Category::Kenya => "Kenyan News",
            Category::World => "World News",
            Category::Technology => "Technology",
            Category::Business => "Business",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Sports => "Sports",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| FetchError::UnknownCategory(s.to_string()))
    }
}

/// A normalized news article, identical in shape whether it came from a
/// live provider or the fallback catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    /// `None` when the upstream timestamp could not be parsed; such
    /// articles sort as the oldest.
    pub published_at: Option<DateTime<Utc>>,
    pub source: String,
    pub category: Category,
}

impl Article {
    /// Milliseconds since the epoch used for recency ordering.
    pub fn sort_key(&self) -> i64 {
        self.published_at.map(|p| p.timestamp_millis()).unwrap_or(0)
    }
}

/// Parse an upstream timestamp. Absent values default to now; values that
/// are present but unreadable become `None`.
pub fn parse_published(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Some(Utc::now()),
        Some(raw) => raw,
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // NewsData and Currents send "2024-12-09 12:00:00" style stamps, sometimes with a zone suffix
    let naive = raw.trim_end_matches(" +0000").trim_end_matches(" UTC");
    chrono::NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|n| n.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    mod category_tests {
        use super::*;

        #[test]
        fn test_parse_all_categories() {
            for category in Category::ALL {
                assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
            }
        }

        #[test]
        fn test_parse_is_case_insensitive() {
            assert_eq!("Kenya".parse::<Category>().unwrap(), Category::Kenya);
            assert_eq!(" SPORTS ".parse::<Category>().unwrap(), Category::Sports);
        }

        #[test]
        fn test_parse_unknown_category() {
            let err = "politics".parse::<Category>().unwrap_err();
            assert!(matches!(err, FetchError::UnknownCategory(ref c) if c == "politics"));
        }

        #[test]
        fn test_display_names() {
            assert_eq!(Category::Kenya.display_name(), "Kenyan News");
            assert_eq!(Category::Latest.display_name(), "Latest News");
            assert_eq!(Category::Health.to_string(), "health");
        }

        #[test]
        fn test_serde_lowercase() {
            let json = serde_json::to_string(&Category::Entertainment).unwrap();
            assert_eq!(json, "\"entertainment\"");
        }
    }

    mod published_tests {
        use super::*;

        #[test]
        fn test_rfc3339() {
            let parsed = parse_published(Some("2024-12-09T12:00:00Z")).unwrap();
            assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 12, 9, 12, 0, 0).unwrap());
        }

        #[test]
        fn test_rfc2822() {
            let parsed = parse_published(Some("Mon, 09 Dec 2024 10:00:00 GMT")).unwrap();
            assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 12, 9, 10, 0, 0).unwrap());
        }

        #[test]
        fn test_space_separated() {
            let parsed = parse_published(Some("2024-12-09 08:30:00")).unwrap();
            assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 12, 9, 8, 30, 0).unwrap());

            let parsed = parse_published(Some("2024-12-09 08:30:00 +0000")).unwrap();
            assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 12, 9, 8, 30, 0).unwrap());
        }

        #[test]
        fn test_missing_defaults_to_now() {
            let before = Utc::now();
            let parsed = parse_published(None).unwrap();
            assert!(parsed >= before);
            assert!(parse_published(Some("  ")).is_some());
        }

        #[test]
        fn test_garbage_is_none() {
            assert_eq!(parse_published(Some("yesterday-ish")), None);
        }
    }

    #[test]
    fn test_sort_key_for_unparsed_timestamp_is_epoch() {
        let article = Article {
            title: "Some Title".to_string(),
            description: String::new(),
            url: "https://example.com".to_string(),
            image_url: String::new(),
            published_at: None,
            source: "Test".to_string(),
            category: Category::Latest,
        };
        assert_eq!(article.sort_key(), 0);
    }

    #[test]
    fn test_article_serializes_with_camel_case_fields() {
        let article = Article {
            title: "Some Title".to_string(),
            description: "Body.".to_string(),
            url: "https://example.com".to_string(),
            image_url: "https://img.example.com/a.jpg".to_string(),
            published_at: Some(Utc.with_ymd_and_hms(2024, 12, 9, 12, 0, 0).unwrap()),
            source: "Test".to_string(),
            category: Category::World,
        };
        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["imageURL"], "https://img.example.com/a.jpg");
        assert_eq!(value["publishedAt"], "2024-12-09T12:00:00Z");
        assert_eq!(value["category"], "world");
    }
}
