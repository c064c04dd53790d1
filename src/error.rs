use thiserror::Error;

/// One provider's call failed. Always recovered by the aggregator.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{provider}: request failed: {source}")]
    Http {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider}: upstream returned HTTP {status}")]
    Status {
        provider: String,
        status: reqwest::StatusCode,
    },

    #[error("{provider}: malformed payload: {message}")]
    Malformed { provider: String, message: String },

    #[error("{provider}: unreadable feed: {source}")]
    Feed {
        provider: String,
        #[source]
        source: feed_rs::parser::ParseFeedError,
    },

    #[error("{provider}: no response before the aggregation deadline")]
    Timeout { provider: String },
}

impl AdapterError {
    pub fn provider(&self) -> &str {
        match self {
            AdapterError::Http { provider, .. }
            | AdapterError::Status { provider, .. }
            | AdapterError::Malformed { provider, .. }
            | AdapterError::Feed { provider, .. }
            | AdapterError::Timeout { provider } => provider,
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// Every adapter contributed nothing; the caller switches to fallback content.
    #[error("no articles from any source ({failed} of {total} adapters failed)")]
    AggregationEmpty { failed: usize, total: usize },

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_accessor() {
        let err = AdapterError::Timeout {
            provider: "gnews".to_string(),
        };
        assert_eq!(err.provider(), "gnews");

        let err = AdapterError::Malformed {
            provider: "newsdata".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(err.provider(), "newsdata");
    }

    #[test]
    fn test_error_messages_name_the_provider() {
        let err = AdapterError::Status {
            provider: "mediastack".to_string(),
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
        };
        let msg = err.to_string();
        assert!(msg.contains("mediastack"));
        assert!(msg.contains("429"));
    }

    #[test]
    fn test_aggregation_empty_message() {
        let err = FetchError::AggregationEmpty { failed: 5, total: 8 };
        assert_eq!(
            err.to_string(),
            "no articles from any source (5 of 8 adapters failed)"
        );
    }
}
