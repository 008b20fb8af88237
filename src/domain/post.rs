use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Feed, FeedType};
use crate::errors::{PostError, PostResult};

/// The `(url, title)` pair taken from the newest feed item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub post_url: String,
    pub post_title: String,
}

impl ExtractionResult {
    pub fn new(post_url: impl Into<String>, post_title: impl Into<String>) -> Self {
        Self {
            post_url: post_url.into(),
            post_title: post_title.into(),
        }
    }

    /// Lenient extraction: missing items or fields become empty strings.
    pub fn from_feed(feed: &Feed) -> Self {
        match feed.newest() {
            Some(item) => Self {
                post_url: item.link.clone().unwrap_or_default(),
                post_title: item.title.clone().unwrap_or_default(),
            },
            None => Self::default(),
        }
    }

    /// Strict extraction: a feed without items is an error.
    pub fn newest(feed: &Feed, location: &str) -> PostResult<Self> {
        if feed.is_empty() {
            return Err(PostError::EmptyFeed(location.to_string()));
        }
        Ok(Self::from_feed(feed))
    }

    pub fn is_empty(&self) -> bool {
        self.post_url.is_empty() && self.post_title.is_empty()
    }
}

/// The newest post together with its date and the kind of feed it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    #[serde(flatten)]
    pub post: ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
    pub feed_type: FeedType,
}

impl PostSummary {
    pub fn newest(feed: &Feed, location: &str) -> PostResult<Self> {
        let post = ExtractionResult::newest(feed, location)?;

        Ok(Self {
            post,
            published: feed.newest().and_then(|item| item.published),
            feed_type: feed.feed_type,
        })
    }
}
