use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    Rss,
    Atom,
    Json,
}

impl FeedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedType::Rss => "rss",
            FeedType::Atom => "atom",
            FeedType::Json => "json",
        }
    }
}

impl std::fmt::Display for FeedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single post entry. Fields the feed leaves out stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl FeedItem {
    pub fn new(title: Option<String>, link: Option<String>) -> Self {
        Self {
            title,
            link,
            published: None,
        }
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.published = published;
        self
    }
}

/// A parsed feed with its items in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub feed_type: FeedType,
    pub title: Option<String>,
    pub items: Vec<FeedItem>,
}

impl Feed {
    pub fn new(feed_type: FeedType, title: Option<String>, items: Vec<FeedItem>) -> Self {
        Self {
            feed_type,
            title,
            items,
        }
    }

    /// The newest post, which by feed convention is the first item.
    pub fn newest(&self) -> Option<&FeedItem> {
        self.items.first()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_type_display() {
        assert_eq!(FeedType::Rss.to_string(), "rss");
        assert_eq!(FeedType::Atom.to_string(), "atom");
        assert_eq!(FeedType::Json.to_string(), "json");
    }

    #[test]
    fn test_newest_is_first_item() {
        let feed = Feed::new(
            FeedType::Rss,
            None,
            vec![
                FeedItem::new(Some("First".to_string()), None),
                FeedItem::new(Some("Second".to_string()), None),
            ],
        );

        assert_eq!(feed.newest().unwrap().title.as_deref(), Some("First"));
    }

    #[test]
    fn test_empty_feed_has_no_newest() {
        let feed = Feed::new(FeedType::Atom, Some("Blog".to_string()), Vec::new());
        assert!(feed.is_empty());
        assert!(feed.newest().is_none());
    }
}
