use crate::config::{Config, DEFAULT_MARKER_CLASS, DEFAULT_PRESENTATION_CLASS};
use crate::domain::{ExtractionResult, Feed, PostSummary};
use crate::errors::{PostError, PostResult};
use crate::page::{Content, ElementUpdate, Page};
use crate::sources::{parse_feed, FeedSource};

#[derive(Debug, Clone)]
pub struct InjectOptions {
    pub marker_class: String,
    pub presentation_class: String,
    /// Wrap the title in a link to the post
    pub link_title: bool,
    /// Write an empty title instead of failing when the feed has no items
    pub allow_empty: bool,
}

impl Default for InjectOptions {
    fn default() -> Self {
        Self {
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            presentation_class: DEFAULT_PRESENTATION_CLASS.to_string(),
            link_title: false,
            allow_empty: false,
        }
    }
}

impl InjectOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            marker_class: config.marker_class.clone(),
            presentation_class: config.presentation_class.clone(),
            link_title: false,
            allow_empty: false,
        }
    }

    pub fn update_for(&self, post: &ExtractionResult) -> ElementUpdate {
        let content = if self.link_title && !post.post_url.is_empty() {
            Content::Link {
                href: post.post_url.clone(),
                text: post.post_title.clone(),
            }
        } else {
            Content::Text(post.post_title.clone())
        };

        ElementUpdate::new(&self.marker_class, &self.presentation_class, content)
    }
}

pub struct PostService<S: FeedSource> {
    source: S,
}

impl<S: FeedSource> PostService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch and parse the feed
    pub fn fetch_feed(&self) -> PostResult<Feed> {
        let location = self.source.location();
        let bytes = self.source.fetch_bytes()?;

        tracing::info!(location = %location, bytes = bytes.len(), "Success");
        tracing::debug!(payload = %String::from_utf8_lossy(&bytes), "Feed payload");

        let feed = parse_feed(&bytes)?;
        tracing::debug!(feed_type = %feed.feed_type, items = feed.items.len(), "Parsed feed");
        Ok(feed)
    }

    /// Extract the newest post, with empty fields when the feed has none
    pub fn extract(&self) -> PostResult<ExtractionResult> {
        let feed = self.fetch_feed()?;
        Ok(ExtractionResult::from_feed(&feed))
    }

    /// Extract the newest post, failing on an empty feed
    pub fn newest_post(&self) -> PostResult<ExtractionResult> {
        let feed = self.fetch_feed()?;
        ExtractionResult::newest(&feed, &self.source.location())
    }

    /// The newest post with its date and feed type
    pub fn summary(&self) -> PostResult<PostSummary> {
        let feed = self.fetch_feed()?;
        PostSummary::newest(&feed, &self.source.location())
    }

    /// Run `then` with the newest post once extraction has completed.
    /// With `allow_empty` an empty feed yields an empty post instead of an error.
    pub fn with_newest_post<T, F>(&self, allow_empty: bool, then: F) -> PostResult<T>
    where
        F: FnOnce(ExtractionResult) -> PostResult<T>,
    {
        let post = if allow_empty {
            self.extract()?
        } else {
            self.newest_post()?
        };
        then(post)
    }

    /// Fetch the newest post, then write it into the page's marked element.
    ///
    /// The marker is checked before any request is made, and the page is
    /// only touched after extraction has succeeded.
    pub fn update_page(
        &self,
        page: &mut Page,
        options: &InjectOptions,
    ) -> PostResult<ExtractionResult> {
        if !page.has_marked(&options.marker_class)? {
            return Err(PostError::MissingTargetElement(options.marker_class.clone()));
        }

        self.with_newest_post(options.allow_empty, |post| {
            page.apply(&options.update_for(&post))?;
            tracing::info!(title = %post.post_title, url = %post.post_url, "Injected newest post");
            Ok(post)
        })
    }
}
