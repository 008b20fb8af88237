use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::errors::{PostError, PostResult};
use crate::sources::file::FileFeedSource;
use crate::sources::http::HttpFeedSource;
use crate::sources::traits::FeedSource;

/// Feed path relative to the site root
pub const DEFAULT_FEED_PATH: &str = "/rss.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    Remote(Url),
    Local(PathBuf),
}

impl FeedLocation {
    /// Work out where to read the feed from.
    ///
    /// An absolute http(s) URL is used as is and a `file:` URL is read from
    /// disk. Other schemes are rejected. Anything else is joined onto the
    /// site URL when there is one, and read from disk when there isn't.
    pub fn resolve(feed: Option<&str>, site_url: Option<&Url>) -> PostResult<Self> {
        if let Some(feed) = feed {
            if let Ok(url) = Url::parse(feed) {
                match url.scheme() {
                    "http" | "https" => return Ok(FeedLocation::Remote(url)),
                    "file" => {
                        let path = url.to_file_path().map_err(|_| {
                            PostError::InvalidUrl(format!("{}: not a local file path", feed))
                        })?;
                        return Ok(FeedLocation::Local(path));
                    }
                    // A single letter is a Windows drive, e.g. `C:\site\rss.xml`
                    scheme if scheme.len() > 1 => {
                        return Err(PostError::InvalidUrl(format!(
                            "{}: unsupported scheme '{}'",
                            feed, scheme
                        )));
                    }
                    _ => {}
                }
            }
        }

        match (feed, site_url) {
            (feed, Some(base)) => {
                let path = feed.unwrap_or(DEFAULT_FEED_PATH);
                let url = base
                    .join(path)
                    .map_err(|e| PostError::InvalidUrl(format!("{}: {}", path, e)))?;
                Ok(FeedLocation::Remote(url))
            }
            (Some(feed), None) => Ok(FeedLocation::Local(PathBuf::from(feed))),
            (None, None) => Err(PostError::Config(
                "No feed location: pass --feed or set a site URL".to_string(),
            )),
        }
    }

    pub fn into_source(self, timeout: Duration) -> Box<dyn FeedSource> {
        match self {
            FeedLocation::Remote(url) => Box::new(HttpFeedSource::with_timeout(url, timeout)),
            FeedLocation::Local(path) => Box::new(FileFeedSource::new(path)),
        }
    }
}

impl std::fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedLocation::Remote(url) => write!(f, "{}", url),
            FeedLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}
