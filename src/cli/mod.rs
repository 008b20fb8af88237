pub mod commands;

pub use commands::{Cli, Commands, FeedArgs};

use crate::config::{parse_site_url, Config};
use crate::errors::PostResult;
use crate::sources::FeedLocation;

impl FeedArgs {
    /// Resolve the feed location, letting flags override the config
    pub fn location(&self, config: &Config) -> PostResult<FeedLocation> {
        let site_url = match self.site_url.as_deref() {
            Some(raw) => Some(parse_site_url(raw)?),
            None => config.site_url.clone(),
        };
        let feed = self.feed.as_deref().or(config.feed.as_deref());

        FeedLocation::resolve(feed, site_url.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            site_url: Some(parse_site_url("https://config.example.com").unwrap()),
            feed: Some("/config.xml".to_string()),
            ..Config::default()
        };
        let args = FeedArgs {
            feed: Some("/flag.xml".to_string()),
            site_url: Some("https://flag.example.com".to_string()),
        };

        let location = args.location(&config).unwrap();
        assert_eq!(location.to_string(), "https://flag.example.com/flag.xml");
    }

    #[test]
    fn test_config_used_when_flags_absent() {
        let config = Config {
            site_url: Some(parse_site_url("https://config.example.com").unwrap()),
            ..Config::default()
        };

        let location = FeedArgs::default().location(&config).unwrap();
        assert_eq!(location.to_string(), "https://config.example.com/rss.xml");
    }

    #[test]
    fn test_local_feed_without_site() {
        let args = FeedArgs {
            feed: Some("output/rss.xml".to_string()),
            site_url: None,
        };

        let location = args.location(&Config::default()).unwrap();
        assert_eq!(location, FeedLocation::Local(PathBuf::from("output/rss.xml")));
    }
}
