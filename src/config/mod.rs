use std::time::Duration;

use url::Url;

use crate::errors::{PostError, PostResult};
use crate::sources::http::DEFAULT_TIMEOUT;

pub const DEFAULT_MARKER_CLASS: &str = "newest-post";
pub const DEFAULT_PRESENTATION_CLASS: &str = "jumbotron";

#[derive(Debug, Clone)]
pub struct Config {
    pub site_url: Option<Url>,
    pub feed: Option<String>,
    pub timeout: Duration,
    pub marker_class: String,
    pub presentation_class: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: None,
            feed: None,
            timeout: DEFAULT_TIMEOUT,
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            presentation_class: DEFAULT_PRESENTATION_CLASS.to_string(),
        }
    }
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> PostResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source; unset keys keep defaults
    pub fn from_lookup<F>(lookup: F) -> PostResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(site_url) = lookup("NEWEST_POST_SITE_URL") {
            config.site_url = Some(parse_site_url(&site_url)?);
        }

        config.feed = lookup("NEWEST_POST_FEED");

        if let Some(secs) = lookup("NEWEST_POST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                PostError::Config(format!("NEWEST_POST_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(marker) = lookup("NEWEST_POST_MARKER_CLASS") {
            config.marker_class = marker;
        }

        if let Some(class) = lookup("NEWEST_POST_PRESENTATION_CLASS") {
            config.presentation_class = class;
        }

        Ok(config)
    }
}

/// Parse a site URL, making sure relative feed paths join under it
pub fn parse_site_url(raw: &str) -> PostResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| PostError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if url.cannot_be_a_base() {
        return Err(PostError::InvalidUrl(format!("{}: cannot be a base URL", raw)));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
