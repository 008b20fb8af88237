pub mod traits;
pub mod http;
pub mod file;
pub mod location;
pub mod parser;

pub use traits::FeedSource;
pub use http::HttpFeedSource;
pub use file::FileFeedSource;
pub use location::{FeedLocation, DEFAULT_FEED_PATH};
pub use parser::parse_feed;
