pub mod feed;
pub mod post;

pub use feed::{Feed, FeedItem, FeedType};
pub use post::{ExtractionResult, PostSummary};
