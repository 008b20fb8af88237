use crate::errors::PostResult;

#[cfg_attr(test, mockall::automock)]
pub trait FeedSource: Send + Sync {
    /// Where the feed is read from, used in logs and errors
    fn location(&self) -> String;

    /// Fetch the raw feed payload
    fn fetch_bytes(&self) -> PostResult<Vec<u8>>;
}

impl<S: FeedSource + ?Sized> FeedSource for Box<S> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn fetch_bytes(&self) -> PostResult<Vec<u8>> {
        (**self).fetch_bytes()
    }
}
