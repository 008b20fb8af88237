use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::errors::PostResult;
use crate::sources::traits::FeedSource;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpFeedSource {
    client: Client,
    feed_url: Url,
}

impl HttpFeedSource {
    pub fn new(feed_url: Url) -> Self {
        Self::with_timeout(feed_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(feed_url: Url, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            feed_url,
        }
    }
}

impl FeedSource for HttpFeedSource {
    fn location(&self) -> String {
        self.feed_url.to_string()
    }

    /// GET the feed. Only a 2xx response counts as a successful fetch.
    fn fetch_bytes(&self) -> PostResult<Vec<u8>> {
        let response = self
            .client
            .get(self.feed_url.clone())
            .send()?
            .error_for_status()?;
        let bytes = response.bytes()?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PostError;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one canned HTTP response on a local port
    fn serve_once(status: &'static str, body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                while reader.read_line(&mut line).unwrap_or(0) > 0 {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/rss+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Url::parse(&format!("http://{}/rss.xml", addr)).unwrap()
    }

    #[test]
    fn test_fetches_body_on_success() {
        let body = "<rss><channel><item><title>Hello</title></item></channel></rss>";
        let source = HttpFeedSource::new(serve_once("200 OK", body));

        let bytes = source.fetch_bytes().unwrap();
        assert_eq!(bytes, body.as_bytes());
    }

    #[test]
    fn test_non_success_status_is_http_error() {
        let source = HttpFeedSource::new(serve_once("404 Not Found", "missing"));

        let err = source.fetch_bytes().unwrap_err();
        assert!(matches!(err, PostError::Http(_)));
    }

    #[test]
    fn test_location_is_feed_url() {
        let url = Url::parse("https://example.com/rss.xml").unwrap();
        let source = HttpFeedSource::new(url);

        assert_eq!(source.location(), "https://example.com/rss.xml");
    }
}
