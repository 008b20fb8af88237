use std::fs;
use std::path::PathBuf;

use crate::errors::PostResult;
use crate::sources::traits::FeedSource;

/// Reads a feed from disk, e.g. the `rss.xml` of a built site
pub struct FileFeedSource {
    path: PathBuf,
}

impl FileFeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedSource for FileFeedSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_bytes(&self) -> PostResult<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PostError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_file_contents() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"<rss></rss>").unwrap();

        let source = FileFeedSource::new(file.path());
        assert_eq!(source.fetch_bytes().unwrap(), b"<rss></rss>");
        assert_eq!(source.location(), file.path().display().to_string());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileFeedSource::new(dir.path().join("rss.xml"));

        assert!(matches!(source.fetch_bytes(), Err(PostError::Io(_))));
    }
}
