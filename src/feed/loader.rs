use std::path::{Path, PathBuf};

use url::Url;

use crate::feed::fetcher::fetch_document;
use crate::feed::{Document, FeedError};

/// Loads a feed file from disk and parses it.
///
/// The whole file is read into memory as UTF-8 text before parsing.
///
/// # Errors
///
/// - [`FeedError::Io`] if the path does not exist, is unreadable, or is not UTF-8
/// - [`FeedError::Parse`] if the content is not well-formed XML
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Document, FeedError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read feed file");
    load_from_string(&content)
}

/// Parses feed XML held in memory.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] on malformed input.
pub fn load_from_string(text: &str) -> Result<Document, FeedError> {
    Document::parse(text)
}

/// Where a feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Local feed file
    File(PathBuf),
    /// Remote feed fetched over HTTP(S)
    Url(String),
}

impl FeedSource {
    /// Classifies a user-supplied location.
    ///
    /// Absolute `http`/`https` URLs become [`FeedSource::Url`]; everything else,
    /// including Windows drive paths that happen to parse as URLs, is a file path.
    pub fn detect(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                FeedSource::Url(location.to_string())
            }
            _ => FeedSource::File(PathBuf::from(location)),
        }
    }

    /// Loads and parses the feed from this source.
    ///
    /// `client` is only used for [`FeedSource::Url`].
    pub fn load(&self, client: &reqwest::blocking::Client) -> Result<Document, FeedError> {
        match self {
            FeedSource::File(path) => load_from_file(path),
            FeedSource::Url(url) => fetch_document(client, url),
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSource::File(path) => write!(f, "{}", path.display()),
            FeedSource::Url(url) => f.write_str(url),
        }
    }
}
