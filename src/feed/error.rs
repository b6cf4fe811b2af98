use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or fetching a feed document.
///
/// Every variant is surfaced to the caller unchanged. Nothing in this crate
/// retries or recovers from these.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed file could not be opened or read as UTF-8 text
    #[error("Failed to read feed file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The feed content is not well-formed XML
    #[error("XML parse error: {0}")]
    Parse(String),
    /// Network-level error (DNS, connection, TLS, timeout, body decode)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with a 4xx or 5xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
}

impl From<quick_xml::Error> for FeedError {
    fn from(err: quick_xml::Error) -> Self {
        FeedError::Parse(err.to_string())
    }
}
