use std::time::Duration;

use crate::config::Config;
use crate::feed::loader::load_from_string;
use crate::feed::{Document, FeedError};

/// Fetches feed XML from a URL with a default HTTP client.
///
/// Issues a single blocking GET. No retries, no caching, and no timeout beyond
/// the client's own default.
///
/// # Errors
///
/// - [`FeedError::Network`] - DNS, connection, TLS, or timeout failure
/// - [`FeedError::HttpStatus`] - the server answered with a 4xx/5xx status;
///   the error page body is discarded
pub fn fetch_from_url(url: &str) -> Result<String, FeedError> {
    let client = reqwest::blocking::Client::new();
    fetch_with_client(&client, url)
}

/// Fetches feed XML from a URL using a caller-configured client.
///
/// Returns the response body decoded as text (charset taken from the
/// `Content-Type` header, UTF-8 otherwise). The body is returned raw; parse
/// it with [`load_from_string`] or use [`fetch_document`].
pub fn fetch_with_client(client: &reqwest::blocking::Client, url: &str) -> Result<String, FeedError> {
    tracing::debug!(url = %url, "Fetching feed");

    let response = client.get(url).send()?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        tracing::warn!(url = %url, status = %status, "Feed request failed");
        return Err(FeedError::HttpStatus(status.as_u16()));
    }

    let body = response.text()?;
    tracing::debug!(url = %url, status = %status, bytes = body.len(), "Fetched feed");
    Ok(body)
}

/// Fetches a feed and parses it into a [`Document`].
pub fn fetch_document(client: &reqwest::blocking::Client, url: &str) -> Result<Document, FeedError> {
    let body = fetch_with_client(client, url)?;
    load_from_string(&body)
}

/// Builds the blocking HTTP client used for feed fetches.
///
/// The configured user agent is always sent. A timeout is only set when the
/// configuration asks for one; otherwise reqwest's default applies.
pub fn build_client(config: &Config) -> Result<reqwest::blocking::Client, FeedError> {
    let mut builder = reqwest::blocking::Client::builder().user_agent(config.user_agent.as_str());
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}
