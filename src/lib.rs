//! Extracts a map of podcast episode GUIDs to media enclosures from RSS feeds.
//!
//! Feeds are loaded from a file, a string, or a URL into a [`feed::Document`],
//! then [`feed::extract_media_resources`] walks its `item` elements.

pub mod config;
pub mod feed;

pub use config::{Config, ConfigError};
pub use feed::{
    extract_media_resources, fetch_from_url, load_from_file, load_from_string, Document,
    FeedError, MediaResource, MediaResourceMap,
};
