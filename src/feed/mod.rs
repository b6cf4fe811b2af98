//! Feed loading and enclosure extraction.
//!
//! This module turns podcast RSS feeds into a GUID-keyed map of media
//! enclosures:
//!
//! - **Document**: an owned XML element tree built with `quick-xml`
//! - **Loading**: parse feed XML from a file, a string, or an HTTP(S) URL
//! - **Extraction**: walk `item` elements and collect their enclosures
//!
//! # Architecture
//!
//! - [`document`] - XML tree with descendant/child/text/attribute accessors
//! - [`loader`] - file and string loading, source detection
//! - [`fetcher`] - blocking HTTP retrieval with status checking
//! - [`enclosure`] - the `item` walk producing [`MediaResource`] records
//!
//! # Example
//!
//! ```no_run
//! use podcast_enclosures::feed::{extract_media_resources, fetch_from_url, load_from_string};
//!
//! let xml = fetch_from_url("https://example.com/podcast.xml")?;
//! let doc = load_from_string(&xml)?;
//! for (guid, resource) in extract_media_resources(&doc) {
//!     println!("{} -> {:?}", guid, resource.url);
//! }
//! # Ok::<(), podcast_enclosures::feed::FeedError>(())
//! ```

pub mod document;
pub mod enclosure;
mod error;
pub mod fetcher;
pub mod loader;

pub use document::{Document, Element};
pub use enclosure::{
    enclosure_urls, extract, extract_media_resources, Extraction, MediaResource, MediaResourceMap,
};
pub use error::FeedError;
pub use fetcher::{build_client, fetch_document, fetch_from_url, fetch_with_client};
pub use loader::{load_from_file, load_from_string, FeedSource};
