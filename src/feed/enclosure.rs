use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::feed::document::{Document, Element};

/// One episode's downloadable media file, keyed by the episode GUID.
///
/// `hash_ipfs`, `file_name`, and `local_path` are filled in by later
/// download/hashing stages. Extraction always leaves them `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResource {
    pub guid: String,
    /// Enclosure `url` attribute, verbatim. `None` when the feed omits it.
    pub url: Option<String>,
    /// Declared size in bytes
    pub length: Option<u64>,
    /// Declared MIME type (`type` attribute)
    pub media_type: Option<String>,
    pub hash_ipfs: Option<String>,
    pub file_name: Option<String>,
    pub local_path: Option<String>,
}

/// GUID to [`MediaResource`], ordered by GUID.
pub type MediaResourceMap = BTreeMap<String, MediaResource>;

/// Outcome of walking a feed's items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub resources: MediaResourceMap,
    /// Items dropped for lacking a non-empty `guid` or an `enclosure`
    pub skipped: usize,
    /// Items kept with `length` unset because the attribute was not an integer
    pub invalid_lengths: usize,
}

/// Builds the GUID to enclosure mapping for every `item` in the document.
///
/// See [`extract`] for the rules; this drops the counters.
pub fn extract_media_resources(document: &Document) -> MediaResourceMap {
    extract(document).resources
}

/// Walks every `item` element (at any depth, in document order) and records
/// its enclosure under the item's GUID.
///
/// - Items without a direct `guid` child, or whose GUID text is empty, are skipped.
/// - Items without a direct `enclosure` child are skipped.
/// - A missing `url` attribute is recorded as `url: None`; the item is kept.
/// - `length` is trimmed and parsed as `u64`. Missing or empty leaves it
///   unset; `"0"` is kept as `Some(0)`; anything unparseable leaves it unset
///   and logs a warning.
/// - Duplicate GUIDs: the last item in document order wins.
pub fn extract(document: &Document) -> Extraction {
    let mut extraction = Extraction::default();

    for item in document.descendants("item") {
        let Some(guid) = item.child("guid").map(Element::text).filter(|g| !g.is_empty()) else {
            extraction.skipped += 1;
            continue;
        };
        let Some(enclosure) = item.child("enclosure") else {
            tracing::debug!(guid = %guid, "Item has no enclosure, skipping");
            extraction.skipped += 1;
            continue;
        };

        let length = match parse_length(enclosure.attribute("length")) {
            Ok(length) => length,
            Err(raw) => {
                tracing::warn!(guid = %guid, length = %raw, "Ignoring non-numeric enclosure length");
                extraction.invalid_lengths += 1;
                None
            }
        };

        let resource = MediaResource {
            guid: guid.clone(),
            url: enclosure.attribute("url").map(str::to_string),
            length,
            media_type: enclosure.attribute("type").map(str::to_string),
            hash_ipfs: None,
            file_name: None,
            local_path: None,
        };

        if let Some(replaced) = extraction.resources.insert(guid, resource) {
            tracing::debug!(guid = %replaced.guid, "Duplicate GUID, later item replaces earlier one");
        }
    }

    if extraction.skipped > 0 {
        tracing::debug!(skipped = extraction.skipped, "Items without guid or enclosure skipped");
    }

    extraction
}

/// Projects the mapping down to GUID to enclosure URL, dropping entries that
/// have no URL.
pub fn enclosure_urls(resources: &MediaResourceMap) -> BTreeMap<String, String> {
    resources
        .iter()
        .filter_map(|(guid, resource)| {
            resource
                .url
                .as_ref()
                .map(|url| (guid.clone(), url.clone()))
        })
        .collect()
}

/// `Ok(None)` for a missing or blank attribute, `Err(raw)` when it is not an integer.
fn parse_length(raw: Option<&str>) -> Result<Option<u64>, &str> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<u64>().map(Some).map_err(|_| value),
    }
}
