//! Integration tests for loading feeds and extracting enclosure maps.
//!
//! Exercises the public API end-to-end: file and string loading, the `item`
//! walk over a realistic podcast feed, and the key-set property over
//! generated feeds.

use std::collections::BTreeSet;
use std::path::PathBuf;

use podcast_enclosures::feed::{self, extract, FeedError, MediaResource};
use podcast_enclosures::{extract_media_resources, load_from_file, load_from_string};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ============================================================================
// Fixture feed
// ============================================================================

#[test]
fn test_fixture_feed_mapping() {
    let doc = load_from_file(fixture_path("show.xml")).expect("Failed to load fixture feed");
    let extraction = extract(&doc);

    let guids: Vec<&str> = extraction.resources.keys().map(String::as_str).collect();
    assert_eq!(guids, vec!["field-001", "field-002", "field-003", "field-trailer"]);
    assert_eq!(extraction.skipped, 2);
    assert_eq!(extraction.invalid_lengths, 1);

    assert_eq!(
        extraction.resources["field-003"],
        MediaResource {
            guid: "field-003".to_string(),
            url: Some("https://cdn.example.com/field-003.mp3".to_string()),
            length: Some(48_213_877),
            media_type: Some("audio/mpeg".to_string()),
            hash_ipfs: None,
            file_name: None,
            local_path: None,
        }
    );
}

#[test]
fn test_fixture_duplicate_guid_takes_later_item() {
    let doc = load_from_file(fixture_path("show.xml")).unwrap();
    let resources = extract_media_resources(&doc);

    let episode = &resources["field-002"];
    assert_eq!(
        episode.url.as_deref(),
        Some("https://cdn.example.com/field-002.mp3")
    );
    assert_eq!(episode.length, Some(39_210_044));
    assert_eq!(episode.media_type.as_deref(), Some("audio/mpeg"));
}

#[test]
fn test_fixture_optional_attributes() {
    let doc = load_from_file(fixture_path("show.xml")).unwrap();
    let resources = extract_media_resources(&doc);

    assert_eq!(resources["field-trailer"].length, None);
    assert_eq!(resources["field-001"].length, None);
    assert_eq!(
        resources["field-001"].url.as_deref(),
        Some("https://cdn.example.com/field-001.mp3")
    );
}

#[test]
fn test_file_and_string_loads_extract_identically() {
    let path = fixture_path("show.xml");
    let text = std::fs::read_to_string(&path).unwrap();

    let from_file = extract_media_resources(&load_from_file(&path).unwrap());
    let from_string = extract_media_resources(&load_from_string(&text).unwrap());

    assert_eq!(from_file, from_string);
}

#[test]
fn test_enclosure_urls_view() {
    let doc = load_from_file(fixture_path("show.xml")).unwrap();
    let urls = feed::enclosure_urls(&extract_media_resources(&doc));

    assert_eq!(urls.len(), 4);
    assert_eq!(
        urls.get("field-trailer").map(String::as_str),
        Some("https://cdn.example.com/trailer.mp3")
    );
}

#[test]
fn test_mapping_serializes_to_json_object() {
    let doc = load_from_file(fixture_path("show.xml")).unwrap();
    let json = serde_json::to_value(extract_media_resources(&doc)).unwrap();

    let episode = &json["field-003"];
    assert_eq!(episode["url"], "https://cdn.example.com/field-003.mp3");
    assert_eq!(episode["length"], 48_213_877);
    assert!(episode["file_name"].is_null());
}

// ============================================================================
// Load failures
// ============================================================================

#[test]
fn test_missing_file_is_io_error() {
    let result = load_from_file(fixture_path("does-not-exist.xml"));
    assert!(matches!(result, Err(FeedError::Io { .. })));
}

#[test]
fn test_truncated_feed_is_parse_error() {
    let text = std::fs::read_to_string(fixture_path("show.xml")).unwrap();
    let truncated = &text[..text.len() / 2];

    let result = load_from_string(truncated);
    assert!(matches!(result, Err(FeedError::Parse(_))));
}

// ============================================================================
// Properties
// ============================================================================

/// One generated item: optional GUID text, whether it carries an enclosure.
fn item_strategy() -> impl Strategy<Value = (Option<String>, bool)> {
    (proptest::option::of("[a-z0-9]{0,4}"), any::<bool>())
}

fn render_feed(items: &[(Option<String>, bool)]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0"?><rss version="2.0"><channel>"#);
    for (index, (guid, has_enclosure)) in items.iter().enumerate() {
        xml.push_str("<item>");
        if let Some(guid) = guid {
            xml.push_str(&format!("<guid>{}</guid>", guid));
        }
        if *has_enclosure {
            xml.push_str(&format!(
                r#"<enclosure url="https://example.com/{}.mp3" length="{}"/>"#,
                index, index
            ));
        }
        xml.push_str("</item>");
    }
    xml.push_str("</channel></rss>");
    xml
}

proptest! {
    #[test]
    fn prop_keys_are_guids_with_enclosures(items in proptest::collection::vec(item_strategy(), 0..20)) {
        let doc = load_from_string(&render_feed(&items)).unwrap();
        let resources = extract_media_resources(&doc);

        let expected: BTreeSet<String> = items
            .iter()
            .filter(|(guid, has_enclosure)| *has_enclosure && guid.as_deref().is_some_and(|g| !g.is_empty()))
            .filter_map(|(guid, _)| guid.clone())
            .collect();
        let actual: BTreeSet<String> = resources.keys().cloned().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_last_item_wins(items in proptest::collection::vec(item_strategy(), 0..20)) {
        let doc = load_from_string(&render_feed(&items)).unwrap();
        let resources = extract_media_resources(&doc);

        for (guid, resource) in &resources {
            let last_index = items
                .iter()
                .rposition(|(g, has_enclosure)| *has_enclosure && g.as_deref() == Some(guid.as_str()))
                .expect("every key comes from some item");
            prop_assert_eq!(resource.length, Some(last_index as u64));
            let expected_url = format!("https://example.com/{}.mp3", last_index);
            prop_assert_eq!(resource.url.as_deref(), Some(expected_url.as_str()));
        }
    }
}
