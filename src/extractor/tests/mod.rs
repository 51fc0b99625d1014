//! Fixture-driven tests for the extraction cascade, exercising the
//! pattern scan and field-shape resolution against realistic page bodies.

use std::fs;

use crate::extractor::embedded::{self, EmbeddedPattern};
use crate::extractor::shapes::{self, FieldShape};
use crate::extractor::{MediaPost, direct};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("failed to read test fixture")
}

#[test]
fn shared_data_page_resolves_via_legacy_shape() {
    let body = fixture("shared_data.html");

    let (doc, pattern) = embedded::scan(&body).expect("embedded document");
    assert_eq!(pattern, EmbeddedPattern::SharedData);

    let (fields, shape) = shapes::resolve_fields(&doc).expect("field shape");
    assert_eq!(shape, FieldShape::EntryData);

    let post = MediaPost::assemble("ABC123xyz", fields);
    assert_eq!(post.media_url, "https://cdn.example.com/x.mp4");
    assert_eq!(post.file_name, "ABC123xyz.mp4");
    assert_eq!(post.owner, "alice");
    assert_eq!(post.likes, 10);
    assert_eq!(post.comments, 0);
    assert_eq!(post.views, 0);
    assert!(post.caption.is_empty());
}

#[test]
fn additional_data_page_resolves_via_root_graphql_shape() {
    let body = fixture("additional_data.html");

    let (doc, pattern) = embedded::scan(&body).expect("embedded document");
    assert_eq!(pattern, EmbeddedPattern::AdditionalData);

    let (fields, shape) = shapes::resolve_fields(&doc).expect("field shape");
    assert_eq!(shape, FieldShape::PostGraphql);
    assert_eq!(fields.media_url, "https://cdn.example.com/a.mp4?efg=AYC&sig=k7");
    assert_eq!(fields.thumbnail_url, "https://cdn.example.com/a.jpg");
    assert_eq!(fields.owner, "bob");
    assert_eq!(fields.likes, 55);
    assert_eq!(fields.comments, 8);
    assert_eq!(fields.views, 4100);
    assert_eq!(fields.caption, "city lights");
}

#[test]
fn script_json_page_resolves_via_web_info_shape() {
    let body = fixture("web_info.html");

    let (doc, pattern) = embedded::scan(&body).expect("embedded document");
    assert_eq!(pattern, EmbeddedPattern::ScriptJson);

    let (fields, shape) = shapes::resolve_fields(&doc).expect("field shape");
    assert_eq!(shape, FieldShape::WebInfo);
    // serde_json already turned the \/ escapes into plain slashes.
    assert_eq!(fields.media_url, "https://cdn.example.com/w.mp4?efg=AYB&oh=77");
    assert_eq!(fields.owner, "carla");
    assert_eq!(fields.likes, 7);
    assert_eq!(fields.comments, 2);
    assert_eq!(fields.views, 90);
    assert_eq!(fields.caption, "morning surf");
}

#[test]
fn graph_prefix_page_resolves_via_root_graphql_shape() {
    let body = fixture("graph_prefix.html");

    let (doc, pattern) = embedded::scan(&body).expect("embedded document");
    assert_eq!(pattern, EmbeddedPattern::GraphPrefix);

    let (fields, shape) = shapes::resolve_fields(&doc).expect("field shape");
    assert_eq!(shape, FieldShape::PostGraphql);
    assert_eq!(fields.media_url, "https://cdn.example.com/g.mp4");
    assert_eq!(fields.owner, "dmitri");
    assert_eq!(fields.likes, 210);
    assert_eq!(fields.views, 8800);
}

#[test]
fn feed_items_document_resolves_via_feed_shape() {
    let doc: serde_json::Value = serde_json::from_str(&fixture("feed_items.json")).unwrap();

    let (fields, shape) = shapes::resolve_fields(&doc).expect("field shape");
    assert_eq!(shape, FieldShape::FeedItems);
    assert_eq!(fields.media_url, "https://cdn.example.com/m.mp4?efg=AYM&oh=31&oe=66");
    assert_eq!(fields.thumbnail_url, "https://cdn.example.com/m.jpg");
    assert_eq!(fields.owner, "elena");
    assert_eq!(fields.likes, 23);
    assert_eq!(fields.comments, 6);
    assert_eq!(fields.views, 480);
    assert_eq!(fields.caption, "golden hour");
}

#[test]
fn direct_only_page_skips_structured_extraction() {
    let body = fixture("direct_only.html");

    assert!(embedded::scan(&body).is_none());

    let fields = direct::scan(&body).expect("direct pattern");
    assert_eq!(fields.media_url, "https://cdn.example.com/direct.mp4?efg=AYA&se=7");
    assert_eq!(fields.thumbnail_url, "https://cdn.example.com/direct.jpg");
    assert!(fields.owner.is_empty());
    assert_eq!(fields.likes, 0);
    assert_eq!(fields.comments, 0);
    assert_eq!(fields.views, 0);
}

#[test]
fn unrelated_page_matches_nothing() {
    let body = fixture("unrelated.html");
    assert!(embedded::scan(&body).is_none());
    assert!(direct::scan(&body).is_none());
}
