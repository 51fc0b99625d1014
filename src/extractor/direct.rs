//! Raw-body fallback: when no embedded structured document can be parsed,
//! scan the markup text itself for a media URL and whatever metadata sits
//! next to it.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use tracing::debug;

use crate::extractor::model::MediaFields;

/// `og:` meta properties that carry a video URL, in priority order.
const VIDEO_META_PROPERTIES: &[&str] = &["og:video", "og:video:secure_url", "og:video:url"];

static VIDEO_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""video_url"\s*:\s*"([^"]+)""#).unwrap());

static CONTENT_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""contentUrl"\s*:\s*"([^"]+)""#).unwrap());

static VIDEO_VERSIONS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)"video_versions"\s*:\s*\[\s*\{[^\]]*?"url"\s*:\s*"([^"]+)""#).unwrap()
});

static LIKE_EDGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""edge_media_preview_like"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#).unwrap());

static LIKE_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""like_count"\s*:\s*(\d+)"#).unwrap());

static COMMENT_EDGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""edge_media_to_(?:parent_)?comment"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#).unwrap()
});

static COMMENT_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""comment_count"\s*:\s*(\d+)"#).unwrap());

static VIEW_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""video_view_count"\s*:\s*(\d+)"#).unwrap());

static PLAY_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""play_count"\s*:\s*(\d+)"#).unwrap());

static OWNER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)"owner"\s*:\s*\{[^{}]*?"username"\s*:\s*"([^"]+)""#).unwrap()
});

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""username"\s*:\s*"([^"]+)""#).unwrap());

static CAPTION_EDGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)"edge_media_to_caption".{0,200}?"text"\s*:\s*"([^"]*)""#).unwrap()
});

/// Escaped forms of `& / : = ?` as they appear in inline JSON and player
/// configs.
static UNICODE_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\u00(26|2[fF]|3[aA]|3[dD]|3[fF])").unwrap());

/// Convert escaped URL characters back to their literal form.
///
/// Handles `\/`, backslash-u numeric escapes for `& / : = ?`, and
/// HTML-entity ampersands. Idempotent: a second pass leaves the output
/// unchanged.
pub fn unescape_url(raw: &str) -> String {
    let replaced = UNICODE_ESCAPE_RE.replace_all(raw, |caps: &Captures| {
        match caps[1].to_ascii_lowercase().as_str() {
            "26" => "&",
            "2f" => "/",
            "3a" => ":",
            "3d" => "=",
            "3f" => "?",
            other => unreachable!("unmatched escape {other}"),
        }
    });
    replaced.replace("\\/", "/").replace("&amp;", "&")
}

/// Scan the raw page text for a media URL and adjacent metadata.
///
/// Returns `None` only when no media URL pattern matches at all; missing
/// metadata never fails the scan, it just leaves the defaults in place.
pub fn scan(body: &str) -> Option<MediaFields> {
    let document = Html::parse_document(body);
    let media_url = find_media_url(body, &document)?;
    debug!("direct media url pattern matched");

    Some(MediaFields {
        media_url: unescape_url(&media_url),
        thumbnail_url: meta_content(&document, "og:image")
            .map(|u| unescape_url(&u))
            .unwrap_or_default(),
        caption: meta_content(&document, "og:description")
            .or_else(|| first_capture(&CAPTION_EDGE_RE, body))
            .unwrap_or_default(),
        owner: first_capture(&OWNER_RE, body)
            .or_else(|| first_capture(&USERNAME_RE, body))
            .unwrap_or_default(),
        likes: first_number(&[&LIKE_EDGE_RE, &LIKE_COUNT_RE], body),
        comments: first_number(&[&COMMENT_EDGE_RE, &COMMENT_COUNT_RE], body),
        views: first_number(&[&VIEW_COUNT_RE, &PLAY_COUNT_RE], body),
    })
}

fn find_media_url(body: &str, document: &Html) -> Option<String> {
    for property in VIDEO_META_PROPERTIES {
        if let Some(url) = meta_content(document, property) {
            return Some(url);
        }
    }
    for regex in [&*VIDEO_URL_RE, &*CONTENT_URL_RE, &*VIDEO_VERSIONS_RE] {
        if let Some(url) = first_capture(regex, body) {
            return Some(url);
        }
    }
    None
}

fn meta_content(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{property}"]"#)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

fn first_capture(regex: &Regex, body: &str) -> Option<String> {
    regex
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

fn first_number(regexes: &[&Lazy<Regex>], body: &str) -> u64 {
    regexes
        .iter()
        .find_map(|regex| first_capture(regex, body))
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0)
}
