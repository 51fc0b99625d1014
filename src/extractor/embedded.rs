//! Locating a structured JSON document embedded in page markup.
//!
//! The platform has shipped its post data in several places over the
//! years: a `window._sharedData` assignment, a deferred
//! `window.__additionalDataLoaded(...)` call, inline
//! `<script type="application/json">` payloads, and bare object graphs
//! rooted at `{"graphql":...}`. The patterns are tried in that fixed
//! order; the first fragment that parses as JSON wins and the rest are
//! skipped.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Which document-extraction pattern produced the structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedPattern {
    /// The response body itself was a JSON document (machine-readable
    /// variant), no pattern matching needed.
    JsonBody,
    SharedData,
    AdditionalData,
    ScriptJson,
    GraphPrefix,
}

impl fmt::Display for EmbeddedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmbeddedPattern::JsonBody => "json response body",
            EmbeddedPattern::SharedData => "shared-data assignment",
            EmbeddedPattern::AdditionalData => "additional-data loader call",
            EmbeddedPattern::ScriptJson => "script-tag json payload",
            EmbeddedPattern::GraphPrefix => "graphql object prefix",
        };
        f.write_str(name)
    }
}

static SHARED_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"window\._sharedData\s*=\s*").unwrap());

static ADDITIONAL_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"window\.__additionalDataLoaded\s*\(\s*[^,]*,\s*").unwrap());

static SCRIPT_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script[^>]+type="application/json"[^>]*>(.*?)</script>"#).unwrap()
});

/// Substrings that mark a script-tag JSON payload as post data rather
/// than unrelated page configuration.
const MEDIA_MARKERS: &[&str] = &["shortcode_media", "xdt_", "video_versions"];

const GRAPH_PREFIX: &str = r#"{"graphql":"#;

/// Scan markup for an embedded structured document.
pub fn scan(body: &str) -> Option<(Value, EmbeddedPattern)> {
    if let Some(m) = SHARED_DATA_RE.find(body)
        && let Some(doc) = balanced_json_at(body, m.end())
    {
        debug!(pattern = %EmbeddedPattern::SharedData, "embedded document matched");
        return Some((doc, EmbeddedPattern::SharedData));
    }

    if let Some(m) = ADDITIONAL_DATA_RE.find(body)
        && let Some(doc) = balanced_json_at(body, m.end())
    {
        debug!(pattern = %EmbeddedPattern::AdditionalData, "embedded document matched");
        return Some((doc, EmbeddedPattern::AdditionalData));
    }

    for captures in SCRIPT_JSON_RE.captures_iter(body) {
        let fragment = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        if !MEDIA_MARKERS.iter().any(|marker| fragment.contains(marker)) {
            continue;
        }
        if let Ok(doc) = serde_json::from_str::<Value>(fragment) {
            debug!(pattern = %EmbeddedPattern::ScriptJson, "embedded document matched");
            return Some((doc, EmbeddedPattern::ScriptJson));
        }
    }

    if let Some(start) = body.find(GRAPH_PREFIX)
        && let Some(doc) = balanced_json_at(body, start)
    {
        debug!(pattern = %EmbeddedPattern::GraphPrefix, "embedded document matched");
        return Some((doc, EmbeddedPattern::GraphPrefix));
    }

    None
}

/// Extract and parse the balanced JSON object starting at `start`, which
/// must point at (or just before) an opening brace. Returns `None` when
/// the braces never balance or the slice does not parse.
fn balanced_json_at(text: &str, start: usize) -> Option<Value> {
    let rest = &text[start..];
    let open = rest.find('{')?;
    // Only allow whitespace between the marker and the object.
    if !rest[..open].trim().is_empty() {
        return None;
    }

    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let fragment = &rest[open..=i];
                    return serde_json::from_str(fragment).ok();
                }
            }
            _ => {}
        }
    }

    None
}
