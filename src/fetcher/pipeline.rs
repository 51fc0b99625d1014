use bytes::Bytes;
use chardetng::EncodingDetector;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::{StatusCode, header::HeaderMap};
use std::sync::LazyLock;
use url::Url;

use crate::fetcher::types::PageResponse;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

/// Turn the raw response into a [`PageResponse`] with a UTF-8 body.
///
/// Decoding is lossy on purpose: a page with a few mangled characters can
/// still carry a perfectly good media URL, so malformed byte sequences are
/// replaced rather than rejected.
pub fn process_response(
    url_final: Url,
    status: StatusCode,
    headers: HeaderMap,
    body_bytes: Bytes,
    content_type: &str,
) -> PageResponse {
    let encoding = detect_encoding(content_type, &body_bytes);
    let (decoded, _, _) = encoding.decode(&body_bytes);
    let body = decoded.into_owned();

    PageResponse {
        url_final,
        status,
        headers,
        body_raw: body_bytes,
        body,
        content_type: content_type.to_string(),
        fetched_at: Utc::now(),
    }
}

fn detect_encoding(content_type: &str, body_bytes: &[u8]) -> &'static Encoding {
    // 1. Charset declared in the Content-Type header.
    if let Some(encoding) = encoding_from_captures(&CHARSET_REGEX, content_type) {
        return encoding;
    }

    // 2. <meta charset> within the first 4KB of the document.
    let search_bytes = &body_bytes[..body_bytes.len().min(4096)];
    let search_str = String::from_utf8_lossy(search_bytes);
    if let Some(encoding) = encoding_from_captures(&META_CHARSET_REGEX, &search_str) {
        return encoding;
    }

    // 3. Heuristic detection.
    let mut detector = EncodingDetector::new();
    detector.feed(search_bytes, false);
    detector.guess(None, true)
}

fn encoding_from_captures(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let captures = regex.captures(haystack)?;
    let label = captures.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}
