//! URL normalization: turning a user-supplied Instagram URL into the
//! canonical shortcode that identifies one piece of content.

use thiserror::Error;
use url::Url;

/// Hosts accepted as the platform's domain.
const PLATFORM_HOSTS: &[&str] = &["instagram.com", "www.instagram.com"];

/// Path markers that precede a shortcode in a content URL:
/// post, reel, and long-form video.
const CONTENT_MARKERS: &[&str] = &["p", "reel", "tv"];

#[derive(Error, Debug)]
pub enum ShortcodeError {
    #[error("not an instagram url: {0}")]
    InvalidDomain(String),

    #[error("unrecognized instagram url shape: {0}")]
    UnrecognizedUrlShape(String),
}

/// Extract the shortcode from an Instagram content URL.
///
/// Accepts `/p/<code>/`, `/reel/<code>/`, `/tv/<code>/` and the
/// username-prefixed variants like `/<username>/reel/<code>/`. Query
/// strings are ignored. Pure and deterministic; performs no I/O.
pub fn extract_shortcode(raw: &str) -> Result<String, ShortcodeError> {
    let url = Url::parse(raw).map_err(|_| ShortcodeError::InvalidDomain(raw.to_string()))?;
    let host = url
        .host_str()
        .map(|h| h.to_lowercase())
        .ok_or_else(|| ShortcodeError::InvalidDomain(raw.to_string()))?;
    if !PLATFORM_HOSTS.contains(&host.as_str()) {
        return Err(ShortcodeError::InvalidDomain(raw.to_string()));
    }

    let path = url.path();
    let path = path.strip_suffix('/').unwrap_or(path);
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 3 {
        return Err(ShortcodeError::UnrecognizedUrlShape(raw.to_string()));
    }

    let marker = segments[segments.len() - 2];
    let code = segments[segments.len() - 1];
    if !CONTENT_MARKERS.contains(&marker) || code.is_empty() {
        return Err(ShortcodeError::UnrecognizedUrlShape(raw.to_string()));
    }

    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_post_url() {
        assert_eq!(
            extract_shortcode("https://www.instagram.com/p/DEF456/").unwrap(),
            "DEF456"
        );
    }

    #[test]
    fn extracts_from_reel_url() {
        assert_eq!(
            extract_shortcode("https://www.instagram.com/reel/ABC123xyz/").unwrap(),
            "ABC123xyz"
        );
    }

    #[test]
    fn extracts_from_tv_url() {
        assert_eq!(
            extract_shortcode("https://www.instagram.com/tv/JKL012/").unwrap(),
            "JKL012"
        );
    }

    #[test]
    fn extracts_without_trailing_slash() {
        assert_eq!(
            extract_shortcode("https://www.instagram.com/p/DEF456").unwrap(),
            "DEF456"
        );
    }

    #[test]
    fn extracts_with_username_prefix() {
        assert_eq!(
            extract_shortcode("https://www.instagram.com/kologoidaa/reel/B58TfHTnY2u/").unwrap(),
            "B58TfHTnY2u"
        );
    }

    #[test]
    fn ignores_query_string() {
        assert_eq!(
            extract_shortcode("https://www.instagram.com/reel/ABC123/?igsh=xxx").unwrap(),
            "ABC123"
        );
    }

    #[test]
    fn accepts_bare_host() {
        assert_eq!(
            extract_shortcode("https://instagram.com/reel/ABC123/").unwrap(),
            "ABC123"
        );
    }

    #[test]
    fn rejects_other_domain() {
        let err = extract_shortcode("https://www.youtube.com/watch?v=abc").unwrap_err();
        assert!(matches!(err, ShortcodeError::InvalidDomain(_)));
    }

    #[test]
    fn rejects_unparseable_url() {
        let err = extract_shortcode("not-a-valid-url").unwrap_err();
        assert!(matches!(err, ShortcodeError::InvalidDomain(_)));
    }

    #[test]
    fn rejects_profile_url() {
        let err = extract_shortcode("https://www.instagram.com/username/").unwrap_err();
        assert!(matches!(err, ShortcodeError::UnrecognizedUrlShape(_)));
    }

    #[test]
    fn rejects_unknown_marker() {
        let err = extract_shortcode("https://www.instagram.com/stories/ABC123/").unwrap_err();
        assert!(matches!(err, ShortcodeError::UnrecognizedUrlShape(_)));
    }

    #[test]
    fn rejects_empty_code() {
        let err = extract_shortcode("https://www.instagram.com/p//").unwrap_err();
        assert!(matches!(err, ShortcodeError::UnrecognizedUrlShape(_)));
    }

    #[test]
    fn error_names_the_offending_url() {
        let err = extract_shortcode("https://www.instagram.com/explore/").unwrap_err();
        assert!(err.to_string().contains("instagram.com/explore"));
    }
}
