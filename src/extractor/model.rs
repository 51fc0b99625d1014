use serde::{Deserialize, Serialize};

use crate::extractor::direct::unescape_url;

/// Raw field values pulled out of a page by one extraction strategy,
/// before assembly into a [`MediaPost`]. Counts default to 0 and strings
/// to empty when a page does not carry them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaFields {
    pub media_url: String,
    pub thumbnail_url: String,
    pub caption: String,
    pub owner: String,
    pub likes: u64,
    pub comments: u64,
    pub views: u64,
}

/// The resolved output of one successful `resolve()` call. Immutable once
/// constructed; `media_url` is always fully qualified, de-escaped and
/// directly fetchable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaPost {
    pub shortcode: String,
    pub media_url: String,
    /// Suggested output filename, `{shortcode}.mp4`.
    pub file_name: String,
    pub thumbnail_url: String,
    pub caption: String,
    pub owner: String,
    pub likes: u64,
    pub comments: u64,
    pub views: u64,
    /// Canonical page URL the media was resolved from.
    pub source_url: String,
}

impl MediaPost {
    /// Build the final result from one strategy's extracted fields.
    pub fn assemble(shortcode: &str, fields: MediaFields) -> Self {
        Self {
            shortcode: shortcode.to_string(),
            media_url: unescape_url(&fields.media_url),
            file_name: format!("{shortcode}.mp4"),
            thumbnail_url: unescape_url(&fields.thumbnail_url),
            caption: fields.caption,
            owner: fields.owner,
            likes: fields.likes,
            comments: fields.comments,
            views: fields.views,
            source_url: format!("https://www.instagram.com/p/{shortcode}/"),
        }
    }
}
