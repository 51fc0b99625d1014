//! Metadata sidecar written next to a downloaded video.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::extractor::MediaPost;

/// Sidecar document persisted as `{stem}.json`. Field names are part of
/// the on-disk format; do not rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSidecar {
    pub original_url: String,
    pub owner: String,
    pub likes: u64,
    pub comments: u64,
    pub views: u64,
    pub caption: String,
    /// ISO-8601 UTC timestamp of when the download finished.
    pub downloaded_at: String,
    pub video_file_name: String,
    pub thumbnail_url: String,
}

impl MediaSidecar {
    pub fn new(post: &MediaPost, video_file_name: &str) -> Self {
        Self {
            original_url: post.source_url.clone(),
            owner: post.owner.clone(),
            likes: post.likes,
            comments: post.comments,
            views: post.views,
            caption: post.caption.clone(),
            downloaded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            video_file_name: video_file_name.to_string(),
            thumbnail_url: post.thumbnail_url.clone(),
        }
    }
}

/// Write the sidecar as pretty-printed JSON.
pub fn write_sidecar(path: &Path, sidecar: &MediaSidecar) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(sidecar).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{MediaFields, MediaPost};

    fn sample_post() -> MediaPost {
        MediaPost::assemble(
            "ABC123xyz",
            MediaFields {
                media_url: "https://cdn.example.com/x.mp4".to_string(),
                thumbnail_url: "https://cdn.example.com/x.jpg".to_string(),
                caption: "sunset run".to_string(),
                owner: "alice".to_string(),
                likes: 10,
                comments: 2,
                views: 300,
            },
        )
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let sidecar = MediaSidecar::new(&sample_post(), "ABC123xyz.mp4");
        let value = serde_json::to_value(&sidecar).unwrap();
        let object = value.as_object().unwrap();
        let expected = [
            "originalUrl",
            "owner",
            "likes",
            "comments",
            "views",
            "caption",
            "downloadedAt",
            "videoFileName",
            "thumbnailUrl",
        ];
        assert_eq!(object.len(), expected.len());
        for key in expected {
            assert!(object.contains_key(key), "missing sidecar key {key}");
        }
        assert_eq!(value["originalUrl"], "https://www.instagram.com/p/ABC123xyz/");
        assert_eq!(value["videoFileName"], "ABC123xyz.mp4");
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let sidecar = MediaSidecar::new(&sample_post(), "ABC123xyz.mp4");
        assert!(chrono::DateTime::parse_from_rfc3339(&sidecar.downloaded_at).is_ok());
    }

    #[test]
    fn writes_readable_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ABC123xyz.json");
        let sidecar = MediaSidecar::new(&sample_post(), "ABC123xyz.mp4");
        write_sidecar(&path, &sidecar).unwrap();

        let parsed: MediaSidecar =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.owner, "alice");
        assert_eq!(parsed.likes, 10);
    }
}
