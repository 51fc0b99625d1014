//! Field-path resolution over a parsed structured document.
//!
//! The platform has used at least six distinct object-graph layouts for
//! post data. Each layout is one shape here: an independent extractor
//! tried in fixed order. A shape only matches when it locates a non-empty
//! media URL; a layout that is present but carries no URL (a photo post,
//! say) is a non-match and the cascade moves on.

use serde_json::Value;
use tracing::debug;

use crate::extractor::model::MediaFields;

/// Which object-graph layout resolved the fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// `entry_data.PostPage[0].graphql.shortcode_media`, snake_case legacy.
    EntryData,
    /// `graphql.shortcode_media` at the document root.
    PostGraphql,
    /// `data.xdt_shortcode_media` GraphQL API document.
    XdtMedia,
    /// `items[0]` mobile feed item.
    FeedItems,
    /// `data.xdt_api__v1__media__shortcode__web_info.items[0]`.
    WebInfo,
    /// Flattened per-entity keyed map with camelCase fields.
    KeyedMediaMap,
}

type ShapeFn = fn(&Value) -> Option<MediaFields>;

const SHAPES: &[(ShapeFn, FieldShape)] = &[
    (from_entry_data, FieldShape::EntryData),
    (from_post_graphql, FieldShape::PostGraphql),
    (from_xdt_media, FieldShape::XdtMedia),
    (from_feed_items, FieldShape::FeedItems),
    (from_web_info, FieldShape::WebInfo),
    (from_keyed_media_map, FieldShape::KeyedMediaMap),
];

/// Try each shape in order; the first one that yields a media URL wins.
pub fn resolve_fields(doc: &Value) -> Option<(MediaFields, FieldShape)> {
    for (shape_fn, shape) in SHAPES {
        if let Some(fields) = shape_fn(doc) {
            debug!(shape = ?shape, "field shape resolved");
            return Some((fields, *shape));
        }
    }
    None
}

fn from_entry_data(doc: &Value) -> Option<MediaFields> {
    doc.pointer("/entry_data/PostPage/0/graphql/shortcode_media")
        .and_then(from_shortcode_media)
}

fn from_post_graphql(doc: &Value) -> Option<MediaFields> {
    doc.pointer("/graphql/shortcode_media")
        .and_then(from_shortcode_media)
}

fn from_xdt_media(doc: &Value) -> Option<MediaFields> {
    doc.pointer("/data/xdt_shortcode_media")
        .and_then(from_shortcode_media)
}

fn from_feed_items(doc: &Value) -> Option<MediaFields> {
    doc.pointer("/items/0").and_then(from_feed_item)
}

fn from_web_info(doc: &Value) -> Option<MediaFields> {
    doc.pointer("/data/xdt_api__v1__media__shortcode__web_info/items/0")
        .and_then(from_feed_item)
}

/// Normalized-cache layout: media entities keyed by id under a top-level
/// `media` map, with camelCase field names. Keys are scanned in order and
/// the first entity carrying a video URL wins.
fn from_keyed_media_map(doc: &Value) -> Option<MediaFields> {
    let map = doc.get("media")?.as_object()?;
    for entity in map.values() {
        let Some(media_url) = non_empty_str(entity.pointer("/videoUrl")) else {
            continue;
        };
        return Some(MediaFields {
            media_url,
            thumbnail_url: non_empty_str(entity.pointer("/thumbnailUrl")).unwrap_or_default(),
            caption: non_empty_str(entity.pointer("/caption")).unwrap_or_default(),
            owner: non_empty_str(entity.pointer("/owner/username")).unwrap_or_default(),
            likes: first_count(entity, &["/likeCount"]),
            comments: first_count(entity, &["/commentCount"]),
            views: first_count(entity, &["/viewCount"]),
        });
    }
    None
}

/// The `shortcode_media` node shared by the three GraphQL-style shapes.
fn from_shortcode_media(node: &Value) -> Option<MediaFields> {
    let media_url = non_empty_str(node.pointer("/video_url"))?;
    Some(MediaFields {
        media_url,
        thumbnail_url: non_empty_str(node.pointer("/thumbnail_src"))
            .or_else(|| non_empty_str(node.pointer("/display_url")))
            .unwrap_or_default(),
        caption: non_empty_str(node.pointer("/edge_media_to_caption/edges/0/node/text"))
            .or_else(|| non_empty_str(node.pointer("/caption/text")))
            .unwrap_or_default(),
        owner: non_empty_str(node.pointer("/owner/username")).unwrap_or_default(),
        likes: first_count(node, &["/edge_media_preview_like/count", "/like_count"]),
        comments: first_count(
            node,
            &[
                "/edge_media_to_parent_comment/count",
                "/edge_media_to_comment/count",
                "/comment_count",
            ],
        ),
        views: first_count(node, &["/video_view_count", "/play_count"]),
    })
}

/// The mobile feed item layout (`video_versions`, `image_versions2`).
fn from_feed_item(item: &Value) -> Option<MediaFields> {
    let media_url = non_empty_str(item.pointer("/video_versions/0/url"))?;
    Some(MediaFields {
        media_url,
        thumbnail_url: non_empty_str(item.pointer("/image_versions2/candidates/0/url"))
            .unwrap_or_default(),
        caption: non_empty_str(item.pointer("/caption/text")).unwrap_or_default(),
        owner: non_empty_str(item.pointer("/user/username")).unwrap_or_default(),
        likes: first_count(item, &["/like_count"]),
        comments: first_count(item, &["/comment_count"]),
        views: first_count(item, &["/play_count", "/view_count"]),
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First pointer that resolves to a number wins; missing counters are 0.
fn first_count(node: &Value, pointers: &[&str]) -> u64 {
    pointers
        .iter()
        .find_map(|p| node.pointer(p).and_then(Value::as_u64))
        .unwrap_or(0)
}
