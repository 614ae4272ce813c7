//! Render-time rules for post collections.

use std::collections::HashSet;

use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{FormatItem, well_known::Rfc3339},
    macros::format_description,
};
use wfhubby_api_types::Post;

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
const NAIVE_DATETIME_FORMAT: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);
const DATE_ONLY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Number of tags shown on a post card.
pub const PREVIEW_TAG_LIMIT: usize = 3;

/// Stable reorder placing pinned posts ahead of the rest. Relative order
/// inside each partition is whatever the input had.
pub fn render_order(posts: &[Post]) -> Vec<Post> {
    let mut ordered = posts.to_vec();
    ordered.sort_by_key(|post| !post.pinned);
    ordered
}

/// Tags seen across `posts`, deduplicated in first-occurrence order.
pub fn suggested_tags(posts: &[Post]) -> Vec<String> {
    let mut seen = HashSet::new();
    posts
        .iter()
        .flat_map(|post| post.tags.iter())
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

pub fn preview_tags(post: &Post) -> &[String] {
    let end = post.tags.len().min(PREVIEW_TAG_LIMIT);
    &post.tags[..end]
}

/// Human label for the post date, preferring `published_at`.
pub fn published_label(post: &Post) -> Option<String> {
    let raw = post
        .published_at
        .as_deref()
        .or(post.created_at.as_deref())?;
    parse_date(raw)?.format(HUMAN_DATE_FORMAT).ok()
}

/// Parse a backend timestamp that may or may not carry an offset.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value.date());
    }
    if let Ok(value) = PrimitiveDateTime::parse(raw, NAIVE_DATETIME_FORMAT) {
        return Some(value.date());
    }
    Date::parse(raw, DATE_ONLY_FORMAT).ok()
}
