//! Shared request and response types for the wfhubby content API.
//!
//! Two families live here: the wire shapes the backend actually emits
//! (`PostListEnvelope`) and the canonical shapes the client hands to the
//! rest of the application (`PostsPage`). Conversion between the two is the
//! only place field renames happen.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Opaque post identifier; the backend has used both integers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Int(i64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Int(id) => write!(f, "{id}"),
            PostId::Text(id) => f.write_str(id),
        }
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(id) => PostId::Int(id),
            Err(_) => PostId::Text(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Recipe,
    Tech,
}

impl PostType {
    pub fn as_str(self) -> &'static str {
        match self {
            PostType::Recipe => "recipe",
            PostType::Tech => "tech",
        }
    }
}

impl TryFrom<&str> for PostType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "recipe" => Ok(PostType::Recipe),
            "tech" => Ok(PostType::Tech),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

/// A post as returned by the content API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content_md: Option<String>,
    #[serde(rename = "type")]
    pub kind: PostType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_links: Vec<String>,
    pub status: PostStatus,
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pinned: bool,
    /// Backend timestamps are passed through verbatim; they may lack an offset.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Payload for `POST /admin/posts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub summary: String,
    pub content_md: String,
    #[serde(rename = "type")]
    pub kind: PostType,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub external_links: Vec<String>,
    pub status: PostStatus,
    pub slug: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Raw list body from `GET /posts`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostListEnvelope {
    #[serde(default)]
    pub posts: Option<Vec<Post>>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Canonical page of posts handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsPage {
    pub items: Vec<Post>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub pages: u32,
}

pub const DEFAULT_ENVELOPE_PAGE: u32 = 1;
pub const DEFAULT_ENVELOPE_PAGE_SIZE: u32 = 10;
pub const DEFAULT_ENVELOPE_PAGES: u32 = 1;

fn non_zero_or(value: Option<u32>, fallback: u32) -> u32 {
    value.filter(|v| *v != 0).unwrap_or(fallback)
}

impl From<PostListEnvelope> for PostsPage {
    fn from(envelope: PostListEnvelope) -> Self {
        Self {
            items: envelope.posts.unwrap_or_default(),
            total: envelope.total.unwrap_or(0),
            page: non_zero_or(envelope.page, DEFAULT_ENVELOPE_PAGE),
            page_size: non_zero_or(envelope.page_size, DEFAULT_ENVELOPE_PAGE_SIZE),
            pages: non_zero_or(envelope.total_pages, DEFAULT_ENVELOPE_PAGES),
        }
    }
}
