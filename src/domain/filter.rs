//! Filter state for post listings and its query-string codec.
//!
//! `FilterState` is the single source of truth for "which posts is the
//! reader looking at". The category tab shown by list views is not stored
//! anywhere; it is derived from the `kind` field through [`CategoryTab`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use wfhubby_api_types::PostType;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Sort orders offered by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl SortOrder {
    /// Parse a UI sort token. Unknown tokens fall back to [`SortOrder::Newest`].
    pub fn from_ui_token(token: &str) -> Self {
        match token {
            "-published_at" => SortOrder::Newest,
            "published_at" => SortOrder::Oldest,
            "title" => SortOrder::TitleAsc,
            "-title" => SortOrder::TitleDesc,
            _ => SortOrder::Newest,
        }
    }

    pub fn ui_token(self) -> &'static str {
        match self {
            SortOrder::Newest => "-published_at",
            SortOrder::Oldest => "published_at",
            SortOrder::TitleAsc => "title",
            SortOrder::TitleDesc => "-title",
        }
    }

    /// Vocabulary accepted by the backend's `sort` parameter.
    pub fn backend_token(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::TitleAsc | SortOrder::TitleDesc => "title",
        }
    }
}

/// Translate a UI sort token into the backend vocabulary.
pub fn map_sort_token(token: &str) -> &'static str {
    SortOrder::from_ui_token(token).backend_token()
}

/// Coarse three-way view selector layered over [`FilterState::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTab {
    #[default]
    All,
    Recipes,
    Tech,
}

impl CategoryTab {
    pub fn kind(self) -> Option<PostType> {
        match self {
            CategoryTab::All => None,
            CategoryTab::Recipes => Some(PostType::Recipe),
            CategoryTab::Tech => Some(PostType::Tech),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryTab::All => "all",
            CategoryTab::Recipes => "recipes",
            CategoryTab::Tech => "tech",
        }
    }
}

impl From<Option<PostType>> for CategoryTab {
    fn from(kind: Option<PostType>) -> Self {
        match kind {
            None => CategoryTab::All,
            Some(PostType::Recipe) => CategoryTab::Recipes,
            Some(PostType::Tech) => CategoryTab::Tech,
        }
    }
}

/// What subset of posts the reader is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(rename = "type")]
    pub kind: Option<PostType>,
    pub q: Option<String>,
    pub tags: Vec<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<SortOrder>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            kind: None,
            q: None,
            tags: Vec::new(),
            page: None,
            page_size: Some(DEFAULT_PAGE_SIZE),
            sort: Some(SortOrder::Newest),
        }
    }
}

/// Partial update applied with [`FilterState::merge`]. `None` leaves a field
/// untouched; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub kind: Option<Option<PostType>>,
    pub q: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<SortOrder>,
}

impl FilterState {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size.max(1)),
            ..Self::default()
        }
    }

    pub fn tab(&self) -> CategoryTab {
        CategoryTab::from(self.kind)
    }

    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn has_active_filters(&self) -> bool {
        self.kind.is_some() || self.q.is_some() || !self.tags.is_empty()
    }

    /// Apply a partial update. A change to `type`, `q`, or `tag` resets the
    /// page to 1; changes to paging fields alone leave the rest untouched.
    pub fn merge(&self, patch: FilterPatch) -> FilterState {
        let mut next = self.clone();
        if let Some(kind) = patch.kind {
            next.kind = kind;
        }
        if let Some(q) = patch.q {
            next.q = normalize_query(q);
        }
        if let Some(tags) = patch.tags {
            next.tags = tags;
        }
        if let Some(page) = patch.page {
            next.page = Some(page.max(1));
        }
        if let Some(page_size) = patch.page_size {
            next.page_size = Some(page_size.max(1));
        }
        if let Some(sort) = patch.sort {
            next.sort = Some(sort);
        }

        let scope_changed = next.kind != self.kind
            || next.q != self.q
            || !same_tag_set(&next.tags, &self.tags);
        if scope_changed {
            next.page = Some(DEFAULT_PAGE);
        }
        next
    }

    /// Encode as `(key, value)` pairs for `GET /posts`.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(kind) = self.kind {
            params.push(("type", kind.as_str().to_string()));
        }
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }
        for tag in self.tags.iter().filter(|tag| !tag.is_empty()) {
            params.push(("tag", tag.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            params.push(("page_size", page_size.to_string()));
        }
        if let Some(sort) = self.sort {
            params.push(("sort", sort.backend_token().to_string()));
        }
        params
    }

    /// Decode from query pairs such as a deep link. Unknown keys and values
    /// that fail to parse are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> FilterState
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = FilterState {
            page_size: None,
            sort: None,
            ..FilterState::default()
        };
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "type" => state.kind = PostType::try_from(value).ok(),
                "q" => state.q = normalize_query(Some(value.to_string())),
                "tag" if !value.is_empty() => {
                    if !state.tags.iter().any(|tag| tag == value) {
                        state.tags.push(value.to_string());
                    }
                }
                "page" => state.page = value.parse().ok().filter(|page| *page > 0),
                "page_size" => state.page_size = value.parse().ok().filter(|size| *size > 0),
                "sort" => state.sort = Some(SortOrder::from_ui_token(value)),
                _ => {}
            }
        }
        state
    }
}

fn normalize_query(q: Option<String>) -> Option<String> {
    q.filter(|q| !q.is_empty())
}

fn same_tag_set(left: &[String], right: &[String]) -> bool {
    let left: HashSet<&str> = left.iter().map(String::as_str).collect();
    let right: HashSet<&str> = right.iter().map(String::as_str).collect();
    left == right
}
