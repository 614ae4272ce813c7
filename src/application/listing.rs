//! Post listing orchestration.
//!
//! [`ListController`] owns the reader's [`FilterState`] and the last page the
//! backend returned. Every [`ListAction`] goes through one reducer and yields
//! a [`FetchTicket`]; the ticket's sequence number decides whether its
//! response is still wanted when it settles. A response that arrives after a
//! newer ticket was issued is dropped, so fast filter changes never show a
//! stale page.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use wfhubby_api_types::{Post, PostType, PostsPage};

use crate::application::repos::PostsSource;
use crate::domain::filter::{CategoryTab, DEFAULT_PAGE, FilterPatch, FilterState, SortOrder};
use crate::domain::posts::{render_order, suggested_tags};
use crate::infra::http::ApiError;

/// Every transition a list view can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    SelectTab(CategoryTab),
    SetType(Option<PostType>),
    ToggleType(PostType),
    SetQuery(Option<String>),
    ToggleTag(String),
    SetTags(Vec<String>),
    SetPage(u32),
    SetPageSize(u32),
    SetSort(SortOrder),
    ClearFilters,
}

impl ListAction {
    /// Compute the filter that follows `current` under this action.
    pub fn reduce(self, current: &FilterState) -> FilterState {
        match self {
            ListAction::SelectTab(tab) => {
                let mut next = current.merge(FilterPatch {
                    kind: Some(tab.kind()),
                    ..FilterPatch::default()
                });
                next.page = Some(DEFAULT_PAGE);
                next
            }
            ListAction::SetType(kind) => current.merge(FilterPatch {
                kind: Some(kind),
                ..FilterPatch::default()
            }),
            ListAction::ToggleType(kind) => {
                let next = if current.kind == Some(kind) {
                    None
                } else {
                    Some(kind)
                };
                current.merge(FilterPatch {
                    kind: Some(next),
                    ..FilterPatch::default()
                })
            }
            ListAction::SetQuery(q) => current.merge(FilterPatch {
                q: Some(q),
                ..FilterPatch::default()
            }),
            ListAction::ToggleTag(tag) => {
                let mut tags = current.tags.clone();
                if let Some(index) = tags.iter().position(|existing| *existing == tag) {
                    tags.remove(index);
                } else if !tag.is_empty() {
                    tags.push(tag);
                }
                current.merge(FilterPatch {
                    tags: Some(tags),
                    ..FilterPatch::default()
                })
            }
            ListAction::SetTags(tags) => current.merge(FilterPatch {
                tags: Some(tags),
                ..FilterPatch::default()
            }),
            ListAction::SetPage(page) => current.merge(FilterPatch {
                page: Some(page),
                ..FilterPatch::default()
            }),
            ListAction::SetPageSize(page_size) => current.merge(FilterPatch {
                page_size: Some(page_size),
                ..FilterPatch::default()
            }),
            ListAction::SetSort(sort) => current.merge(FilterPatch {
                sort: Some(sort),
                ..FilterPatch::default()
            }),
            ListAction::ClearFilters => {
                let mut next = current.merge(FilterPatch {
                    kind: Some(None),
                    q: Some(None),
                    tags: Some(Vec::new()),
                    ..FilterPatch::default()
                });
                next.page = Some(DEFAULT_PAGE);
                next
            }
        }
    }
}

/// A fetch the controller expects to be run and then settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub filter: FilterState,
}

/// What happened to a settled response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Superseded,
}

/// Render-ready snapshot of the list.
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub filter: FilterState,
    pub tab: &'static str,
    /// Sort in the UI vocabulary, e.g. `-published_at`.
    pub sort: &'static str,
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
    pub loading: bool,
    pub error: Option<String>,
    pub suggested_tags: Vec<String>,
}

pub struct ListController {
    source: Arc<dyn PostsSource>,
    filter: FilterState,
    posts: Vec<Post>,
    total: u64,
    page: u32,
    pages: u32,
    error: Option<String>,
    suggested_tags: Vec<String>,
    issued: u64,
    pending: Option<u64>,
}

impl ListController {
    pub fn new(source: Arc<dyn PostsSource>, filter: FilterState) -> Self {
        Self {
            source,
            posts: Vec::new(),
            total: 0,
            page: filter.effective_page(),
            filter,
            pages: 1,
            error: None,
            suggested_tags: Vec::new(),
            issued: 0,
            pending: None,
        }
    }

    pub fn source(&self) -> &Arc<dyn PostsSource> {
        &self.source
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn tab(&self) -> CategoryTab {
        self.filter.tab()
    }

    /// Posts in the order the backend returned them.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Posts in display order: pinned first.
    pub fn rendered_posts(&self) -> Vec<Post> {
        render_order(&self.posts)
    }

    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn suggested_tags(&self) -> &[String] {
        &self.suggested_tags
    }

    pub fn view(&self) -> ListView {
        ListView {
            filter: self.filter.clone(),
            tab: self.tab().as_str(),
            sort: self.filter.sort.unwrap_or_default().ui_token(),
            posts: self.rendered_posts(),
            total: self.total,
            page: self.page,
            pages: self.pages,
            loading: self.loading(),
            error: self.error.clone(),
            suggested_tags: self.suggested_tags.clone(),
        }
    }

    /// Apply `action` to the filter and issue a fetch for the result.
    pub fn dispatch(&mut self, action: ListAction) -> FetchTicket {
        self.filter = action.reduce(&self.filter);
        self.reload()
    }

    /// Issue a fetch for the current filter without changing it.
    pub fn reload(&mut self) -> FetchTicket {
        self.issued += 1;
        self.pending = Some(self.issued);
        FetchTicket {
            seq: self.issued,
            filter: self.filter.clone(),
        }
    }

    /// Record the outcome of the fetch issued as `seq`.
    ///
    /// Only the most recently issued ticket is applied. Older tickets are
    /// reported as [`Settled::Superseded`] whatever their outcome, and leave
    /// the visible state untouched.
    pub fn settle(
        &mut self,
        seq: u64,
        result: Result<PostsPage, ApiError>,
    ) -> Result<Settled, ApiError> {
        if seq != self.issued {
            debug!(seq, latest = self.issued, "discarding stale list response");
            return Ok(Settled::Superseded);
        }
        if self.pending != Some(seq) {
            debug!(seq, "list response already settled");
            return Ok(Settled::Superseded);
        }
        self.pending = None;

        match result {
            Ok(page) => {
                self.suggested_tags = suggested_tags(&page.items);
                self.posts = page.items;
                self.total = page.total;
                self.page = page.page;
                self.pages = page.pages;
                self.error = None;
                Ok(Settled::Applied)
            }
            Err(err) => {
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Dispatch `action`, run the fetch, and settle it.
    pub async fn apply(&mut self, action: ListAction) -> Result<Settled, ApiError> {
        let ticket = self.dispatch(action);
        self.run(ticket).await
    }

    /// Re-fetch the current filter, e.g. after a post was deleted.
    pub async fn refresh(&mut self) -> Result<Settled, ApiError> {
        let ticket = self.reload();
        self.run(ticket).await
    }

    async fn run(&mut self, ticket: FetchTicket) -> Result<Settled, ApiError> {
        let result = self.source.list_posts(&ticket.filter).await;
        self.settle(ticket.seq, result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;
    use wfhubby_api_types::{PostId, PostStatus};

    use super::*;

    fn post(id: i64, pinned: bool, tags: &[&str]) -> Post {
        Post {
            id: PostId::Int(id),
            title: format!("Post {id}"),
            summary: None,
            content_md: None,
            kind: PostType::Recipe,
            tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
            cover_image_url: None,
            external_links: Vec::new(),
            status: PostStatus::Published,
            slug: format!("post-{id}"),
            pinned,
            created_at: None,
            published_at: None,
        }
    }

    fn page(items: Vec<Post>) -> PostsPage {
        PostsPage {
            total: items.len() as u64,
            items,
            page: 1,
            page_size: 12,
            pages: 1,
        }
    }

    #[derive(Default)]
    struct RecordingSource {
        seen: Mutex<Vec<FilterState>>,
        fail: bool,
    }

    #[async_trait]
    impl PostsSource for RecordingSource {
        async fn list_posts(&self, filter: &FilterState) -> Result<PostsPage, ApiError> {
            self.seen.lock().unwrap().push(filter.clone());
            if self.fail {
                return Err(ApiError::fetch(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch posts",
                ));
            }
            Ok(page(vec![
                post(1, false, &["rice", "spicy"]),
                post(2, true, &["spicy", "noodles"]),
            ]))
        }
    }

    fn controller(source: &Arc<RecordingSource>) -> ListController {
        let posts: Arc<dyn PostsSource> = source.clone();
        ListController::new(posts, FilterState::default())
    }

    #[test]
    fn selecting_recipes_tab_forces_type_and_first_page() {
        let current = FilterState {
            kind: Some(PostType::Tech),
            page: Some(3),
            ..FilterState::default()
        };
        let next = ListAction::SelectTab(CategoryTab::Recipes).reduce(&current);
        assert_eq!(next.kind, Some(PostType::Recipe));
        assert_eq!(next.page, Some(1));
        assert_eq!(next.tab(), CategoryTab::Recipes);
    }

    #[test]
    fn selecting_all_tab_clears_type() {
        let current = FilterState {
            kind: Some(PostType::Recipe),
            page: Some(2),
            ..FilterState::default()
        };
        let next = ListAction::SelectTab(CategoryTab::All).reduce(&current);
        assert_eq!(next.kind, None);
        assert_eq!(next.page, Some(1));
    }

    #[test]
    fn setting_type_moves_the_tab() {
        let next = ListAction::SetType(Some(PostType::Tech)).reduce(&FilterState::default());
        assert_eq!(next.tab(), CategoryTab::Tech);
        assert_eq!(next.page, Some(1));

        let cleared = ListAction::SetType(None).reduce(&next);
        assert_eq!(cleared.tab(), CategoryTab::All);
    }

    #[test]
    fn toggles_add_and_remove() {
        let tech = ListAction::ToggleType(PostType::Tech).reduce(&FilterState::default());
        assert_eq!(tech.kind, Some(PostType::Tech));
        let none = ListAction::ToggleType(PostType::Tech).reduce(&tech);
        assert_eq!(none.kind, None);

        let tagged = ListAction::ToggleTag("rust".into()).reduce(&FilterState::default());
        assert_eq!(tagged.tags, vec!["rust".to_string()]);
        let untagged = ListAction::ToggleTag("rust".into()).reduce(&tagged);
        assert!(untagged.tags.is_empty());
    }

    #[test]
    fn paging_actions_leave_scope_alone() {
        let current = FilterState {
            q: Some("laksa".into()),
            page: Some(2),
            ..FilterState::default()
        };
        let next = ListAction::SetPage(5).reduce(&current);
        assert_eq!(next.page, Some(5));
        assert_eq!(next.q.as_deref(), Some("laksa"));

        let resized = ListAction::SetPageSize(24).reduce(&next);
        assert_eq!(resized.page, Some(5));
        assert_eq!(resized.page_size, Some(24));
    }

    #[test]
    fn clear_filters_resets_scope() {
        let current = FilterState {
            kind: Some(PostType::Recipe),
            q: Some("curry".into()),
            tags: vec!["spicy".into()],
            page: Some(4),
            sort: Some(SortOrder::Oldest),
            ..FilterState::default()
        };
        let next = ListAction::ClearFilters.reduce(&current);
        assert!(!next.has_active_filters());
        assert_eq!(next.page, Some(1));
        assert_eq!(next.sort, Some(SortOrder::Oldest));
    }

    #[tokio::test]
    async fn each_action_fetches_the_full_filter_once() {
        let source = Arc::new(RecordingSource::default());
        let mut list = controller(&source);

        list.apply(ListAction::SelectTab(CategoryTab::Tech))
            .await
            .expect("tab");
        list.apply(ListAction::SetQuery(Some("tokio".into())))
            .await
            .expect("query");

        let seen = source.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].kind, Some(PostType::Tech));
        assert_eq!(seen[1].q.as_deref(), Some("tokio"));
        assert_eq!(seen[1].page, Some(1));
    }

    #[tokio::test]
    async fn applied_page_exposes_derived_outputs() {
        let source = Arc::new(RecordingSource::default());
        let mut list = controller(&source);

        let settled = list.refresh().await.expect("refresh");
        assert_eq!(settled, Settled::Applied);
        assert!(!list.loading());
        assert_eq!(list.total(), 2);
        assert_eq!(list.pages(), 1);
        assert_eq!(list.suggested_tags(), ["rice", "spicy", "noodles"]);

        let rendered: Vec<PostId> = list.rendered_posts().into_iter().map(|p| p.id).collect();
        assert_eq!(rendered, vec![PostId::Int(2), PostId::Int(1)]);
        assert_eq!(list.posts()[0].id, PostId::Int(1));

        let view = list.view();
        assert_eq!(view.tab, "all");
        assert_eq!(view.sort, "-published_at");
        assert_eq!(view.page, 1);
    }

    #[tokio::test]
    async fn failures_keep_previous_posts_and_report_once() {
        let source = Arc::new(RecordingSource {
            fail: true,
            ..RecordingSource::default()
        });
        let mut list = controller(&source);

        let err = list.refresh().await.expect_err("fetch fails");
        assert_eq!(err.user_message(), "Failed to fetch posts");
        assert_eq!(list.error(), Some("Failed to fetch posts"));
        assert!(!list.loading());
        assert!(list.posts().is_empty());
    }

    #[test]
    fn stale_responses_are_discarded() {
        let source: Arc<dyn PostsSource> = Arc::new(RecordingSource::default());
        let mut list = ListController::new(source, FilterState::default());

        let first = list.dispatch(ListAction::SetQuery(Some("old".into())));
        let second = list.dispatch(ListAction::SetQuery(Some("new".into())));
        assert!(list.loading());

        let fresh = list
            .settle(second.seq, Ok(page(vec![post(2, false, &["new"])])))
            .expect("fresh applies");
        assert_eq!(fresh, Settled::Applied);
        assert!(!list.loading());

        let stale = list
            .settle(first.seq, Ok(page(vec![post(1, false, &["old"])])))
            .expect("stale is dropped");
        assert_eq!(stale, Settled::Superseded);
        assert_eq!(list.posts()[0].id, PostId::Int(2));
        assert_eq!(list.suggested_tags(), ["new"]);
    }

    #[test]
    fn stale_failure_does_not_clear_loading_or_set_error() {
        let source: Arc<dyn PostsSource> = Arc::new(RecordingSource::default());
        let mut list = ListController::new(source, FilterState::default());

        let first = list.reload();
        let second = list.dispatch(ListAction::SetPage(2));

        let stale = list
            .settle(
                first.seq,
                Err(ApiError::fetch(StatusCode::BAD_GATEWAY, "upstream down")),
            )
            .expect("stale failure is dropped");
        assert_eq!(stale, Settled::Superseded);
        assert!(list.loading());
        assert_eq!(list.error(), None);

        list.settle(second.seq, Ok(page(Vec::new())))
            .expect("latest applies");
        assert!(!list.loading());
        assert_eq!(list.view().filter.page, Some(2));
    }
}
