#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use serde_json::json;
use wfhubby::application::listing::ListAction;
use wfhubby::domain::draft::PostDraft;
use wfhubby::domain::filter::{FilterState, SortOrder};
use wfhubby_api_types::{PostId, PostStatus};

use crate::args::{PostTypeArg, PostsCmd, TabArg};
use crate::client::{CliError, Ctx};
use crate::io::read_value;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List {
            tab,
            kind,
            q,
            tags,
            page,
            page_size,
            sort,
        } => {
            let input = ListInput {
                tab,
                kind,
                q,
                tags,
                page,
                page_size,
                sort,
            };
            list(ctx, input).await
        }
        PostsCmd::Get { id_or_slug } => get(ctx, &id_or_slug).await,
        PostsCmd::Create {
            title,
            summary,
            content,
            content_file,
            kind,
            tags,
            cover_image_url,
            links,
            slug,
            publish,
        } => {
            let input = PostCreateInput {
                title,
                summary,
                content,
                content_file,
                kind,
                tags,
                cover_image_url,
                links,
                slug,
                publish,
            };
            create(ctx, input).await
        }
        PostsCmd::Delete { id } => {
            ctx.admin().delete(&PostId::from(id.as_str())).await?;
            print_json(&json!({ "deleted": id }))
        }
        PostsCmd::Pin { id } => {
            ctx.admin().pin(&PostId::from(id.as_str())).await?;
            print_json(&json!({ "pinned": id }))
        }
        PostsCmd::Unpin { id } => {
            ctx.admin().unpin(&PostId::from(id.as_str())).await?;
            print_json(&json!({ "unpinned": id }))
        }
    }
}

pub(crate) struct ListInput {
    pub(crate) tab: Option<TabArg>,
    pub(crate) kind: Option<PostTypeArg>,
    pub(crate) q: Option<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) page: Option<u32>,
    pub(crate) page_size: Option<u32>,
    pub(crate) sort: Option<String>,
}

impl ListInput {
    /// Translate flags into reducer actions. Paging comes last so scope
    /// changes cannot reset an explicit `--page`.
    pub(crate) fn actions(self) -> Vec<ListAction> {
        let mut actions = Vec::new();
        if let Some(tab) = self.tab {
            actions.push(ListAction::SelectTab(tab.into()));
        }
        if let Some(kind) = self.kind {
            actions.push(ListAction::SetType(Some(kind.into())));
        }
        if self.q.is_some() {
            actions.push(ListAction::SetQuery(self.q));
        }
        if !self.tags.is_empty() {
            actions.push(ListAction::SetTags(self.tags));
        }
        if let Some(sort) = self.sort {
            actions.push(ListAction::SetSort(SortOrder::from_ui_token(&sort)));
        }
        if let Some(page_size) = self.page_size {
            actions.push(ListAction::SetPageSize(page_size));
        }
        if let Some(page) = self.page {
            actions.push(ListAction::SetPage(page));
        }
        actions
    }
}

async fn list(ctx: &Ctx, input: ListInput) -> Result<(), CliError> {
    let filter = input
        .actions()
        .into_iter()
        .fold(ctx.initial_filter(), |filter: FilterState, action| {
            action.reduce(&filter)
        });
    let mut controller = ctx.list(filter);
    controller.refresh().await?;
    print_json(&controller.view())
}

async fn get(ctx: &Ctx, id_or_slug: &str) -> Result<(), CliError> {
    let post = ctx.api.get_post(id_or_slug).await?;
    print_json(&post)
}

pub(crate) struct PostCreateInput {
    pub(crate) title: String,
    pub(crate) summary: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) content_file: Option<PathBuf>,
    pub(crate) kind: PostTypeArg,
    pub(crate) tags: Vec<String>,
    pub(crate) cover_image_url: Option<String>,
    pub(crate) links: Vec<String>,
    pub(crate) slug: Option<String>,
    pub(crate) publish: bool,
}

impl PostCreateInput {
    pub(crate) fn into_draft(self) -> Result<PostDraft, CliError> {
        let content_md = match (self.content, self.content_file) {
            (None, None) => String::new(),
            (content, file) => read_value(content, file)?,
        };
        let mut draft = PostDraft {
            summary: self.summary.unwrap_or_default(),
            content_md,
            kind: self.kind.into(),
            cover_image_url: self.cover_image_url.unwrap_or_default(),
            slug: self.slug.unwrap_or_default(),
            ..PostDraft::default()
        };
        draft.set_title(self.title);
        for tag in &self.tags {
            draft.add_tag(tag);
        }
        for link in &self.links {
            draft.add_link(link);
        }
        Ok(draft)
    }
}

async fn create(ctx: &Ctx, input: PostCreateInput) -> Result<(), CliError> {
    let status = if input.publish {
        PostStatus::Published
    } else {
        PostStatus::Draft
    };
    let draft = input.into_draft()?;
    let post = ctx.admin().create(&draft, status).await?;
    print_json(&post)
}
