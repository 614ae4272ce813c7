//! Command-line surface for `wfhubby-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use wfhubby::config::ConfigOverrides;
use wfhubby::domain::filter::CategoryTab;
use wfhubby_api_types::PostType;

#[derive(Parser, Debug)]
#[command(name = "wfhubby-cli", version, about = "wfhubby content API client", long_about = None)]
pub struct Cli {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "WFHUBBY_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse and manage posts
    Posts(PostsArgs),
    /// Cover image uploads
    Uploads(UploadsArgs),
    /// Manage the stored session
    Auth(AuthArgs),
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts; pinned posts are printed first
    List {
        /// Category tab (all|recipes|tech)
        #[arg(long, value_enum, conflicts_with = "kind")]
        tab: Option<TabArg>,
        /// Restrict to one post type
        #[arg(long = "type", value_enum)]
        kind: Option<PostTypeArg>,
        /// Free-text search
        #[arg(long)]
        q: Option<String>,
        /// Tag filter; repeat for several tags
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        /// Sort token: -published_at, published_at, title, -title
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<String>,
    },
    /// Get a post by id or slug
    Get { id_or_slug: String },
    /// Create a post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        summary: Option<String>,
        /// Markdown body
        #[arg(long)]
        content: Option<String>,
        /// Read the Markdown body from a file (takes precedence over --content)
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long = "type", value_enum, default_value_t = PostTypeArg::Recipe)]
        kind: PostTypeArg,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        cover_image_url: Option<String>,
        /// External link; repeat for several links
        #[arg(long = "link")]
        links: Vec<String>,
        /// Explicit slug; derived from the title when omitted
        #[arg(long)]
        slug: Option<String>,
        /// Publish immediately instead of saving a draft
        #[arg(long, default_value_t = false)]
        publish: bool,
    },
    /// Delete a post
    Delete { id: String },
    /// Pin a post to the top of listings
    Pin { id: String },
    /// Remove a pin
    Unpin { id: String },
}

#[derive(Parser, Debug)]
pub struct UploadsArgs {
    #[command(subcommand)]
    pub action: UploadsCmd,
}

#[derive(Subcommand, Debug)]
pub enum UploadsCmd {
    /// Upload a cover image (JPEG, PNG, GIF or WebP, at most 15MB)
    Image { file: PathBuf },
}

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthCmd,
}

#[derive(Subcommand, Debug)]
pub enum AuthCmd {
    /// Exchange credentials for a session token
    Login {
        #[arg(long)]
        username: String,
        /// Password (prefer the env var to keep it out of shell history)
        #[arg(long, env = "WFHUBBY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Report whether a session token is stored
    Status,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TabArg {
    All,
    Recipes,
    Tech,
}

impl From<TabArg> for CategoryTab {
    fn from(value: TabArg) -> Self {
        match value {
            TabArg::All => CategoryTab::All,
            TabArg::Recipes => CategoryTab::Recipes,
            TabArg::Tech => CategoryTab::Tech,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PostTypeArg {
    Recipe,
    Tech,
}

impl PostTypeArg {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        PostType::from(self).as_str()
    }
}

impl From<PostTypeArg> for PostType {
    fn from(value: PostTypeArg) -> Self {
        match value {
            PostTypeArg::Recipe => PostType::Recipe,
            PostTypeArg::Tech => PostType::Tech,
        }
    }
}

impl fmt::Display for PostTypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
