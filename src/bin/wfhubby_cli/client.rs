#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use thiserror::Error;
use wfhubby::application::admin::AdminPostService;
use wfhubby::application::error::AdminError;
use wfhubby::application::listing::ListController;
use wfhubby::config::{self, LoadError, Settings};
use wfhubby::domain::filter::FilterState;
use wfhubby::infra::error::InfraError;
use wfhubby::infra::http::{ApiClient, ApiError};
use wfhubby::infra::session::{FileTokenStore, Session};

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("authentication required; run `wfhubby-cli auth login` first")]
    LoginRequired,
    #[error("{0}")]
    Api(String),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        if err.is_auth_required() {
            Self::LoginRequired
        } else {
            Self::Api(err.user_message())
        }
    }
}

impl From<AdminError> for CliError {
    fn from(err: AdminError) -> Self {
        if err.requires_login() {
            Self::LoginRequired
        } else {
            Self::Api(err.user_message())
        }
    }
}

/// Everything a handler needs: resolved settings and a client bound to the
/// persisted session.
#[derive(Clone, Debug)]
pub struct Ctx {
    pub settings: Settings,
    pub api: ApiClient,
}

impl Ctx {
    pub fn from_settings(settings: Settings) -> Result<Self, CliError> {
        let store = FileTokenStore::new(&settings.session.token_file);
        let session = Arc::new(Session::restore(store)?);
        let api = ApiClient::new(settings.api.base_url.as_str(), &settings.api.prefix, session)?;
        Ok(Self { settings, api })
    }

    pub fn admin(&self) -> AdminPostService {
        AdminPostService::new(Arc::new(self.api.clone()))
    }

    pub fn list(&self, filter: FilterState) -> ListController {
        ListController::new(Arc::new(self.api.clone()), filter)
    }

    /// Starting filter for list commands, sized from configuration.
    pub fn initial_filter(&self) -> FilterState {
        FilterState::with_page_size(self.settings.listing.page_size.get())
    }
}

pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    Ok(config::load(cli.config_file.as_deref(), &cli.overrides)?)
}
