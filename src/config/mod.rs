//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::{Args, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File, Map};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::domain::filter::DEFAULT_PAGE_SIZE;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "wfhubby";
const ENV_PREFIX: &str = "WFHUBBY";
pub const DEFAULT_API_BASE_URL: &str = "https://wfhubby.onrender.com";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_TOKEN_FILE: &str = ".wfhubby/session.json";

/// Command-line overrides applied on top of files and environment.
#[derive(Debug, Args, Default, Clone)]
pub struct ConfigOverrides {
    /// Override the content API origin.
    #[arg(long = "api-base-url", value_name = "URL", value_hint = ValueHint::Url)]
    pub api_base_url: Option<String>,

    /// Override the file the session token is persisted in.
    #[arg(long = "session-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub session_file: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
    pub listing: ListingSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: Url,
    pub prefix: String,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub token_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct ListingSettings {
    pub page_size: NonZeroU32,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<Settings, LoadError> {
    load_with_env(config_file, overrides, None)
}

/// Same as [`load`] but reads environment variables from `env` when given.
fn load_with_env(
    config_file: Option<&Path>,
    overrides: &ConfigOverrides,
    env: Option<Map<String, String>>,
) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(env),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    session: RawSessionSettings,
    logging: RawLoggingSettings,
    listing: RawListingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = overrides.api_base_url.as_ref() {
            self.api.base_url = Some(url.clone());
        }
        if let Some(path) = overrides.session_file.as_ref() {
            self.session.token_file = Some(path.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            api,
            session,
            logging,
            listing,
        } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            session: build_session_settings(session)?,
            logging: build_logging_settings(logging)?,
            listing: build_listing_settings(listing)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let raw_url = api
        .base_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let base_url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("api.base_url", format!("failed to parse: {err}")))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "api.base_url",
            "scheme must be http or https",
        ));
    }

    let prefix = api.prefix.unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
    let prefix = prefix.trim();
    if !prefix.is_empty() && !prefix.starts_with('/') {
        return Err(LoadError::invalid("api.prefix", "must start with `/`"));
    }

    Ok(ApiSettings {
        base_url,
        prefix: prefix.to_string(),
    })
}

fn build_session_settings(session: RawSessionSettings) -> Result<SessionSettings, LoadError> {
    let token_file = session
        .token_file
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE));
    if token_file.as_os_str().is_empty() {
        return Err(LoadError::invalid("session.token_file", "must not be empty"));
    }
    Ok(SessionSettings { token_file })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_listing_settings(listing: RawListingSettings) -> Result<ListingSettings, LoadError> {
    let page_size = non_zero_u32(
        listing.page_size.unwrap_or(u64::from(DEFAULT_PAGE_SIZE)),
        "listing.page_size",
    )?;
    Ok(ListingSettings { page_size })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSessionSettings {
    token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawListingSettings {
    page_size: Option<u64>,
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
