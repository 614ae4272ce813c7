use reqwest::StatusCode;
use thiserror::Error;

use crate::infra::error::InfraError;

/// Failures surfaced by [`super::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// A privileged call was rejected with 401; the credential has been revoked.
    #[error("authentication required")]
    AuthRequired,
    #[error("{message} (status {status})")]
    Fetch { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Session(#[from] InfraError),
}

impl ApiError {
    pub fn fetch(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Fetch {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, ApiError::AuthRequired)
    }

    /// The single message shown to a user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::AuthRequired => "Authentication required. Please log in.".to_string(),
            ApiError::Fetch { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Every call the client makes against the content API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListPosts,
    GetPost,
    CreatePost,
    DeletePost,
    PinPost,
    UnpinPost,
    UploadImage,
    Login,
    Logout,
}

impl Operation {
    pub fn default_message(self) -> &'static str {
        match self {
            Operation::ListPosts => "Failed to fetch posts",
            Operation::GetPost => "Failed to fetch post",
            Operation::CreatePost => "Failed to create post",
            Operation::DeletePost => "Failed to delete post",
            Operation::PinPost => "Failed to pin post",
            Operation::UnpinPost => "Failed to unpin post",
            Operation::UploadImage => "Failed to upload image",
            Operation::Login => "Login failed",
            Operation::Logout => "Logout failed",
        }
    }

    /// Calls that carry the bearer credential and revoke it on 401.
    pub fn is_privileged(self) -> bool {
        matches!(
            self,
            Operation::CreatePost
                | Operation::DeletePost
                | Operation::PinPost
                | Operation::UnpinPost
                | Operation::UploadImage
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    AuthRequired,
    Fetch { status: StatusCode, message: String },
}

/// Classify a response for `operation`. Only privileged calls turn 401 into
/// [`Outcome::AuthRequired`]; every other failure carries the trimmed body
/// text, or the operation's default message when the body is blank.
pub fn classify(operation: Operation, status: StatusCode, body: &str) -> Outcome {
    if status.is_success() {
        return Outcome::Success;
    }
    if status == StatusCode::UNAUTHORIZED && operation.is_privileged() {
        return Outcome::AuthRequired;
    }
    let body = body.trim();
    let message = if body.is_empty() {
        operation.default_message().to_string()
    } else {
        body.to_string()
    };
    Outcome::Fetch { status, message }
}
