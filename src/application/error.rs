use thiserror::Error;

use crate::{domain::error::DomainError, infra::http::ApiError};

/// Failures from post administration: rejected locally or by the API.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AdminError {
    /// The caller should send the user through login again.
    pub fn requires_login(&self) -> bool {
        matches!(self, AdminError::Api(err) if err.is_auth_required())
    }

    pub fn user_message(&self) -> String {
        match self {
            AdminError::Validation(err) => err.message().to_string(),
            AdminError::Api(err) => err.user_message(),
        }
    }
}
