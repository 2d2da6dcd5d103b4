use thiserror::Error;

use crate::error::CoremindError;

/// Authentication and credential-storage errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity provider unreachable: {0}")]
    ProviderUnavailable(String),
    #[error("device authorization rejected: {0}")]
    InvalidRequest(String),
    #[error("authorization denied")]
    AccessDenied,
    #[error("authorization expired; log in again")]
    Expired,
    #[error("identity provider error: {}", provider_message(.error, .description))]
    Provider {
        error: String,
        description: Option<String>,
    },
    #[error("credential storage error: {0}")]
    Storage(String),
    #[error("not logged in")]
    NotLoggedIn,
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

fn provider_message(error: &str, description: &Option<String>) -> String {
    match description {
        Some(description) => format!("{error}: {description}"),
        None => error.to_string(),
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::ProviderUnavailable(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<AuthError> for CoremindError {
    fn from(error: AuthError) -> Self {
        CoremindError::Auth(error)
    }
}
