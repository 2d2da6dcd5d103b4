//! Crate-level error type for the command layer.

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::llm::LlmError;

/// Aggregate error surfaced by CLI command handlers.
///
/// Handlers return these as values; only `main` turns them into process exit
/// codes.
#[derive(Debug, Error)]
pub enum CoremindError {
    #[error(transparent)]
    Auth(AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
