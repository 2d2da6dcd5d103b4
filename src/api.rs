//! Backend client for authenticated CLI calls.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::auth::Credential;
use crate::session::Identity;

/// Errors from the backend session endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server unreachable: {0}")]
    Network(String),
    #[error("server rejected the credential; log in again")]
    Unauthorized,
    #[error("unexpected server response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

/// Thin client for the backend's session endpoint.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn me_url(&self) -> String {
        format!("{}/api/me", self.base_url.trim_end_matches('/'))
    }

    /// Fetch the identity bound to `credential`.
    ///
    /// Attaches the access token as a bearer credential; a 401 or an empty
    /// session body both mean the server no longer recognizes the token.
    pub async fn fetch_identity(&self, credential: &Credential) -> Result<Identity, ApiError> {
        debug!(url = %self.me_url(), "fetching identity");
        let resp = self
            .http
            .get(self.me_url())
            .bearer_auth(&credential.access_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        match resp.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status if status.is_success() => {
                let identity: Option<Identity> = resp
                    .json()
                    .await
                    .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
                identity.ok_or(ApiError::Unauthorized)
            }
            status => Err(ApiError::InvalidResponse(format!("status {status}"))),
        }
    }
}
