use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::debug;

use super::credential::TokenGrant;
use super::device_code::{
    DeviceAuthSession, PollMachine, PollStep, TokenPollResponse, DEFAULT_POLL_INTERVAL_SECS,
};
use super::error::AuthError;

const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Settings for one identity provider, supplied by the surrounding CLI layer.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub server_url: String,
    pub client_id: String,
    pub scope: String,
}

/// OAuth 2.0 Device Authorization Grant client.
///
/// [`DeviceAuthClient::request_device_code`] starts a session and
/// [`DeviceAuthClient::poll_for_token`] drives it to a terminal state. The
/// polling cadence is owned by [`PollMachine`]; this client only performs the
/// network exchanges and the sleeping. Cancellation is the caller's: dropping
/// the in-flight future stops the loop and nothing is persisted here.
pub struct DeviceAuthClient {
    http: reqwest::Client,
    config: AuthConfig,
}

impl DeviceAuthClient {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn device_code_url(&self) -> String {
        format!(
            "{}/api/auth/device/code",
            self.config.server_url.trim_end_matches('/')
        )
    }

    fn token_url(&self) -> String {
        format!(
            "{}/api/auth/device/token",
            self.config.server_url.trim_end_matches('/')
        )
    }

    /// Request a device code and user code from the provider.
    ///
    /// Fails with [`AuthError::ProviderUnavailable`] on transport failure and
    /// [`AuthError::InvalidRequest`] when the provider rejects the client id
    /// or scope; the latter must not be retried automatically.
    pub async fn request_device_code(&self) -> Result<DeviceAuthSession, AuthError> {
        debug!(url = %self.device_code_url(), client_id = %self.config.client_id, "requesting device code");
        let resp = self
            .http
            .post(self.device_code_url())
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("scope", self.config.scope.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let envelope = resp.json::<ErrorEnvelope>().await.ok();
            let message = envelope
                .map(|e| e.message())
                .unwrap_or_else(|| format!("status {status}"));
            return Err(AuthError::InvalidRequest(message));
        }

        let payload: DeviceCodeResponse = resp
            .json()
            .await
            .map_err(|err| AuthError::InvalidResponse(err.to_string()))?;
        Ok(DeviceAuthSession {
            device_code: payload.device_code,
            user_code: payload.user_code,
            verification_uri: payload.verification_uri,
            verification_uri_complete: payload.verification_uri_complete,
            interval_secs: payload.interval,
            expires_at: Utc::now() + Duration::seconds(payload.expires_in as i64),
        })
    }

    /// Issue a single token-endpoint exchange for the session.
    ///
    /// Decodes both the success payload and the polling error envelope; the
    /// token endpoint reports expected states (`authorization_pending`,
    /// `slow_down`) as errors with a 4xx status, so the body is parsed
    /// regardless of status code.
    pub async fn poll_once(
        &self,
        session: &DeviceAuthSession,
    ) -> Result<TokenPollResponse, AuthError> {
        let resp = self
            .http
            .post(self.token_url())
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", DEVICE_CODE_GRANT_TYPE),
                ("device_code", session.device_code.as_str()),
                ("client_id", self.config.client_id.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let payload: TokenEndpointResponse = match resp.json().await {
            Ok(payload) => payload,
            Err(_) => {
                return Err(AuthError::InvalidResponse(format!(
                    "token endpoint returned status {status} with an unreadable body"
                )))
            }
        };

        if let Some(access_token) = payload.access_token {
            return Ok(TokenPollResponse::Issued(TokenGrant {
                access_token,
                refresh_token: payload.refresh_token,
                token_type: payload.token_type,
                scope: payload.scope,
                expires_in: payload.expires_in,
            }));
        }

        match payload.error.as_deref() {
            Some("authorization_pending") => Ok(TokenPollResponse::Pending),
            Some("slow_down") => Ok(TokenPollResponse::SlowDown),
            Some("access_denied") => Ok(TokenPollResponse::AccessDenied),
            Some("expired_token") => Ok(TokenPollResponse::ExpiredToken),
            Some(error) => Ok(TokenPollResponse::Other {
                error: error.to_string(),
                description: payload.error_description,
            }),
            None => Err(AuthError::InvalidResponse(
                "token endpoint response carried neither a token nor an error".to_string(),
            )),
        }
    }

    /// Poll the token endpoint until the session reaches a terminal state.
    ///
    /// Sleeps exactly the machine-dictated interval between exchanges, so the
    /// loop never polls faster than the provider asked and honors every
    /// `slow_down` for the remainder of the session.
    pub async fn poll_for_token(
        &self,
        session: &DeviceAuthSession,
    ) -> Result<TokenGrant, AuthError> {
        let mut machine = PollMachine::for_session(session);
        let mut wait = machine.interval();
        loop {
            tokio::time::sleep(wait).await;
            let response = self.poll_once(session).await?;
            match machine.apply(response, Utc::now()) {
                PollStep::Wait(next) => {
                    debug!(interval_secs = next.as_secs(), "authorization pending");
                    wait = next;
                }
                PollStep::Issued(grant) => return Ok(grant),
                PollStep::Denied => return Err(AuthError::AccessDenied),
                PollStep::Expired => return Err(AuthError::Expired),
                PollStep::Failed { error, description } => {
                    return Err(AuthError::Provider { error, description })
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_uri: String,
    #[serde(default)]
    verification_uri_complete: Option<String>,
    #[serde(default = "default_interval")]
    interval: u64,
    expires_in: u64,
}

fn default_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    status: Option<u16>,
}

impl ErrorEnvelope {
    fn message(self) -> String {
        if let Some(description) = self.error_description {
            return description;
        }
        if let Some(error) = self.error {
            return error;
        }
        match self.status {
            Some(status) => format!("status {status}"),
            None => "unknown provider error".to_string(),
        }
    }
}
