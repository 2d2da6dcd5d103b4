//! Device authorization flow and credential storage.

pub mod client;
pub mod credential;
pub mod device_code;
pub mod error;
pub mod store;

pub use client::{AuthConfig, DeviceAuthClient};
pub use credential::{Credential, TokenGrant};
pub use device_code::{DeviceAuthSession, PollMachine, PollStep, TokenPollResponse};
pub use error::AuthError;
pub use store::{default_config_dir, CredentialStore, FileCredentialStore};

use chrono::Utc;

/// Load the stored credential and apply the expiry policy.
///
/// The gate every authenticated command goes through: absent record means
/// [`AuthError::NotLoggedIn`], a record inside the safety margin means
/// [`AuthError::Expired`].
pub fn require_credential(store: &dyn CredentialStore) -> Result<Credential, AuthError> {
    let credential = store.load()?.ok_or(AuthError::NotLoggedIn)?;
    if credential.is_expired(Utc::now()) {
        return Err(AuthError::Expired);
    }
    Ok(credential)
}
