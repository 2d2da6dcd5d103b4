#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{Duration, Utc};
use coremind::auth::{AuthError, Credential, CredentialStore, TokenGrant};
use coremind::session::{Identity, SessionRecord, User};

/// Credential store holding a single record in memory.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    record: Mutex<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, credential: Credential) {
        *self.record.lock().expect("store lock poisoned") = Some(credential);
    }

    pub fn get(&self) -> Option<Credential> {
        self.record.lock().expect("store lock poisoned").clone()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, AuthError> {
        Ok(self.get())
    }

    fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        *self.record.lock().expect("store lock poisoned") = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.record.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

pub fn credential(access_token: &str) -> Credential {
    Credential::from_grant(
        TokenGrant {
            access_token: access_token.to_string(),
            refresh_token: None,
            token_type: None,
            scope: Some("openid profile email".to_string()),
            expires_in: Some(3600),
        },
        Utc::now(),
    )
}

pub fn identity(token: &str, user_name: &str) -> Identity {
    Identity {
        session: SessionRecord {
            id: format!("sess-{token}"),
            token: token.to_string(),
            user_id: format!("user-{user_name}"),
            expires_at: Utc::now() + Duration::hours(1),
        },
        user: User {
            id: format!("user-{user_name}"),
            email: format!("{user_name}@example.com"),
            name: user_name.to_string(),
            image: None,
        },
    }
}

pub fn expired_identity(token: &str, user_name: &str) -> Identity {
    let mut identity = identity(token, user_name);
    identity.session.expires_at = Utc::now() - Duration::minutes(1);
    identity
}
