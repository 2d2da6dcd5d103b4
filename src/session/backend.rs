use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use super::Identity;

/// Failure while consulting the identity backend.
///
/// The resolver downgrades these to "absent"; they exist so backends can
/// still report what went wrong to the logs.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("session lookup failed: {0}")]
    Lookup(String),
}

/// Identity backend the resolver consults.
///
/// The backend is the sole serialization point for session data; resolvers
/// hold no state of their own and may be shared across concurrent requests.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Resolve a session from a session-cookie value.
    async fn session_for_cookie(&self, cookie: &str) -> Result<Option<Identity>, BackendError>;

    /// Resolve a session keyed directly by the raw bearer token value.
    async fn session_for_token(&self, token: &str) -> Result<Option<Identity>, BackendError>;
}

/// Token-keyed in-memory backend for tests and the demo server.
///
/// Cookie values carry the session token itself, so both lookups share one
/// map.
#[derive(Default)]
pub struct InMemorySessionBackend {
    sessions: RwLock<HashMap<String, Identity>>,
}

impl InMemorySessionBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, identity: Identity) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(identity.session.token.clone(), identity);
        }
    }

    fn get(&self, token: &str) -> Option<Identity> {
        self.sessions.read().ok()?.get(token).cloned()
    }
}

#[async_trait]
impl SessionBackend for InMemorySessionBackend {
    async fn session_for_cookie(&self, cookie: &str) -> Result<Option<Identity>, BackendError> {
        Ok(self.get(cookie))
    }

    async fn session_for_token(&self, token: &str) -> Result<Option<Identity>, BackendError> {
        Ok(self.get(token))
    }
}
