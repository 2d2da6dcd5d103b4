//! Server-side session resolution for bearer and cookie callers.
//!
//! The CLI presents a bearer token, the browser presents a session cookie;
//! both are proofs against the same identity backend. The resolver tries an
//! ordered list of strategies and reports every failure as "absent" so the
//! HTTP layer can answer 401 without leaking backend faults.

pub mod backend;
pub mod resolve;

#[cfg(feature = "server")]
pub mod http;

pub use backend::{BackendError, InMemorySessionBackend, SessionBackend};
pub use resolve::{RequestCredentials, SessionResolver};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the session cookie issued by the identity backend.
pub const SESSION_COOKIE: &str = "coremind.session_token";

/// User projection returned to authenticated callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// One live session row in the identity backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

/// A resolved session together with its user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub session: SessionRecord,
    pub user: User,
}
