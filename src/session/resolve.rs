use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use super::backend::SessionBackend;
use super::{Identity, SESSION_COOKIE};

/// Identity proofs extracted from an inbound request.
#[derive(Debug, Clone, Default)]
pub struct RequestCredentials {
    pub bearer: Option<String>,
    pub cookie: Option<String>,
}

impl RequestCredentials {
    /// Parse the `Authorization` and `Cookie` header values.
    pub fn new(authorization: Option<&str>, cookie_header: Option<&str>) -> Self {
        Self {
            bearer: authorization.and_then(parse_bearer),
            cookie: cookie_header.and_then(|header| cookie_value(header, SESSION_COOKIE)),
        }
    }
}

fn parse_bearer(header: &str) -> Option<String> {
    let (scheme, value) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Resolution strategies, tried in order until one yields a session.
///
/// Each is a pure lookup: credentials in, identity or absent out. Adding a
/// new proof type (an API key, say) means adding a variant here and slotting
/// it into [`SessionResolver::strategy_order`].
#[derive(Debug, Clone, Copy, PartialEq)]
enum Strategy {
    Cookie,
    BearerToken,
}

impl Strategy {
    async fn resolve(
        self,
        credentials: &RequestCredentials,
        backend: &dyn SessionBackend,
    ) -> Option<Identity> {
        let lookup = match self {
            Strategy::Cookie => {
                let cookie = credentials.cookie.as_deref()?;
                backend.session_for_cookie(cookie).await
            }
            Strategy::BearerToken => {
                let token = credentials.bearer.as_deref()?;
                backend.session_for_token(token).await
            }
        };
        let identity = match lookup {
            Ok(identity) => identity?,
            Err(err) => {
                debug!(strategy = ?self, error = %err, "session lookup failed");
                return None;
            }
        };
        if identity.session.expires_at <= Utc::now() {
            debug!(strategy = ?self, "session found but expired");
            return None;
        }
        Some(identity)
    }
}

/// Resolves a caller's identity from bearer or cookie proofs.
///
/// Side-effect-free and safe to share across concurrent requests; the
/// backend is the only thing it consults.
#[derive(Clone)]
pub struct SessionResolver {
    backend: Arc<dyn SessionBackend>,
}

impl SessionResolver {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    /// A bearer caller may also hold a live browser session, so the cookie
    /// path is consulted first and the raw-token lookup is the fallback.
    /// Without a bearer proof only the cookie path applies.
    fn strategy_order(credentials: &RequestCredentials) -> &'static [Strategy] {
        if credentials.bearer.is_some() {
            &[Strategy::Cookie, Strategy::BearerToken]
        } else {
            &[Strategy::Cookie]
        }
    }

    /// Resolve the caller, or report absent. Never fails.
    pub async fn resolve(&self, credentials: &RequestCredentials) -> Option<Identity> {
        for strategy in Self::strategy_order(credentials) {
            if let Some(identity) = strategy.resolve(credentials, self.backend.as_ref()).await {
                return Some(identity);
            }
        }
        None
    }
}
