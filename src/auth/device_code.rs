use std::time::Duration;

use chrono::{DateTime, Utc};

use super::credential::TokenGrant;

/// Fallback polling interval when the provider omits one.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
/// Seconds added to the interval on every `slow_down`.
pub const SLOW_DOWN_INCREMENT_SECS: u64 = 5;
/// Ceiling on the polling interval regardless of how many `slow_down`
/// responses arrive.
pub const MAX_POLL_INTERVAL_SECS: u64 = 60;

/// One device-authorization attempt, alive until the user approves, denies,
/// or the provider's deadline passes.
#[derive(Debug, Clone)]
pub struct DeviceAuthSession {
    /// Opaque code the client polls with; never shown to the user.
    pub device_code: String,
    /// Short code the user enters in the browser.
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    pub interval_secs: u64,
    pub expires_at: DateTime<Utc>,
}

impl DeviceAuthSession {
    /// URL to send the user to, preferring the pre-filled variant.
    pub fn verification_target(&self) -> &str {
        self.verification_uri_complete
            .as_deref()
            .unwrap_or(&self.verification_uri)
    }
}

/// Decoded token-endpoint reply for a single poll.
#[derive(Debug, Clone)]
pub enum TokenPollResponse {
    Issued(TokenGrant),
    Pending,
    SlowDown,
    AccessDenied,
    ExpiredToken,
    Other {
        error: String,
        description: Option<String>,
    },
}

/// What the driver loop should do after a poll.
#[derive(Debug, Clone)]
pub enum PollStep {
    /// Sleep this long, then poll again.
    Wait(Duration),
    Issued(TokenGrant),
    Denied,
    Expired,
    Failed {
        error: String,
        description: Option<String>,
    },
}

/// Polling state for one device-authorization session.
///
/// Pure with respect to time: callers pass `now` into [`PollMachine::apply`],
/// and the machine never sleeps or performs I/O itself. The interval only
/// ever grows (each `slow_down` adds a sticky increment, capped at
/// [`MAX_POLL_INTERVAL_SECS`]), and no further wait is scheduled once the
/// session deadline has passed.
#[derive(Debug, Clone)]
pub struct PollMachine {
    interval_secs: u64,
    deadline: DateTime<Utc>,
}

impl PollMachine {
    pub fn new(interval_secs: u64, deadline: DateTime<Utc>) -> Self {
        Self {
            interval_secs,
            deadline,
        }
    }

    pub fn for_session(session: &DeviceAuthSession) -> Self {
        Self::new(session.interval_secs, session.expires_at)
    }

    /// Current wait between polls.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Advance the machine with the provider's reply.
    pub fn apply(&mut self, response: TokenPollResponse, now: DateTime<Utc>) -> PollStep {
        match response {
            TokenPollResponse::Issued(grant) => PollStep::Issued(grant),
            TokenPollResponse::AccessDenied => PollStep::Denied,
            TokenPollResponse::ExpiredToken => PollStep::Expired,
            TokenPollResponse::Other { error, description } => {
                PollStep::Failed { error, description }
            }
            TokenPollResponse::Pending => self.schedule(now),
            TokenPollResponse::SlowDown => {
                self.interval_secs = (self.interval_secs + SLOW_DOWN_INCREMENT_SECS)
                    .min(MAX_POLL_INTERVAL_SECS)
                    .max(self.interval_secs);
                self.schedule(now)
            }
        }
    }

    fn schedule(&self, now: DateTime<Utc>) -> PollStep {
        if now >= self.deadline {
            PollStep::Expired
        } else {
            PollStep::Wait(self.interval())
        }
    }
}
